//! Observer-relative observations: azimuth, elevation, and slant range.

use crate::cartesian::{Ecef, Enu};
use crate::geodetic::Geodetic;
use crate::Vector3;
use std::fmt::{Display, Formatter};
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sensor observation of a target relative to an observer: [azimuth,
/// elevation][azel], and slant range.
///
/// - azimuth is the angle clockwise from true north, as seen from above;
/// - elevation is the angle upwards from the observer's local horizontal
///   plane; and
/// - range is the slant (line-of-sight) distance from the observer to the
///   target.
///
/// An `Aer` is only meaningful together with the observer it was measured
/// from, so the observer's [`Geodetic`] location is passed explicitly to the
/// conversions that need it ([`Aer::to_ecef`] and [`Aer::to_geodetic`]).
///
/// `Aer` deliberately validates nothing: a negative range or an elevation
/// beyond ±90° is carried through the math as-is. This is a numerical
/// library, not an input-validating service; garbage measurements produce
/// garbage positions rather than errors.
///
/// [azel]: https://en.wikipedia.org/wiki/Horizontal_coordinate_system
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aer {
    azimuth: Angle,
    elevation: Angle,
    range: Length,
}

/// Argument type for [`Aer::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct Components {
    /// The angle clockwise from true north, as seen from above.
    pub azimuth: Angle,

    /// The angle upwards from the observer's local horizontal plane.
    pub elevation: Angle,

    /// The slant (line-of-sight) distance from the observer to the target.
    pub range: Length,
}

impl Aer {
    /// Constructs an observation from azimuth, elevation, and slant range.
    #[must_use]
    pub fn build(
        Components {
            azimuth,
            elevation,
            range,
        }: Components,
    ) -> Self {
        Self {
            azimuth,
            elevation,
            range,
        }
    }

    /// Returns the angle clockwise from true north, as seen from above.
    #[must_use]
    pub fn azimuth(&self) -> Angle {
        self.azimuth
    }

    /// Returns the angle upwards from the observer's local horizontal plane.
    #[must_use]
    pub fn elevation(&self) -> Angle {
        self.elevation
    }

    /// Returns the slant (line-of-sight) distance from the observer to the
    /// target.
    #[must_use]
    pub fn range(&self) -> Length {
        self.range
    }

    /// Resolves this observation into [East-North-Up offsets](Enu) from the
    /// observer.
    ///
    /// The elevation splits the slant range into a horizontal projection
    /// `range·cos(el)` and a vertical part `range·sin(el)`; the azimuth then
    /// splits the horizontal projection between east and north.
    ///
    /// # Examples
    ///
    /// ```
    /// use approx::assert_abs_diff_eq;
    /// use uom::si::f64::{Angle, Length};
    /// use uom::si::{angle::degree, length::meter};
    /// use vantage::{aer, cartesian::EnuComponents, Aer, Enu};
    ///
    /// // due west on the horizon, so the offset is all westward (negative
    /// // east)
    /// let enu = Aer::build(aer::Components {
    ///     azimuth: Angle::new::<degree>(270.),
    ///     elevation: Angle::new::<degree>(0.),
    ///     range: Length::new::<meter>(91_440.),
    /// })
    /// .to_enu();
    ///
    /// assert_abs_diff_eq!(
    ///     enu,
    ///     Enu::build(EnuComponents {
    ///         east: Length::new::<meter>(-91_440.),
    ///         north: Length::new::<meter>(0.),
    ///         up: Length::new::<meter>(0.),
    ///     }),
    ///     epsilon = 1e-7
    /// );
    /// ```
    #[must_use]
    pub fn to_enu(&self) -> Enu {
        let az = self.azimuth.get::<radian>();
        let el = self.elevation.get::<radian>();
        let range = self.range.get::<meter>();

        // horizontal projection of the slant range
        let horizontal = range * el.cos();

        Enu::from_nalgebra_vector(Vector3::new(
            horizontal * az.sin(),
            horizontal * az.cos(),
            range * el.sin(),
        ))
    }

    /// Converts this observation into the target's absolute [`Ecef`]
    /// position, given the observer's own location.
    ///
    /// This is the full composition chain: the observation resolves into ENU
    /// offsets, those rotate into the ECEF-aligned [`Uvw`](crate::Uvw) frame
    /// at the observer's latitude and longitude, and the observer's own ECEF
    /// position translates the offset into an absolute position.
    #[must_use]
    pub fn to_ecef(&self, observer: &Geodetic) -> Ecef {
        observer.to_ecef() + self.to_enu().to_uvw(observer)
    }

    /// Converts this observation into the target's [`Geodetic`] latitude,
    /// longitude, and altitude, given the observer's own location.
    ///
    /// This is exactly [`Aer::to_ecef`] followed by
    /// [`Ecef::to_geodetic`].
    #[must_use]
    pub fn to_geodetic(&self, observer: &Geodetic) -> Geodetic {
        self.to_ecef(observer).to_geodetic()
    }
}

impl Display for Aer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bearing {:?}° at elevation {:?}°, {:?}m out",
            self.azimuth().get::<degree>(),
            self.elevation().get::<degree>(),
            self.range().get::<meter>(),
        )
    }
}
