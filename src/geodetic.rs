//! Geodetic positions on the WGS-84 reference ellipsoid, and the transforms
//! between them and [`Ecef`].

use crate::cartesian::Ecef;
use crate::util::BoundedAngle;
use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Parameters of the WGS-84 ellipsoid.
// https://nsgreg.nga.mil/doc/view?i=4085 table 3.1
#[doc(alias = "equatorial radius")]
#[doc(alias = "a")]
pub(crate) const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
#[doc(alias = "polar radius")]
#[doc(alias = "b")]
pub(crate) const SEMI_MINOR_AXIS: f64 = 6_356_752.314_245_18;

/// Representing an Earth-bound location using the [World Geodetic System
/// '84](https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84):
/// geodetic latitude, longitude, and altitude above the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geodetic {
    // NOTE: uom does not guarantee how these angles are normalized -- they
    // might be [-180,180) or [0,360), or something else altogether. we do not
    // normalize them ourselves because callers will generally not care
    // (they're more likely to feed the value into some other formula that
    // also doesn't care).
    pub(crate) latitude: Angle,
    pub(crate) longitude: Angle,
    altitude: Length,
}

impl Geodetic {
    /// Constructs a world location from latitude, longitude, and altitude.
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, this function
    /// returns `None`.
    ///
    /// The altitude is measured as distance above the WGS-84 datum reference
    /// ellipsoid.
    #[must_use]
    pub fn build(
        Components {
            latitude,
            longitude,
            altitude,
        }: Components,
    ) -> Option<Self> {
        Some(
            Self::builder()
                .latitude(latitude)?
                .longitude(longitude)
                .altitude(altitude)
                .build(),
        )
    }

    /// Provides a constructor for a [`Geodetic`] location.
    pub fn builder() -> Builder<MissingLatitude, MissingLongitude, MissingAltitude> {
        Builder {
            under_construction: Geodetic {
                latitude: Angle::ZERO,
                longitude: Angle::ZERO,
                altitude: Length::ZERO,
            },
            has: (PhantomData, PhantomData, PhantomData),
        }
    }

    /// Returns the number of degrees latitude north of the equator
    /// ("northing").
    ///
    /// The returned value is always in [-90°, 90°].
    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.latitude).to_signed_range())
    }

    /// Returns the number of degrees longitude east of the [IERS Reference
    /// Meridian] near Greenwich ("easting").
    ///
    /// [IERS Reference Meridian]: https://en.wikipedia.org/wiki/IERS_Reference_Meridian
    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.longitude).to_signed_range())
    }

    /// Returns the distance beyond the WGS-84 vertical datum, ie the WGS-84
    /// ellipsoid.
    ///
    /// Note that the WGS-84 ellipsoid is an approximation and does not
    /// perfectly align with ground level. Thus, while this is similar to
    /// altitude above sea/ground level, it is not equal to either of those
    /// measures. Locations below the ellipsoid surface have negative
    /// altitude.
    #[must_use]
    pub fn altitude(&self) -> Length {
        self.altitude
    }

    /// Computes the [great-circle distance] between the two locations on the
    /// surface of the earth.
    ///
    /// Note that this is an approximation as the earth is not a perfect
    /// sphere.
    ///
    /// The current implementation computes this [using the archaversine]
    /// (inverse haversine).
    ///
    /// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
    /// [using the archaversine]: https://en.wikipedia.org/wiki/Haversine_formula#Formulation
    #[doc(alias = "great_circle_distance")]
    #[must_use]
    pub fn haversine_distance_on_surface(&self, other: &Geodetic) -> Length {
        let central_angle = central_angle_by_inverse_haversine(
            self.latitude,
            other.latitude,
            self.longitude,
            other.longitude,
        );

        central_angle * Length::new::<meter>(SEMI_MAJOR_AXIS)
    }

    /// Converts this geodetic location to an [`Ecef`] position.
    ///
    /// This is the closed-form forward transform: with `N` the prime-vertical
    /// radius of curvature at the latitude `φ`,
    ///
    /// - `x = (N + h)·cos φ·cos λ`
    /// - `y = (N + h)·cos φ·sin λ`
    /// - `z = (N·(b/a)² + h)·sin φ`
    ///
    /// Defined for all finite inputs; at the poles `x` and `y` collapse to
    /// (numerically almost) zero.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>
    #[must_use]
    pub fn to_ecef(&self) -> Ecef {
        let lat = self.latitude.get::<radian>();
        let lon = self.longitude.get::<radian>();
        let h = self.altitude.get::<meter>();

        // https://en.wikipedia.org/wiki/Earth_radius#Prime_vertical
        let n = SEMI_MAJOR_AXIS.powi(2)
            / (SEMI_MAJOR_AXIS.powi(2) * lat.cos().powi(2)
                + SEMI_MINOR_AXIS.powi(2) * lat.sin().powi(2))
            .sqrt();

        let x = (n + h) * lat.cos() * lon.cos();
        let y = (n + h) * lat.cos() * lon.sin();
        let z = (n * (SEMI_MINOR_AXIS / SEMI_MAJOR_AXIS).powi(2) + h) * lat.sin();

        Ecef::from_nalgebra_point(Point3::new(x, y, z))
    }
}

impl Ecef {
    /// Converts this absolute position into geodetic latitude, longitude,
    /// and altitude.
    ///
    /// Unlike the forward transform, the inverse has no elementary closed
    /// form. This implementation uses a direct (iteration-free)
    /// Vermeille-style solution: recover the parametric latitude `β` on the
    /// confocal ellipsoid through the point, apply a single Newton
    /// correction, and read geodetic latitude and altitude off `β`. The
    /// single correction already resolves Earth-bound inputs to well below
    /// f64 noise, so the step is deliberately not iterated.
    ///
    /// Positions below the ellipsoid surface report a negative altitude.
    ///
    /// The result is well-defined for every finite position except the exact
    /// ECEF origin (the Earth's center of mass), where latitude and longitude
    /// are mathematically meaningless; the value returned there is
    /// unspecified.
    #[must_use]
    pub fn to_geodetic(&self) -> Geodetic {
        let x = self.point.x;
        let y = self.point.y;
        let z = self.point.z;

        let r = (x.powi(2) + y.powi(2) + z.powi(2)).sqrt();
        // linear eccentricity: distance from the center to either focus
        let e = (SEMI_MAJOR_AXIS.powi(2) - SEMI_MINOR_AXIS.powi(2)).sqrt();

        // semi-minor axis of the confocal ellipsoid through the point
        // (eqn. 4a)
        let u = (0.5 * (r.powi(2) - e.powi(2))
            + 0.5 * ((r.powi(2) - e.powi(2)).powi(2) + 4. * e.powi(2) * z.powi(2)).sqrt())
        .sqrt();

        let q = x.hypot(y);
        let hu_e = u.hypot(e);

        // parametric latitude (eqn. 4b). the ratio divides by both `u` and
        // `q`; on the polar axis (or when `u` underflows to zero) it is
        // undefined, so fall back to the pole the point sits on instead of
        // letting a NaN through.
        let mut beta = if u == 0. || q == 0. {
            if z >= 0. {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            }
        } else {
            (hu_e / u * z / q).atan()
        };

        // one Newton correction towards the true parametric latitude
        // (eqn. 13); applied exactly once, never iterated
        beta += ((SEMI_MINOR_AXIS * u - SEMI_MAJOR_AXIS * hu_e + e.powi(2)) * beta.sin())
            / (SEMI_MAJOR_AXIS * hu_e / beta.cos() - e.powi(2) * beta.cos());

        let lat = (SEMI_MAJOR_AXIS / SEMI_MINOR_AXIS * beta.tan()).atan();
        let lon = y.atan2(x);

        // distance from the surface point at `β` (eqn. 7)
        let mut alt = (z - SEMI_MINOR_AXIS * beta.sin()).hypot(q - SEMI_MAJOR_AXIS * beta.cos());

        // inside the ellipsoid, altitude is reported negative. WGS-84 is
        // biaxial, so the equatorial radius `a` is the denominator under
        // both horizontal terms here.
        let inside = x.powi(2) / SEMI_MAJOR_AXIS.powi(2)
            + y.powi(2) / SEMI_MAJOR_AXIS.powi(2)
            + z.powi(2) / SEMI_MINOR_AXIS.powi(2)
            < 1.;
        if inside {
            alt = -alt;
        }

        Geodetic::builder()
            .latitude(Angle::new::<radian>(lat))
            .expect("atan yields latitude in [-90°, 90°]")
            .longitude(Angle::new::<radian>(lon))
            .altitude(Length::new::<meter>(alt))
            .build()
    }
}

impl From<Ecef> for Geodetic {
    fn from(ecef: Ecef) -> Self {
        ecef.to_geodetic()
    }
}

impl From<Geodetic> for Ecef {
    fn from(geodetic: Geodetic) -> Self {
        geodetic.to_ecef()
    }
}

impl Display for Geodetic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let lat = self.latitude();
        let lat_is_positive = lat.is_sign_positive();
        let lat = lat.abs().get::<degree>();
        let lon = self.longitude();
        let lon_is_positive = lon.is_sign_positive();
        let lon = lon.abs().get::<degree>();
        let alt = self.altitude.get::<meter>();
        match (lat_is_positive, lon_is_positive) {
            (true, true) => write!(f, "{lat}°N, {lon}°E, {alt}m"),
            (true, false) => write!(f, "{lat}°N, {lon}°W, {alt}m"),
            (false, true) => write!(f, "{lat}°S, {lon}°E, {alt}m"),
            (false, false) => write!(f, "{lat}°S, {lon}°W, {alt}m"),
        }
    }
}

/// Computes the central angle between the given lat/lon locations.
///
/// To turn this angle into [great-circle distance], multiply this value by
/// the radius of the sphere (ie, of the earth).
///
/// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
fn central_angle_by_inverse_haversine(
    lat_a: Angle,
    lat_b: Angle,
    lon_a: Angle,
    lon_b: Angle,
) -> Angle {
    let lat_a = lat_a.get::<radian>(); // φ1
    let lat_b = lat_b.get::<radian>(); // φ2
    let lon_a = lon_a.get::<radian>(); // λ1
    let lon_b = lon_b.get::<radian>(); // λ2
    let delta_lat = lat_b - lat_a;
    let delta_lon = lon_b - lon_a;

    let inner = 1. - delta_lat.cos() + lat_a.cos() * lat_b.cos() * (1. - delta_lon.cos());
    Angle::new::<radian>(2. * (inner / 2.).sqrt().asin())
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Geodetic {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // NOTE: this value is in meters. we kind of have to be satisfied with
        // sub-meter rather than sub-millimeter precision here since the
        // conversion from ECEF to lat/lon is inherently lossy (it needs the
        // tangent to the curvature of the earth, which challenges f64's
        // epsilon).
        Length::new::<meter>(0.75)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.haversine_distance_on_surface(other) < epsilon
            && self
                .altitude
                .get::<meter>()
                .abs_diff_eq(&other.altitude.get::<meter>(), epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Geodetic {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(f64::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.haversine_distance_on_surface(other)
            .get::<meter>()
            .abs_diff_eq(&0., epsilon.get::<meter>())
            && self.altitude.get::<meter>().relative_eq(
                &other.altitude.get::<meter>(),
                epsilon.get::<meter>(),
                max_relative.get::<meter>(),
            )
    }
}

/// Argument type for [`Geodetic::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct Components {
    /// The latitude angle of the proposed [`Geodetic`] location.
    ///
    /// The latitude must be in [-90°,90°] % 360°; [`Geodetic::build`] returns
    /// `None` otherwise.
    pub latitude: Angle,

    /// The longitude angle of the proposed [`Geodetic`] location.
    pub longitude: Angle,

    /// The altitude of the proposed [`Geodetic`] location.
    ///
    /// The altitude is measured as distance above the WGS-84 datum reference
    /// ellipsoid.
    pub altitude: Length,
}

/// Used to indicate that a partially-constructed [`Geodetic`] is missing the
/// latitude component.
pub struct MissingLatitude;
/// Used to indicate that a partially-constructed [`Geodetic`] has the
/// latitude component set.
pub struct HasLatitude;
/// Used to indicate that a partially-constructed [`Geodetic`] is missing the
/// longitude component.
pub struct MissingLongitude;
/// Used to indicate that a partially-constructed [`Geodetic`] has the
/// longitude component set.
pub struct HasLongitude;
/// Used to indicate that a partially-constructed [`Geodetic`] is missing the
/// altitude component.
pub struct MissingAltitude;
/// Used to indicate that a partially-constructed [`Geodetic`] has the
/// altitude component set.
pub struct HasAltitude;

/// [Builder] for a [`Geodetic`] location.
///
/// Construct one through [`Geodetic::builder`], and finalize with
/// [`Builder::build`].
///
/// [Builder]: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
#[derive(Debug)]
#[must_use]
pub struct Builder<Latitude, Longitude, Altitude> {
    under_construction: Geodetic,
    has: (
        PhantomData<Latitude>,
        PhantomData<Longitude>,
        PhantomData<Altitude>,
    ),
}

impl<L1, L2, A> Clone for Builder<L1, L2, A> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L1, L2, A> Copy for Builder<L1, L2, A> {}

impl<L1, L2, A> Builder<L1, L2, A> {
    /// Sets the latitudal angle of the [`Geodetic`]-to-be.
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, this function
    /// returns `None`.
    pub fn latitude(mut self, latitude: impl Into<Angle>) -> Option<Builder<HasLatitude, L2, A>> {
        let latitude = latitude.into();
        let latitude_in_signed_radians = BoundedAngle::new(latitude).to_signed_range();
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2)
            .contains(&latitude_in_signed_radians)
        {
            None
        } else {
            self.under_construction.latitude = latitude;
            Some(Builder {
                under_construction: self.under_construction,
                has: (PhantomData::<HasLatitude>, self.has.1, self.has.2),
            })
        }
    }

    /// Sets the longitudal angle of the [`Geodetic`]-to-be.
    pub fn longitude(mut self, longitude: impl Into<Angle>) -> Builder<L1, HasLongitude, A> {
        self.under_construction.longitude = longitude.into();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, PhantomData::<HasLongitude>, self.has.2),
        }
    }

    /// Sets the altitude of the [`Geodetic`]-to-be.
    ///
    /// The altitude is measured as distance above the WGS-84 datum reference
    /// ellipsoid.
    pub fn altitude(mut self, altitude: impl Into<Length>) -> Builder<L1, L2, HasAltitude> {
        self.under_construction.altitude = altitude.into();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, self.has.1, PhantomData::<HasAltitude>),
        }
    }
}

impl Builder<HasLatitude, HasLongitude, HasAltitude> {
    #[must_use]
    pub fn build(self) -> Geodetic {
        self.under_construction
    }
}
