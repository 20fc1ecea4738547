//! Cartesian value types for the frames this crate converts between: the
//! absolute [`Ecef`] position and the observer-relative [`Enu`] and [`Uvw`]
//! offset vectors.

use crate::geodetic::Geodetic;
use crate::{Point3, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use uom::si::angle::radian;
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An absolute position in the [Earth-centered, Earth-fixed][ecef] (ECEF)
/// coordinate system.
///
/// ECEF is a right-handed Cartesian system with earth bounded axes:
///
/// - the origin is the Earth's center of mass;
/// - positive Z is towards the North pole;
/// - positive X is towards the prime meridian on the equator; and
/// - positive Y is towards 90°E on the equator.
///
/// Two observers with arbitrary position and orientation that name the same
/// `Ecef` coordinate are referring to the same absolute Earth-bound position.
///
/// `Ecef` is a _position_, not an offset; the difference of two positions is
/// a [`Uvw`] offset, and adding a [`Uvw`] to a position yields a position.
///
/// [ecef]: https://en.wikipedia.org/wiki/Earth-centered,_Earth-fixed_coordinate_system
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "point": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ecef {
    /// X, Y, Z in meters.
    pub(crate) point: Point3,
}

/// Components for constructing an [`Ecef`] position via [`Ecef::build`].
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct EcefComponents {
    pub x: Length,
    pub y: Length,
    pub z: Length,
}

impl Ecef {
    pub(crate) fn from_nalgebra_point(point: Point3) -> Self {
        Self { point }
    }

    /// Constructs an ECEF position from its Cartesian components.
    #[must_use]
    pub fn build(EcefComponents { x, y, z }: EcefComponents) -> Self {
        Self::from_nalgebra_point(Point3::new(
            x.get::<meter>(),
            y.get::<meter>(),
            z.get::<meter>(),
        ))
    }

    /// Constructs the position at the Earth's center of mass.
    ///
    /// Note that [`Ecef::to_geodetic`](crate::Ecef::to_geodetic) is
    /// unspecified at this exact position.
    #[must_use]
    pub fn origin() -> Self {
        Self {
            point: Point3::origin(),
        }
    }

    /// Returns the distance towards the prime meridian on the equatorial
    /// plane.
    #[must_use]
    pub fn x(&self) -> Length {
        Length::new::<meter>(self.point.x)
    }

    /// Returns the distance towards 90°E on the equatorial plane.
    #[must_use]
    pub fn y(&self) -> Length {
        Length::new::<meter>(self.point.y)
    }

    /// Returns the distance towards the North pole.
    #[must_use]
    pub fn z(&self) -> Length {
        Length::new::<meter>(self.point.z)
    }

    /// Computes the distance of this position from the Earth's center of
    /// mass.
    #[doc(alias = "norm")]
    #[must_use]
    pub fn distance_from_origin(&self) -> Length {
        Length::new::<meter>(self.point.coords.norm())
    }

    /// Computes the distance between this position and the given one.
    #[must_use]
    pub fn distance_from(&self, other: &Ecef) -> Length {
        (*other - *self).magnitude()
    }
}

impl Default for Ecef {
    fn default() -> Self {
        Self::origin()
    }
}

impl Display for Ecef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point)
    }
}

/// Offsetting an ECEF position by an ECEF-aligned vector yields another
/// position.
impl Add<Uvw> for Ecef {
    type Output = Ecef;

    fn add(self, rhs: Uvw) -> Self::Output {
        Ecef {
            point: self.point + rhs.inner,
        }
    }
}

impl AddAssign<Uvw> for Ecef {
    fn add_assign(&mut self, rhs: Uvw) {
        self.point += rhs.inner;
    }
}

impl Sub<Uvw> for Ecef {
    type Output = Ecef;

    fn sub(self, rhs: Uvw) -> Self::Output {
        Ecef {
            point: self.point - rhs.inner,
        }
    }
}

impl SubAssign<Uvw> for Ecef {
    fn sub_assign(&mut self, rhs: Uvw) {
        self.point -= rhs.inner;
    }
}

/// The difference of two ECEF positions is an origin-free, ECEF-aligned
/// offset, which is exactly what [`Uvw`] is.
impl Sub<Self> for Ecef {
    type Output = Uvw;

    fn sub(self, rhs: Self) -> Self::Output {
        Uvw::from_nalgebra_vector(self.point - rhs.point)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Ecef {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // NOTE: this value is in meters, and realistically we're fine with
        // .1m precision.
        Length::new::<meter>(0.1)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // NOTE: this measures whether the absolute difference in any _one_
        // component is off by more than epsilon, not whether the magnitude of
        // the vector between the positions is below epsilon.
        self.point.abs_diff_eq(&other.point, epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Ecef {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(Point3::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.point.relative_eq(
            &other.point,
            epsilon.get::<meter>(),
            max_relative.get::<meter>(),
        )
    }
}

/// An offset vector in the observer's [local tangent plane][ltp], with
/// East-North-Up axes:
///
/// - positive X is East;
/// - positive Y is North; and
/// - positive Z is away from the center of the Earth ("Up").
///
/// An `Enu` offset is only meaningful together with the observer it is
/// relative to: the same offset named by two different observers describes
/// two different displacements in absolute terms. The observer is therefore
/// passed explicitly wherever it is needed (see [`Enu::to_uvw`]).
///
/// [ltp]: https://en.wikipedia.org/wiki/Local_tangent_plane_coordinates#Local_east,_north,_up_(ENU)_coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Enu {
    /// East, North, Up in meters.
    pub(crate) inner: Vector3,
}

/// Components for constructing an [`Enu`] offset via [`Enu::build`].
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct EnuComponents {
    pub east: Length,
    pub north: Length,
    pub up: Length,
}

impl Enu {
    pub(crate) fn from_nalgebra_vector(inner: Vector3) -> Self {
        Self { inner }
    }

    /// Constructs an East-North-Up offset from its Cartesian components.
    #[must_use]
    pub fn build(EnuComponents { east, north, up }: EnuComponents) -> Self {
        Self::from_nalgebra_vector(Vector3::new(
            east.get::<meter>(),
            north.get::<meter>(),
            up.get::<meter>(),
        ))
    }

    /// Constructs the zero offset.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            inner: Vector3::zeros(),
        }
    }

    /// Returns the component towards East.
    #[must_use]
    pub fn east(&self) -> Length {
        Length::new::<meter>(self.inner.x)
    }

    /// Returns the component towards North.
    #[must_use]
    pub fn north(&self) -> Length {
        Length::new::<meter>(self.inner.y)
    }

    /// Returns the component away from the center of the Earth.
    #[must_use]
    pub fn up(&self) -> Length {
        Length::new::<meter>(self.inner.z)
    }

    /// Computes the magnitude of the offset (ie, its length).
    #[doc(alias = "norm")]
    #[must_use]
    pub fn magnitude(&self) -> Length {
        Length::new::<meter>(self.inner.norm())
    }

    /// Rotates this East-North-Up offset into [`Uvw`]: the frame whose axes
    /// are parallel to [`Ecef`]'s, but whose origin remains the observer.
    ///
    /// Only the observer's latitude and longitude participate -- a pure
    /// rotation knows nothing of altitude -- and the offset's magnitude is
    /// preserved. Adding the observer's own ECEF position to the result
    /// yields an absolute position; [`Aer::to_ecef`](crate::Aer::to_ecef)
    /// does exactly that.
    #[must_use]
    pub fn to_uvw(&self, observer: &Geodetic) -> Uvw {
        let lat = observer.latitude.get::<radian>();
        let lon = observer.longitude.get::<radian>();

        let east = self.inner.x;
        let north = self.inner.y;
        let up = self.inner.z;

        // tilt the north/up pair down to the equatorial plane, then swing the
        // result around the polar axis by the longitude
        let t = lat.cos() * up - lat.sin() * north;
        let w = lat.sin() * up + lat.cos() * north;
        let u = lon.cos() * t - lon.sin() * east;
        let v = lon.sin() * t + lon.cos() * east;

        Uvw::from_nalgebra_vector(Vector3::new(u, v, w))
    }
}

impl Default for Enu {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for Enu {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Add<Self> for Enu {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner + rhs.inner,
        }
    }
}

impl Sub<Self> for Enu {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner - rhs.inner,
        }
    }
}

impl Neg for Enu {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { inner: -self.inner }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Enu {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // in meters; .1m is plenty for offsets
        0.1
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Enu {
    fn default_max_relative() -> Self::Epsilon {
        Vector3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

/// An offset vector whose axes are parallel to [`Ecef`]'s, but whose origin
/// is still the observer it was measured from.
///
/// This is the halfway house between the observer-local [`Enu`] frame and an
/// absolute [`Ecef`] position: the rotation has been applied, the translation
/// has not. Adding the observer's ECEF position (`Ecef + Uvw`) completes the
/// journey.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Uvw {
    /// U, V, W in meters.
    pub(crate) inner: Vector3,
}

/// Components for constructing a [`Uvw`] offset via [`Uvw::build`].
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct UvwComponents {
    pub u: Length,
    pub v: Length,
    pub w: Length,
}

impl Uvw {
    pub(crate) fn from_nalgebra_vector(inner: Vector3) -> Self {
        Self { inner }
    }

    /// Constructs an ECEF-aligned offset from its Cartesian components.
    #[must_use]
    pub fn build(UvwComponents { u, v, w }: UvwComponents) -> Self {
        Self::from_nalgebra_vector(Vector3::new(
            u.get::<meter>(),
            v.get::<meter>(),
            w.get::<meter>(),
        ))
    }

    /// Constructs the zero offset.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            inner: Vector3::zeros(),
        }
    }

    /// Returns the component parallel to ECEF X.
    #[must_use]
    pub fn u(&self) -> Length {
        Length::new::<meter>(self.inner.x)
    }

    /// Returns the component parallel to ECEF Y.
    #[must_use]
    pub fn v(&self) -> Length {
        Length::new::<meter>(self.inner.y)
    }

    /// Returns the component parallel to ECEF Z.
    #[must_use]
    pub fn w(&self) -> Length {
        Length::new::<meter>(self.inner.z)
    }

    /// Computes the magnitude of the offset (ie, its length).
    #[doc(alias = "norm")]
    #[must_use]
    pub fn magnitude(&self) -> Length {
        Length::new::<meter>(self.inner.norm())
    }
}

impl Default for Uvw {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for Uvw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Add<Self> for Uvw {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner + rhs.inner,
        }
    }
}

impl Sub<Self> for Uvw {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner - rhs.inner,
        }
    }
}

impl Neg for Uvw {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { inner: -self.inner }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Uvw {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // in meters; .1m is plenty for offsets
        0.1
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for Uvw {
    fn default_max_relative() -> Self::Epsilon {
        Vector3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::{EcefComponents, EnuComponents, UvwComponents};
    use crate::geodetic::{self, Geodetic};
    use crate::{Ecef, Enu, Uvw};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::quickcheck;
    use rstest::rstest;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }
    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    fn observer(lat: f64, lon: f64) -> Geodetic {
        Geodetic::build(geodetic::Components {
            latitude: d(lat),
            longitude: d(lon),
            altitude: m(0.),
        })
        .expect("latitude is in [-90°, 90°]")
    }

    #[test]
    fn known_enu_to_uvw() {
        let enu = Enu::build(EnuComponents {
            east: m(-91_440.),
            north: m(0.),
            up: m(0.),
        });

        assert_abs_diff_eq!(
            enu.to_uvw(&observer(34.25, 33.23)),
            Uvw::build(UvwComponents {
                u: m(50_109.236_785_681_62),
                v: m(-76_487.502_173_6),
                w: m(0.),
            }),
            epsilon = 1e-7
        );
    }

    #[rstest]
    // at lat 0, lon 0, the tangent plane's east is ECEF +Y and its up is
    // ECEF +X
    #[case(0., 0., (1., 0., 0.), (0., 1., 0.))]
    #[case(0., 0., (0., 0., 1.), (1., 0., 0.))]
    #[case(0., 0., (0., 1., 0.), (0., 0., 1.))]
    // at the north pole, up is ECEF +Z
    #[case(90., 0., (0., 0., 1.), (0., 0., 1.))]
    fn axes_line_up(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] enu: (f64, f64, f64),
        #[case] uvw: (f64, f64, f64),
    ) {
        let offset = Enu::build(EnuComponents {
            east: m(enu.0),
            north: m(enu.1),
            up: m(enu.2),
        });
        assert_abs_diff_eq!(
            offset.to_uvw(&observer(lat, lon)),
            Uvw::build(UvwComponents {
                u: m(uvw.0),
                v: m(uvw.1),
                w: m(uvw.2),
            }),
            epsilon = 1e-9
        );
    }

    quickcheck! {
        fn rotation_preserves_magnitude(east: i16, north: i16, up: i16, lat: i16, lon: i16) -> () {
            let enu = Enu::build(EnuComponents {
                east: m(east as f64),
                north: m(north as f64),
                up: m(up as f64),
            });
            let uvw = enu.to_uvw(&observer((lat % 90) as f64, (lon % 180) as f64));

            assert_relative_eq!(
                uvw.magnitude().get::<meter>(),
                enu.magnitude().get::<meter>(),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn offsets_compose_with_positions() {
        let position = Ecef::build(EcefComponents {
            x: m(4_414_779.4),
            y: m(2_892_253.2),
            z: m(3_569_485.2),
        });
        let offset = Uvw::build(UvwComponents {
            u: m(100.),
            v: m(-200.),
            w: m(300.),
        });

        let shifted = position + offset;
        assert_relative_eq!(shifted - position, offset, epsilon = 1e-9);
        assert_relative_eq!(shifted - offset, position, epsilon = m(1e-9));
        assert_relative_eq!(
            position.distance_from(&shifted).get::<meter>(),
            offset.magnitude().get::<meter>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn neg_mirrors_components() {
        let enu = Enu::build(EnuComponents {
            east: m(10.),
            north: m(-5.),
            up: m(3.5),
        });
        assert_relative_eq!(
            -enu,
            Enu::build(EnuComponents {
                east: m(-10.),
                north: m(5.),
                up: m(-3.5),
            }),
            epsilon = 1e-12
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_is_lossless() {
        let position = Ecef::build(EcefComponents {
            x: m(4_464_888.640_990_304),
            y: m(2_815_765.744_895_992),
            z: m(3_569_485.175_001_791_7),
        });

        let yaml = serde_yaml::to_string(&position).expect("Ecef serializes");
        let back: Ecef = serde_yaml::from_str(&yaml).expect("Ecef deserializes");
        assert_eq!(position, back);
    }
}
