//! This library converts observer-relative sensor measurements into absolute
//! Earth-bound positions (and back), using the WGS-84 reference ellipsoid.
//!
//! A tracking radar, a camera gimbal, or a simulation reports a detection as
//! an [azimuth, elevation, and slant range](Aer) measured from a surveyed
//! observer position. Turning that into a position another system can use
//! means walking a chain of coordinate frames:
//!
//! 1. [`Aer`] resolves into [East-North-Up offsets](Enu) in the observer's
//!    local tangent plane ([`Aer::to_enu`]);
//! 2. the ENU offset is rotated into [`Uvw`], a frame whose axes are parallel
//!    to [ECEF](Ecef) but whose origin is still the observer
//!    ([`Enu::to_uvw`]);
//! 3. adding the observer's own ECEF position yields the target's absolute
//!    [`Ecef`] position ([`Aer::to_ecef`]); and
//! 4. the closed-form inverse recovers [geodetic
//!    latitude/longitude/altitude](Geodetic) from ECEF
//!    ([`Ecef::to_geodetic`]).
//!
//! Each frame gets its own type so that the compiler refuses to, say, add a
//! not-yet-rotated ENU offset to an ECEF position. The numeric pipeline
//! itself is plain scalar `f64` math; every operation is pure and
//! allocation-free, so calls can run on any thread with no coordination.
//!
//! # Examples
//!
//! A radar on the coast observes a target due west, on the horizon, 50
//! nautical miles out, and we want the target's latitude and longitude:
//!
//! ```
//! use uom::si::f64::{Angle, Length};
//! use uom::si::{angle::degree, length::meter};
//! use vantage::{aer, Aer, Geodetic};
//!
//! // the radar site, surveyed in WGS-84
//! let site = Geodetic::builder()
//!     .latitude(Angle::new::<degree>(34.25))
//!     .expect("latitude is in [-90°, 90°]")
//!     .longitude(Angle::new::<degree>(33.23))
//!     .altitude(Length::new::<meter>(146.304))
//!     .build();
//!
//! // what the radar saw
//! let detection = Aer::build(aer::Components {
//!     azimuth: Angle::new::<degree>(270.),   // clockwise from north
//!     elevation: Angle::new::<degree>(0.),   // upwards from the horizon
//!     range: Length::new::<meter>(91_440.),  // slant distance
//! });
//!
//! // absolute position of the target
//! let target = detection.to_geodetic(&site);
//! assert!((target.latitude().get::<degree>() - 34.24598189).abs() < 1e-7);
//! assert!((target.longitude().get::<degree>() - 32.23743112).abs() < 1e-7);
//! assert!((target.altitude().get::<meter>() - 801.02382184).abs() < 1e-7);
//! ```
//!
//! If an intermediate result is what you're after, the same chain can be
//! walked step by step; [`Ecef`] positions and [`Uvw`] offsets compose with
//! ordinary vector algebra:
//!
//! ```
//! # use uom::si::f64::{Angle, Length};
//! # use uom::si::{angle::degree, length::meter};
//! # use vantage::{aer, Aer, Geodetic};
//! # let site = Geodetic::builder()
//! #     .latitude(Angle::new::<degree>(34.25))
//! #     .expect("latitude is in [-90°, 90°]")
//! #     .longitude(Angle::new::<degree>(33.23))
//! #     .altitude(Length::new::<meter>(146.304))
//! #     .build();
//! # let detection = Aer::build(aer::Components {
//! #     azimuth: Angle::new::<degree>(270.),
//! #     elevation: Angle::new::<degree>(0.),
//! #     range: Length::new::<meter>(91_440.),
//! # });
//! let target_in_ecef = site.to_ecef() + detection.to_enu().to_uvw(&site);
//! assert_eq!(target_in_ecef, detection.to_ecef(&site));
//! ```

pub mod aer;
pub mod cartesian;
pub mod geodetic;
mod util;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;

pub use aer::Aer;
pub use cartesian::{Ecef, Enu, Uvw};
pub use geodetic::Geodetic;
