use uom::si::angle::radian;
use uom::si::f64::Angle;

/// An angle normalized into [0°, 360°).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoundedAngle {
    angle: Angle,
}

impl BoundedAngle {
    pub(crate) fn new(angle: impl Into<Angle>) -> Self {
        Self {
            // NOTE: even though we put the value into bounds here, uom may
            // choose to store the value differently-normalized, so we must
            // normalize on output as well.
            angle: Angle::new::<radian>(Self::into_bounds(angle.into())),
        }
    }

    /// Returns the angle in [0°, 360°) in radians.
    pub(crate) fn get_bounded(self) -> f64 {
        Self::into_bounds(self.angle)
    }

    fn into_bounds(angle: Angle) -> f64 {
        let out_of_bounds: f64 = angle.get::<radian>();
        out_of_bounds.rem_euclid(Angle::FULL_TURN.get::<radian>())
    }

    /// Returns the angle in [-180°, 180°) in radians.
    pub(crate) fn to_signed_range(self) -> f64 {
        let angle = self.get_bounded();
        if angle < Angle::HALF_TURN.get::<radian>() {
            angle
        } else {
            angle - Angle::FULL_TURN.get::<radian>()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedAngle;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::angle::{degree, radian};
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[test]
    fn negative_radians_wrap_up() {
        let out_of_bounds = -(0.5 * Angle::HALF_TURN);
        let sut = BoundedAngle::new(out_of_bounds);
        assert_eq!(sut.get_bounded(), 1.5 * Angle::HALF_TURN.get::<radian>());
    }

    #[test]
    fn negative_degrees_wrap_up() {
        let sut = BoundedAngle::new(d(-390.));
        assert_relative_eq!(
            sut.get_bounded(),
            330.0_f64.to_radians(),
            epsilon = 0.000_000_001
        );
    }

    #[rstest]
    #[case(d(0.), 0.)]
    #[case(d(180.), -180.)]
    #[case(d(359.), -1.)]
    #[case(d(90.), 90.)]
    #[case(d(270.), -90.)]
    #[case(d(-90.), -90.)]
    #[case(d(-180.), -180.)]
    #[case(d(360.), 0.)]
    #[case(d(360. + 120.), 120.)]
    #[case(d(360. + 340.), -20.)]
    fn to_signed_range_converts_correctly(
        #[case] input: Angle,
        #[case] expected_result_in_degrees: f64,
    ) {
        let bounded = BoundedAngle::new(input);

        assert_relative_eq!(
            bounded.to_signed_range(),
            expected_result_in_degrees.to_radians(),
            epsilon = f64::EPSILON * 1000.
        );
    }
}
