//! Wind components to speed and direction, with the placeholder used when a level has no wind.
use itertools::izip;
use metfor::{Knots, Quantity, WindSpdDir, WindUV};
use optional::Optioned;

/// Placeholder wind for levels where the components are absent or unusable. It is not derived
/// from anything.
pub const DEFAULT_WIND: WindSpdDir<Knots> = WindSpdDir {
    speed: Knots(5.0),
    direction: 270.0,
};

/// Speed and direction from components, `None` unless both are present and the result is
/// finite. Direction is where the wind blows from, in degrees on `[0, 360)`.
pub fn observed_wind(u: Optioned<Knots>, v: Optioned<Knots>) -> Option<WindSpdDir<Knots>> {
    let (u, v) = (u.into_option()?, v.into_option()?);
    if !(u.unpack().is_finite() && v.unpack().is_finite()) {
        return None;
    }

    let WindSpdDir { speed, direction }: WindSpdDir<Knots> = WindSpdDir::from(WindUV { u, v });
    let direction = direction.rem_euclid(360.0);

    if speed.unpack().is_finite() && direction.is_finite() {
        Some(WindSpdDir { speed, direction })
    } else {
        None
    }
}

/// Speed and direction from components, falling back to `DEFAULT_WIND`.
#[inline]
pub fn wind_speed_direction(u: Optioned<Knots>, v: Optioned<Knots>) -> WindSpdDir<Knots> {
    observed_wind(u, v).unwrap_or(DEFAULT_WIND)
}

/// Apply `wind_speed_direction` level by level.
pub fn wind_profile(u: &[Optioned<Knots>], v: &[Optioned<Knots>]) -> Vec<WindSpdDir<Knots>> {
    izip!(u, v)
        .map(|(&u, &v)| wind_speed_direction(u, v))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use optional::{none, some};

    #[test]
    fn test_observed_wind() {
        // From the west
        let w = observed_wind(some(Knots(10.0)), some(Knots(0.0))).unwrap();
        assert!(approx_equal(w.speed.unpack(), 10.0, 1.0e-9));
        assert!(approx_equal(w.direction, 270.0, 1.0e-6));

        // From the south
        let w = observed_wind(some(Knots(0.0)), some(Knots(10.0))).unwrap();
        assert!(approx_equal(w.direction, 180.0, 1.0e-6));

        // From the northeast
        let w = observed_wind(some(Knots(-3.0)), some(Knots(-4.0))).unwrap();
        assert!(approx_equal(w.speed.unpack(), 5.0, 1.0e-9));
        assert!(approx_equal(w.direction, 36.869_897_645, 1.0e-6));
    }

    #[test]
    fn test_missing_or_nan_falls_back() {
        // A NaN from the grid is stored as missing.
        let w = wind_speed_direction(none(), some(Knots(3.0)));
        assert_eq!(w.speed, Knots(5.0));
        assert_eq!(w.direction, 270.0);

        let w = wind_speed_direction(some(Knots(std::f64::INFINITY)), some(Knots(3.0)));
        assert_eq!(w.speed, Knots(5.0));
        assert_eq!(w.direction, 270.0);
    }

    #[test]
    fn test_wind_profile() {
        let u = vec![some(Knots(10.0)), none()];
        let v = vec![some(Knots(0.0)), some(Knots(1.0))];
        let winds = wind_profile(&u, &v);
        assert_eq!(winds.len(), 2);
        assert!(approx_equal(winds[0].direction, 270.0, 1.0e-6));
        assert_eq!(winds[1].speed, DEFAULT_WIND.speed);
    }
}
