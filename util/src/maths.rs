//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Return the euclidian norm (distance between) of two points.
///
/// If the points do not have the same number of dimentions then `None` is
/// returned.
pub fn norm<T>(point_0: &[T], point_1: &[T]) -> Option<T>
where
    T: Float + std::ops::AddAssign,
{
    if point_0.len() != point_1.len() {
        return None;
    }

    let mut sum = T::from(0).unwrap();

    for i in 0..point_0.len() {
        sum += (point_0[i] - point_1[i]).powi(2);
    }

    Some(sum.sqrt())
}

/// Clamp a value between a minimum and maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Normalise an angle into the range (-pi, pi].
///
/// All yaw values handled by the control core are stored and compared in
/// this form.
pub fn norm_angle<T>(angle: T) -> T
where
    T: Float,
{
    let pi = T::from(std::f64::consts::PI).unwrap();
    let tau = T::from(std::f64::consts::TAU).unwrap();

    pi - rem_euclid(pi - angle, tau)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 1f64), (0f64, 10f64), 0.5), 5.0);
        assert_eq!(lin_map((-1f64, 1f64), (0f64, 1f64), 0.0), 0.5);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[0f64, 0f64], &[3f64, 4f64]), Some(5.0));
        assert_eq!(norm::<f64>(&[0.0], &[0.0, 0.0]), None);
    }

    #[test]
    fn test_norm_angle() {
        assert_eq!(norm_angle(0f64), 0f64);
        assert_eq!(norm_angle(PI), PI);
        // -pi is out of range and must wrap to +pi
        assert_eq!(norm_angle(-PI), PI);
        assert!((norm_angle(3.0 * PI) - PI).abs() < 1e-9);
        assert!((norm_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-9);
        assert!((norm_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&2f64, &-1f64, &1f64), 1.0);
        assert_eq!(clamp(&-2f64, &-1f64, &1f64), -1.0);
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5);
    }
}
