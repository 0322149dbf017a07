//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Limit a value to the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
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

/// Raise the magnitude of `value` to `exp`, keeping the sign of `value`.
///
/// Zero maps to zero for any exponent.
pub fn signed_powf<T>(value: T, exp: T) -> T
where
    T: Float
{
    if value == T::zero() {
        return T::zero();
    }

    value.abs().powf(exp) * value.signum()
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in radians into the range `[-pi, pi)`.
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float + FloatConst
{
    rem_euclid(value + T::PI(), T::PI() + T::PI()) - T::PI()
}
