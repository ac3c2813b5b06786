use crate::HfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Reject NaN/inf before a value enters the step loop.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HfError::NonFinite { what, value: v })
    }
}
