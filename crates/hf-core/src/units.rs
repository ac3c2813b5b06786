//! Conversions between clinical and SI pressure units.
//!
//! Clinical pressures are configured in mmHg while the solvers work in
//! pascal. Conversions go through `uom` so the factor stays consistent
//! with the rest of the ecosystem instead of a hand-typed constant.

use uom::si::f64::Pressure;
use uom::si::pressure::{millimeter_of_mercury, pascal};

/// Pa -> mmHg.
#[inline]
pub fn pa_to_mmhg(p_pa: f64) -> f64 {
    Pressure::new::<pascal>(p_pa).get::<millimeter_of_mercury>()
}

/// mmHg -> Pa.
#[inline]
pub fn mmhg_to_pa(p_mmhg: f64) -> f64 {
    Pressure::new::<millimeter_of_mercury>(p_mmhg).get::<pascal>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmhg_round_trip() {
        let p = mmhg_to_pa(120.0);
        assert!((pa_to_mmhg(p) - 120.0).abs() < 1e-9);
        // 120 mmHg is about 16 kPa
        assert!((p - 15_998.7).abs() < 1.0);
    }

    #[test]
    fn diastolic_pressure_in_pascal() {
        assert!((mmhg_to_pa(80.0) - 10_665.8).abs() < 0.5);
    }
}
