//! Conversions between the three units the pipeline touches: dxa (twentieths
//! of a point, OOXML's row/column unit), millimeters, and EMU (drawing units,
//! 36000 per millimeter).
//!
//! Missing source values travel as `None`, never as 0 — a 0-size cell is
//! physically invalid and would silently corrupt downstream geometry.

/// One point is 0.3528 mm; dxa is 1/20 pt. Result rounded to 2 decimals.
pub fn dxa_to_mm(dxa: u32) -> f64 {
    round2(dxa as f64 * 0.3528 / 20.0)
}

pub fn dxa_to_mm_opt(dxa: Option<u32>) -> Option<f64> {
    dxa.map(dxa_to_mm)
}

/// Millimeters to English Metric Units. Exact scalar multiplication.
pub fn mm_to_emu(mm: f64) -> i64 {
    (mm * 36000.0).round() as i64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dxa_to_mm_matches_template_cells() {
        // 1600 dxa * 0.3528 / 20 = 28.224 → 28.22
        assert_eq!(dxa_to_mm(1600), 28.22);
        assert_eq!(dxa_to_mm(800), 14.11);
    }

    #[test]
    fn mm_to_emu_is_exact_scaling() {
        assert_eq!(mm_to_emu(1.0), 36_000);
        assert_eq!(mm_to_emu(28.22), 1_015_920);
        assert_eq!(mm_to_emu(0.0), 0);
    }

    #[test]
    fn missing_dxa_stays_missing() {
        assert_eq!(dxa_to_mm_opt(None), None);
        assert_eq!(dxa_to_mm_opt(Some(200)), Some(3.53));
    }
}
