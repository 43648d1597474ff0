/// Round to three decimals, the precision used by every report.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
