//! Human-readable sizes.

const UNITS: &[(u64, &str)] = &[(1 << 30, "GB"), (1 << 20, "MB"), (1 << 10, "KB")];

/// Render a byte count with a 1024-based unit, keeping one decimal when it
/// is not zero. Negative counts keep their sign.
pub fn disk_usage_readable(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.unsigned_abs();

    let Some(&(scale, unit)) = UNITS.iter().find(|(scale, _)| magnitude >= *scale) else {
        return format!("{}{}B", sign, magnitude);
    };

    let tenths = (magnitude as f64 / scale as f64 * 10.0).round() as u64;
    if tenths % 10 == 0 {
        format!("{}{}{}", sign, tenths / 10, unit)
    } else {
        format!("{}{}.{}{}", sign, tenths / 10, tenths % 10, unit)
    }
}
