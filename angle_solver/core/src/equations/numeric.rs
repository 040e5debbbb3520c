//! Numeric cleanup of solved values

use crate::config::LinearConfig;

/// Snap values within `snap_epsilon` of an integer, then round to `decimals`
pub fn clean(value: f64, config: &LinearConfig) -> f64 {
    let nearest = value.round();
    let snapped = if (value - nearest).abs() < config.snap_epsilon {
        nearest
    } else {
        value
    };
    let scale = 10f64.powi(config.decimals as i32);
    let rounded = (snapped * scale).round() / scale;
    // avoid "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Shortest decimal rendering: `70`, `72.5`, `-3.25`
pub fn format_number(value: f64) -> String {
    let value = clean(value, &LinearConfig::default());
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.7}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snaps_and_rounds() {
        let config = LinearConfig::default();

        assert_eq!(clean(69.9999999999, &config), 70.0);
        assert_eq!(clean(1.0 / 3.0, &config), 0.3333333);
        assert_eq!(clean(-0.00000000001, &config), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(70.0), "70");
        assert_eq!(format_number(72.5), "72.5");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(109.99999999999), "110");
    }
}
