// src/normalization/address.rs

/// Keeps only the ASCII digits of a postcode. May return an empty string.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parses a coordinate and rounds it to two decimal places.
/// Returns `None` when the value, or its rounded form, is not a finite number.
pub fn round_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rounded = (value * 100.0).round() / 100.0;
    // scaling near f64::MAX overflows; the result must parse back as finite
    if !rounded.is_finite() {
        return None;
    }
    // avoid "-0" in the output table
    Some(if rounded == 0.0 { 0.0 } else { rounded })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postcode_digits_only() {
        assert_eq!(normalize_postcode("SC 29526-1234"), "295261234");
        assert_eq!(normalize_postcode("29527"), "29527");
        assert_eq!(normalize_postcode("EC1A"), "1");
        assert_eq!(normalize_postcode("N/A"), "");
    }

    #[test]
    fn test_coordinates_round_to_two_places() {
        assert_eq!(round_coordinate("33.836081"), Some(33.84));
        assert_eq!(round_coordinate(" -79.0478 "), Some(-79.05));
        assert_eq!(round_coordinate("12"), Some(12.0));
        assert_eq!(round_coordinate("-0.001"), Some(0.0));
    }

    #[test]
    fn test_malformed_coordinates() {
        assert_eq!(round_coordinate("north"), None);
        assert_eq!(round_coordinate(""), None);
        assert_eq!(round_coordinate("NaN"), None);
        assert_eq!(round_coordinate("inf"), None);
    }

    #[test]
    fn test_coordinates_that_overflow_when_rounded_are_malformed() {
        assert_eq!(round_coordinate("1.7e308"), None);
        assert_eq!(round_coordinate("-1.7e308"), None);
        assert!(round_coordinate("1e300").is_some_and(f64::is_finite));
    }

    #[test]
    fn test_rounding_is_stable_when_reapplied() {
        let first = round_coordinate("33.836081").unwrap();
        assert_eq!(round_coordinate(&first.to_string()), Some(first));
    }
}
