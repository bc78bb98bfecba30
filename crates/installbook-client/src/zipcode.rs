use std::sync::LazyLock;

use regex::Regex;

static ZIPCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("valid regex"));

/// Returns `true` for exactly five ASCII digits, with no surrounding whitespace.
#[must_use]
pub fn is_valid_zipcode(zipcode: &str) -> bool {
    ZIPCODE_RE.is_match(zipcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_five_digits() {
        assert!(is_valid_zipcode("90210"));
        assert!(is_valid_zipcode("00501"));
    }

    #[test]
    fn rejects_everything_else() {
        for zipcode in ["", "9021", "902100", "9021a", " 90210", "90210-1234", "٩٠٢١٠"] {
            assert!(!is_valid_zipcode(zipcode), "{zipcode:?} should be rejected");
        }
    }
}
