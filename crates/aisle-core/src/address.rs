use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

const ZIP: &str = r"\d{5}(?:-\d{4})?";

/// "123 Main St, Boise, ID 83702"
static STREET_CITY_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<street>.+?)\s*,\s*(?P<city>[^,]+?)\s*,\s*(?P<state>[A-Za-z]{{2}})\.?\s+(?P<zip>{ZIP})$"
    ))
    .expect("address pattern")
});

/// "123 Main St Boise, ID 83702". The city is taken to be the last word.
static STREET_CITY_NO_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<street>.+)\s+(?P<city>[^\s,]+)\s*,\s*(?P<state>[A-Za-z]{{2}})\.?\s+(?P<zip>{ZIP})$"
    ))
    .expect("address pattern")
});

/// Anything ending in a zip, optionally preceded by an upper-case state code.
/// Lower-case pairs are left alone so "St" is not read as a state.
static ZIP_ANCHORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<street>.*?)[\s,]*(?:\b(?P<state>[A-Z]{{2}})[\s,]+)?(?P<zip>{ZIP})$"
    ))
    .expect("address pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Best-effort split of a free-text mailing address.
///
/// Tries the comma-separated form first, then the form missing the comma
/// between street and city, then a zip-anchored fallback. Text that matches
/// none of them ends up whole in `street`.
pub fn parse_address(raw: &str) -> ParsedAddress {
    let input = raw.trim();

    for pattern in [&*STREET_CITY_STATE_ZIP, &*STREET_CITY_NO_COMMA, &*ZIP_ANCHORED] {
        if let Some(caps) = pattern.captures(input) {
            return from_captures(&caps);
        }
    }

    ParsedAddress {
        street: input.to_string(),
        ..Default::default()
    }
}

fn from_captures(caps: &Captures<'_>) -> ParsedAddress {
    let field = |name: &str| caps.name(name).map(|m| m.as_str().trim()).unwrap_or_default();

    ParsedAddress {
        street: field("street").trim_end_matches(',').trim().to_string(),
        city: field("city").to_string(),
        state: field("state").to_uppercase(),
        zip: field("zip").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(street: &str, city: &str, state: &str, zip: &str) -> ParsedAddress {
        ParsedAddress {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    #[test]
    fn full_comma_form() {
        assert_eq!(
            parse_address("123 Main St, Boise, ID 83702"),
            addr("123 Main St", "Boise", "ID", "83702")
        );
    }

    #[test]
    fn unit_numbers_stay_in_street() {
        assert_eq!(
            parse_address("123 Main St, Apt 4, Boise, id 83702-1234"),
            addr("123 Main St, Apt 4", "Boise", "ID", "83702-1234")
        );
    }

    #[test]
    fn missing_comma_between_street_and_city() {
        assert_eq!(
            parse_address("123 Main St Boise, ID 83702"),
            addr("123 Main St", "Boise", "ID", "83702")
        );
    }

    #[test]
    fn zip_anchored_fallback() {
        assert_eq!(
            parse_address("PO Box 12 Boise ID 83702"),
            addr("PO Box 12 Boise", "", "ID", "83702")
        );
        assert_eq!(
            parse_address("123 Main St 83702"),
            addr("123 Main St", "", "", "83702")
        );
    }

    #[test]
    fn all_caps_street_suffix_reads_as_state() {
        // Known limit of the zip fallback: an upper-case suffix is taken for a state.
        assert_eq!(
            parse_address("123 MAIN ST 83702"),
            addr("123 MAIN", "", "ST", "83702")
        );
    }

    #[test]
    fn unrecognised_text_goes_to_street() {
        assert_eq!(
            parse_address("  the blue house by the lake  "),
            addr("the blue house by the lake", "", "", "")
        );
        assert_eq!(parse_address(""), ParsedAddress::default());
    }
}
