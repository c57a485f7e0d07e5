//! Parsing of free-text size fields like "250 ml" or "100,0 g".

/// Numeric amount and unit of measure extracted from a size string.
///
/// Either part may be absent; size is optional metadata and an unparsable
/// amount is not an error. Units are kept verbatim ("ml" and "mL" stay
/// distinct).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSize {
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Splits on the first space into an amount token and an optional unit.
/// A comma in the amount is tolerated as a decimal separator.
pub fn parse_size(text: &str) -> ParsedSize {
    let (amount_token, unit) = match text.split_once(' ') {
        Some((amount, rest)) => {
            let unit = rest.trim();
            (amount, (!unit.is_empty()).then(|| unit.to_string()))
        }
        None => (text, None),
    };

    ParsedSize {
        amount: parse_amount(&amount_token.replace(',', ".")),
        unit,
    }
}

/// The cleaned token must be digits with at most one decimal point.
fn parse_amount(token: &str) -> Option<f64> {
    if token.is_empty() {
        return None;
    }
    let mut seen_dot = false;
    for ch in token.chars() {
        match ch {
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => {}
            _ => return None,
        }
    }
    token.parse().ok()
}
