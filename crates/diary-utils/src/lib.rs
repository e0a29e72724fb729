//! Utility functions and helpers

use std::collections::HashMap;

/// Format the integer part of a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format an amount with a fixed number of decimals and grouped thousands
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };
    // -0.00 renders as 0.00
    let int_part = if int_part == "-0" && frac_part.as_deref().map_or(true, |f| f.chars().all(|c| c == '0')) {
        "0".to_string()
    } else {
        int_part
    };
    match frac_part {
        Some(f) => format!("{}.{}", format_number(int_part), f),
        None => format_number(int_part),
    }
}

/// Escape text for safe inclusion in HTML content and attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode an `application/x-www-form-urlencoded` body into key/value pairs
///
/// Later keys overwrite earlier ones. `+` is treated as a space.
pub fn parse_form_body(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        params.insert(key, decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(-1234), "-1,234");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5, 2), "1,234.50");
        assert_eq!(format_amount(-10.0, 2), "-10.00");
        assert_eq!(format_amount(-0.001, 2), "0.00");
        assert_eq!(format_amount(200.0, 0), "200");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_parse_form_body() {
        let params = parse_form_body("product_title=Green+tea&product_calories=1.5&note=a%26b&empty=");
        assert_eq!(params.get("product_title").map(String::as_str), Some("Green tea"));
        assert_eq!(params.get("product_calories").map(String::as_str), Some("1.5"));
        assert_eq!(params.get("note").map(String::as_str), Some("a&b"));
        assert_eq!(params.get("empty").map(String::as_str), Some(""));
        assert!(parse_form_body("").is_empty());
    }
}
