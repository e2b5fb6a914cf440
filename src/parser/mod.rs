//! Label/value scraping over loosely structured detail pages
//!
//! Detail pages are flattened to their visible text, split into trimmed
//! non-blank lines, and searched for label strings. A label either shares a
//! line with its value (`Estimated Cost: $500,000`) or sits alone with the
//! value on the next line. The first line containing the label wins, which
//! makes lookups order dependent when a label also appears inside another
//! field's value.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("number pattern is valid"));

const STREET_SUFFIXES: &[&str] = &["St", "Street", "Ave", "Avenue", "Rd", "Road"];

/// The visible text of a detail page as trimmed, non-blank lines
#[derive(Debug, Clone)]
pub struct DetailDocument {
    lines: Vec<String>,
}

impl DetailDocument {
    pub fn parse(markup: &str) -> Self {
        let document = Html::parse_document(markup);
        let mut text = String::new();

        for node in document.tree.root().descendants() {
            let Node::Text(fragment) = node.value() else {
                continue;
            };

            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));

            if !hidden {
                text.push_str(fragment);
            }
        }

        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self { lines }
    }

    /// Value for `label`: the next line when the label stands alone,
    /// otherwise the rest of the first line that yields a non-empty remainder.
    pub fn field_value(&self, label: &str) -> Option<String> {
        for (i, line) in self.lines.iter().enumerate() {
            if !line.contains(label) {
                continue;
            }

            if line == label {
                if let Some(next) = self.lines.get(i + 1) {
                    return Some(next.clone());
                }
                continue;
            }

            let value = line.replace(label, "");
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }

        None
    }
}

/// First run of digits in `raw` as a float, commas ignored (`$1,250.50` -> 1250.5)
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let digits = NUMBER.find(raw)?.as_str().replace(',', "");
    digits.parse().ok()
}

/// Integer part of the first run of digits in `raw` (`3,500 ft 2` -> 3500)
pub fn parse_whole(raw: &str) -> Option<i64> {
    let digits = NUMBER.find(raw)?.as_str().replace(',', "");
    let whole = digits.split('.').next()?;
    whole.parse().ok()
}

/// City from a `street, city, state zip` address: the segment before the
/// last comma, minus pure-digit tokens and common street suffixes.
pub fn city_from_address(address: &str) -> Option<String> {
    let segments: Vec<&str> = address.split(',').collect();
    if segments.len() < 2 {
        return None;
    }

    let candidate = segments[segments.len() - 2].trim();
    let words: Vec<&str> = candidate
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .filter(|word| !STREET_SUFFIXES.contains(word))
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_on_following_line() {
        let doc = DetailDocument::from_text("Square Footage:\n3,500 ft 2\n");

        let raw = doc.field_value("Square Footage:").unwrap();
        assert_eq!(raw, "3,500 ft 2");
        assert_eq!(parse_whole(&raw), Some(3500));
    }

    #[test]
    fn value_on_same_line() {
        let doc = DetailDocument::from_text("  Estimated Cost: $500,000  ");

        let raw = doc.field_value("Estimated Cost:").unwrap();
        assert_eq!(parse_decimal(&raw), Some(500_000.0));
    }

    #[test]
    fn first_matching_line_wins() {
        let doc = DetailDocument::from_text(
            "Scope of Work: replace Owner Name: signage\nOwner Name:\nCity of Austin",
        );

        assert_eq!(
            doc.field_value("Owner Name:").as_deref(),
            Some("Scope of Work: replace  signage")
        );
    }

    #[test]
    fn trailing_label_without_value_is_absent() {
        let doc = DetailDocument::from_text("Project Name:\nClinic\nOwner Phone:");

        assert_eq!(doc.field_value("Owner Phone:"), None);
        assert_eq!(doc.field_value("Missing:"), None);
    }

    #[test]
    fn markup_is_flattened_to_text_lines() {
        let html = r#"
            <html><head><style>.x { color: red }</style></head>
            <body>
              <div><label>Project Name:</label></div>
              <div><span>Fire Station 4</span></div>
              <p>Location County: <b>Travis</b></p>
              <script>var county = "Nope";</script>
            </body></html>
        "#;
        let doc = DetailDocument::parse(html);

        assert_eq!(doc.field_value("Project Name:").as_deref(), Some("Fire Station 4"));
        assert_eq!(doc.field_value("Location County:").as_deref(), Some("Travis"));
        assert!(doc.lines.iter().all(|line| !line.contains("color")));
    }

    #[test]
    fn numbers_without_digits_are_absent() {
        assert_eq!(parse_decimal("TBD"), None);
        assert_eq!(parse_whole("n/a"), None);
        assert_eq!(parse_decimal("$1,250.50"), Some(1250.5));
        assert_eq!(parse_whole("12,000.75 sq ft"), Some(12000));
    }

    #[test]
    fn city_comes_from_segment_before_state() {
        assert_eq!(
            city_from_address("1200 Main St, Round Rock, TX 78664").as_deref(),
            Some("Round Rock")
        );
        assert_eq!(
            city_from_address("500 Congress Ave, TX 78701").as_deref(),
            Some("Congress")
        );
        assert_eq!(city_from_address("Austin TX"), None);
        assert_eq!(city_from_address("12, TX"), None);
    }
}
