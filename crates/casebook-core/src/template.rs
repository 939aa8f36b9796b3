//! Template engine: `[placeholder]` extraction and substitution.
//!
//! A placeholder is the shortest `[...]` run on a single line. Rendering
//! replaces supplied keys first, in order of first appearance, then strips
//! every placeholder of the original template that is still present, so
//! unfilled fields vanish from the output. Literal bracketed text is
//! stripped as well.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use once_cell::sync::Lazy;
use regex_lite::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("placeholder pattern is valid"));

/// Placeholder holding the current date (`DD.MM.YYYY`).
pub const DATE_PLACEHOLDER: &str = "Datum";

/// Placeholder holding the current time (`HH:MM`).
pub const TIME_PLACEHOLDER: &str = "uhrzeit";

/// Every placeholder name in order of appearance, duplicates included.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Placeholder names in order of first appearance, without duplicates.
pub fn unique_placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for name in extract_placeholders(template) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Substitute `values` into `template` and strip whatever is left.
pub fn render(template: &str, values: &BTreeMap<String, String>) -> String {
    let placeholders = unique_placeholders(template);
    let mut output = template.to_string();
    let in_form_order = placeholders
        .iter()
        .filter_map(|name| values.get_key_value(name))
        .chain(values.iter().filter(|(key, _)| !placeholders.contains(*key)));
    for (key, value) in in_form_order {
        output = output.replace(&format!("[{}]", key), value);
    }
    for name in extract_placeholders(template) {
        let token = format!("[{}]", name);
        if output.contains(&token) {
            output = output.replace(&token, "");
        }
    }
    output
}

/// Prefill values for the date and time placeholders, when present.
pub fn form_defaults<Tz>(placeholders: &[String], now: &DateTime<Tz>) -> BTreeMap<String, String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut defaults = BTreeMap::new();
    if placeholders.iter().any(|p| p == DATE_PLACEHOLDER) {
        defaults.insert(
            DATE_PLACEHOLDER.to_string(),
            now.format("%d.%m.%Y").to_string(),
        );
    }
    if placeholders.iter().any(|p| p == TIME_PLACEHOLDER) {
        defaults.insert(
            TIME_PLACEHOLDER.to_string(),
            now.format("%H:%M").to_string(),
        );
    }
    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        let found = extract_placeholders("[a] x [b] y [a] [Herr/Frau]");
        assert_eq!(found, vec!["a", "b", "a", "Herr/Frau"]);
        assert_eq!(unique_placeholders("[a] x [b] y [a]"), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_is_non_greedy_and_single_line() {
        assert_eq!(extract_placeholders("[a][b]"), vec!["a", "b"]);
        assert!(extract_placeholders("[open\nclose]").is_empty());
        assert_eq!(extract_placeholders("[]"), vec![""]);
    }

    #[test]
    fn test_render_fills_and_strips() {
        let out = render(
            "[name] am [Datum] wegen [Grund].",
            &values(&[("name", "Max"), ("Datum", "01.05.2024")]),
        );
        assert_eq!(out, "Max am 01.05.2024 wegen .");
    }

    #[test]
    fn test_render_fills_in_order_of_appearance() {
        let out = render("[b] [a]", &values(&[("b", "[a]"), ("a", "X")]));
        assert_eq!(out, "X X");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render("[a]-[a]", &values(&[("a", "x")]));
        assert_eq!(out, "x-x");
    }

    #[test]
    fn test_render_keeps_empty_values_and_ignores_unknown_keys() {
        let out = render("a[x]b", &values(&[("x", ""), ("y", "z")]));
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_render_does_not_strip_brackets_introduced_by_values() {
        let out = render("Hinweis: [note]", &values(&[("note", "[vertraulich]")]));
        assert_eq!(out, "Hinweis: [vertraulich]");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        assert_eq!(render("plain text", &BTreeMap::new()), "plain text");
    }

    #[test]
    fn test_form_defaults_only_for_present_tokens() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let defaults = form_defaults(&["Datum".to_string(), "uhrzeit".to_string()], &now);
        assert_eq!(defaults["Datum"], "07.03.2024");
        assert_eq!(defaults["uhrzeit"], "09:05");

        let defaults = form_defaults(&["datum".to_string(), "name".to_string()], &now);
        assert!(defaults.is_empty());
    }
}
