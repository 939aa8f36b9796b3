//! Parsing helpers for key/value pairs, timezones and ID prefixes.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::errors::CliError;

/// Parse repeated `KEY=VALUE` arguments. A later key wins.
pub fn parse_key_values(pairs: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CliError::invalid_input(format!("Invalid value '{}'. Use KEY=VALUE", pair))
        })?;
        if key.is_empty() {
            return Err(CliError::invalid_input(format!("Missing key in '{}'", pair)).into());
        }
        values.insert(key.to_string(), value.to_string());
    }
    Ok(values)
}

/// Validate an IANA timezone name.
pub fn parse_timezone(name: &str) -> anyhow::Result<chrono_tz::Tz> {
    name.trim().parse::<chrono_tz::Tz>().map_err(|_| {
        CliError::invalid_input(format!("Unknown timezone: {}", name))
            .with_hint("Use an IANA name such as Europe/Berlin")
            .into()
    })
}

/// Find the single item whose id equals `query` or starts with it.
pub fn match_id<'a, T>(
    items: &'a [T],
    query: &str,
    id_of: impl Fn(&T) -> Uuid,
    what: &str,
    list_hint: &str,
) -> anyhow::Result<&'a T> {
    let query = query.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&query) {
        if let Some(item) = items.iter().find(|item| id_of(item) == id) {
            return Ok(item);
        }
    }
    if query.is_empty() {
        return Err(CliError::invalid_input(format!("Missing {} ID", what)).into());
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&query))
        .collect();
    match matches.as_slice() {
        [item] => Ok(item),
        [] => Err(CliError::not_found(format!("No {} matches '{}'", what, query), list_hint).into()),
        _ => Err(CliError::invalid_input(format!(
            "ID prefix '{}' matches {} {}s",
            query,
            matches.len(),
            what
        ))
        .with_hint("Use a longer prefix")
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;
    use crate::errors::describe_error;

    #[test]
    fn test_parse_key_values() {
        let values = parse_key_values(&[
            "Name=Max".to_string(),
            "Grund=a=b".to_string(),
            "Name=Erika".to_string(),
        ])
        .unwrap();
        assert_eq!(values["Name"], "Erika");
        assert_eq!(values["Grund"], "a=b");
    }

    #[test]
    fn test_parse_key_values_rejects_missing_separator() {
        let err = parse_key_values(&["Name".to_string()]).unwrap_err();
        assert_eq!(describe_error(&err).2, exit_codes::INVALID_INPUT);
        assert!(parse_key_values(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(
            parse_timezone("Europe/Berlin").unwrap(),
            chrono_tz::Europe::Berlin
        );
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_match_id_by_prefix() {
        let a = Uuid::parse_str("aa000000-0000-4000-8000-000000000001").unwrap();
        let b = Uuid::parse_str("ab000000-0000-4000-8000-000000000002").unwrap();
        let items = vec![a, b];

        assert_eq!(*match_id(&items, "AB", |id| *id, "note", "").unwrap(), b);
        assert_eq!(*match_id(&items, &a.to_string(), |id| *id, "note", "").unwrap(), a);

        let err = match_id(&items, "a", |id| *id, "note", "").unwrap_err();
        assert_eq!(describe_error(&err).2, exit_codes::INVALID_INPUT);

        let err = match_id(&items, "ff", |id| *id, "note", "casebook note list").unwrap_err();
        let (_, hint, code) = describe_error(&err);
        assert_eq!(code, exit_codes::NOT_FOUND);
        assert_eq!(hint.as_deref(), Some("casebook note list"));
    }
}
