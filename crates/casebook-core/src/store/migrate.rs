//! Legacy record upgrades applied at the load boundary.
//!
//! Older data directories stored the birthplace under `address`, listed
//! committed crimes as bare strings and kept presets without an id. Records
//! are upgraded in place before they are deserialized, so the rest of the
//! crate only sees the current shape.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::Collection;

/// Upgrade legacy records in place. Returns how many records changed.
pub(super) fn upgrade(collection: Collection, records: &mut [Value]) -> usize {
    let mut changed = 0;
    for record in records.iter_mut() {
        let Some(object) = record.as_object_mut() else {
            continue;
        };
        let touched = match collection {
            Collection::Reports => {
                let renamed = rename_address(object);
                normalize_crimes(object) || renamed
            }
            Collection::PerpetratorFiles => rename_address(object),
            Collection::Presets => assign_id(object),
            _ => false,
        };
        if touched {
            changed += 1;
        }
    }
    changed
}

fn rename_address(object: &mut Map<String, Value>) -> bool {
    if object.contains_key("birthplace") {
        return false;
    }
    match object.remove("address") {
        Some(address) => {
            object.insert("birthplace".to_string(), address);
            true
        }
        None => false,
    }
}

fn assign_id(object: &mut Map<String, Value>) -> bool {
    if object.get("id").is_some_and(|id| !id.is_null()) {
        return false;
    }
    object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    true
}

fn normalize_crimes(object: &mut Map<String, Value>) -> bool {
    let Some(Value::Array(crimes)) = object.get_mut("crimes_committed") else {
        return false;
    };
    let mut touched = false;
    for crime in crimes.iter_mut() {
        if let Value::String(name) = crime {
            *crime = json!({
                "name": name.clone(),
                "paragraph": "",
                "detention_units": 0,
                "fine": 0,
            });
            touched = true;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_becomes_birthplace() {
        let mut records = vec![json!({"name": "Max", "address": "Berlin"})];
        assert_eq!(upgrade(Collection::PerpetratorFiles, &mut records), 1);
        assert_eq!(records[0]["birthplace"], "Berlin");
        assert!(records[0].get("address").is_none());
    }

    #[test]
    fn test_existing_birthplace_wins() {
        let mut records = vec![json!({"birthplace": "Hamburg", "address": "Berlin"})];
        assert_eq!(upgrade(Collection::Reports, &mut records), 0);
        assert_eq!(records[0]["birthplace"], "Hamburg");
    }

    #[test]
    fn test_string_crimes_are_normalized() {
        let mut records = vec![json!({
            "crimes_committed": ["Diebstahl", {"name": "Raub", "paragraph": "§ 249 StGB", "detention_units": 10, "fine": 500}]
        })];
        assert_eq!(upgrade(Collection::Reports, &mut records), 1);
        assert_eq!(
            records[0]["crimes_committed"][0],
            json!({"name": "Diebstahl", "paragraph": "", "detention_units": 0, "fine": 0})
        );
        assert_eq!(records[0]["crimes_committed"][1]["fine"], 500);
    }

    #[test]
    fn test_presets_without_id_get_one() {
        let mut records = vec![
            json!({"name": "Kurz", "template_string": "[name]"}),
            json!({"id": "0b7e4d2a-5c1f-4e6b-8f3a-9d2c1b0a7e55", "name": "Lang", "template_string": ""}),
        ];
        assert_eq!(upgrade(Collection::Presets, &mut records), 1);
        let id = records[0]["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(records[1]["id"], "0b7e4d2a-5c1f-4e6b-8f3a-9d2c1b0a7e55");
    }

    #[test]
    fn test_other_collections_untouched() {
        let mut records = vec![json!({"address": "x"})];
        assert_eq!(upgrade(Collection::Notes, &mut records), 0);
        assert_eq!(records[0]["address"], "x");
    }
}
