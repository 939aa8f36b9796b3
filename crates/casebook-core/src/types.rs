//! Core data types.
//!
//! Field names on disk follow the document formats the data directory has
//! always used (`report_id`, `crimes_committed`, `paragraph`, `timestamp`,
//! ...); the Rust names describe what the fields mean.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CasebookError, Result};

/// A reusable offense definition, or a snapshot of one embedded in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crime {
    pub name: String,

    /// Statute reference (may be empty)
    #[serde(rename = "paragraph", default)]
    pub statute: String,

    #[serde(default)]
    pub detention_units: i64,

    #[serde(default)]
    pub fine: i64,
}

impl Crime {
    pub fn new(
        name: impl Into<String>,
        statute: impl Into<String>,
        detention_units: i64,
        fine: i64,
    ) -> Self {
        Self {
            name: name.into(),
            statute: statute.into(),
            detention_units,
            fine,
        }
    }

    /// Display label: `"Name (Statute)"` when a statute is present, else `"Name"`.
    pub fn display_name(&self) -> String {
        if self.statute.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.statute)
        }
    }

    pub fn key(&self) -> CrimeKey {
        CrimeKey::new(&self.name, &self.statute)
    }

    pub fn cost(&self) -> Cost {
        Cost {
            detention_units: self.detention_units,
            fine: self.fine,
        }
    }
}

/// Catalog identity of a crime: (name, statute), compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrimeKey {
    pub name: String,
    pub statute: String,
}

impl CrimeKey {
    pub fn new(name: impl Into<String>, statute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statute: statute.into(),
        }
    }

    pub fn matches(&self, crime: &Crime) -> bool {
        crime.name.to_lowercase() == self.name.to_lowercase()
            && crime.statute.to_lowercase() == self.statute.to_lowercase()
    }
}

impl std::fmt::Display for CrimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statute.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.statute)
        }
    }
}

/// Penalty cost: detention units plus fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cost {
    pub detention_units: i64,
    pub fine: i64,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        detention_units: 0,
        fine: 0,
    };

    /// Sum the costs of a crime list.
    pub fn of(crimes: &[Crime]) -> Result<Cost> {
        crimes
            .iter()
            .try_fold(Cost::ZERO, |acc, crime| acc.checked_add(crime.cost()))
    }

    pub fn checked_add(self, other: Cost) -> Result<Cost> {
        Ok(Cost {
            detention_units: self
                .detention_units
                .checked_add(other.detention_units)
                .ok_or_else(overflow)?,
            fine: self.fine.checked_add(other.fine).ok_or_else(overflow)?,
        })
    }

    pub fn checked_sub(self, other: Cost) -> Result<Cost> {
        Ok(Cost {
            detention_units: self
                .detention_units
                .checked_sub(other.detention_units)
                .ok_or_else(overflow)?,
            fine: self.fine.checked_sub(other.fine).ok_or_else(overflow)?,
        })
    }
}

fn overflow() -> CasebookError {
    CasebookError::Validation("Penalty total out of range".to_string())
}

/// Cumulative record for one named individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpetratorFile {
    pub id: Uuid,

    /// Unique (case-insensitive) name
    pub name: String,

    #[serde(rename = "dob", default)]
    pub date_of_birth: String,

    #[serde(default)]
    pub birthplace: String,

    #[serde(default)]
    pub description: String,

    /// Filename of the image inside the image directory
    #[serde(rename = "image_filename", default)]
    pub image_ref: Option<String>,

    #[serde(rename = "timestamp", with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub total_detention_units: i64,

    #[serde(default)]
    pub total_fine: i64,

    /// Reports contributing to the totals (no duplicates)
    #[serde(default)]
    pub linked_report_ids: Vec<Uuid>,
}

impl PerpetratorFile {
    /// A fresh file with zeroed totals and no links.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date_of_birth: String::new(),
            birthplace: String::new(),
            description: String::new(),
            image_ref: None,
            created_at: Utc::now(),
            total_detention_units: 0,
            total_fine: 0,
            linked_report_ids: Vec::new(),
        }
    }

    pub fn totals(&self) -> Cost {
        Cost {
            detention_units: self.total_detention_units,
            fine: self.total_fine,
        }
    }

    pub fn set_totals(&mut self, cost: Cost) {
        self.total_detention_units = cost.detention_units;
        self.total_fine = cost.fine;
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// A filed incident record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,

    /// User-supplied case number (not guaranteed unique)
    #[serde(rename = "report_id")]
    pub display_id: String,

    pub perpetrator_name: String,

    #[serde(rename = "type")]
    pub report_type: String,

    #[serde(rename = "crimes_committed", default)]
    pub crimes: Vec<Crime>,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "timestamp", with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub linked_perpetrator_id: Option<Uuid>,
}

impl Report {
    pub fn cost(&self) -> Result<Cost> {
        Cost::of(&self.crimes)
    }
}

/// A named, reusable template string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPreset {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "template_string")]
    pub template: String,
}

/// A free-text note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,

    #[serde(rename = "timestamp", with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Builder for creating new reports.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub display_id: String,
    pub perpetrator_name: String,
    pub report_type: String,
    pub crimes: Vec<Crime>,
    pub description: String,
}

impl NewReport {
    pub fn new(
        display_id: impl Into<String>,
        perpetrator_name: impl Into<String>,
        report_type: impl Into<String>,
        crimes: Vec<Crime>,
    ) -> Self {
        Self {
            display_id: display_id.into(),
            perpetrator_name: perpetrator_name.into(),
            report_type: report_type.into(),
            crimes,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update for a report. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ReportChanges {
    pub display_id: Option<String>,
    pub perpetrator_name: Option<String>,
    pub report_type: Option<String>,
    pub crimes: Option<Vec<Crime>>,
    pub description: Option<String>,
}

impl ReportChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_id(mut self, value: impl Into<String>) -> Self {
        self.display_id = Some(value.into());
        self
    }

    pub fn perpetrator_name(mut self, value: impl Into<String>) -> Self {
        self.perpetrator_name = Some(value.into());
        self
    }

    pub fn report_type(mut self, value: impl Into<String>) -> Self {
        self.report_type = Some(value.into());
        self
    }

    pub fn crimes(mut self, value: Vec<Crime>) -> Self {
        self.crimes = Some(value);
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.display_id.is_none()
            && self.perpetrator_name.is_none()
            && self.report_type.is_none()
            && self.crimes.is_none()
            && self.description.is_none()
    }
}

/// Builder for manually created perpetrator files.
#[derive(Debug, Clone, Default)]
pub struct NewPerpetratorFile {
    pub name: String,
    pub date_of_birth: String,
    pub birthplace: String,
    pub description: String,
    pub image_ref: Option<String>,
}

impl NewPerpetratorFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_date_of_birth(mut self, value: impl Into<String>) -> Self {
        self.date_of_birth = value.into();
        self
    }

    pub fn with_birthplace(mut self, value: impl Into<String>) -> Self {
        self.birthplace = value.into();
        self
    }

    pub fn with_description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    pub fn with_image_ref(mut self, value: impl Into<String>) -> Self {
        self.image_ref = Some(value.into());
        self
    }
}

/// What to do with a perpetrator file's image during an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(String),
    Clear,
}

/// Partial update for a perpetrator file. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct PerpetratorFileChanges {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub birthplace: Option<String>,
    pub description: Option<String>,
    pub image: ImageChange,
}

impl PerpetratorFileChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn date_of_birth(mut self, value: impl Into<String>) -> Self {
        self.date_of_birth = Some(value.into());
        self
    }

    pub fn birthplace(mut self, value: impl Into<String>) -> Self {
        self.birthplace = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn image(mut self, change: ImageChange) -> Self {
        self.image = change;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.birthplace.is_none()
            && self.description.is_none()
            && self.image == ImageChange::Keep
    }
}

/// Partial update for a catalog crime.
#[derive(Debug, Clone, Default)]
pub struct CrimeChanges {
    pub name: Option<String>,
    pub statute: Option<String>,
    pub detention_units: Option<i64>,
    pub fine: Option<i64>,
}

/// Partial update for a note.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial update for a report preset.
#[derive(Debug, Clone, Default)]
pub struct PresetChanges {
    pub name: Option<String>,
    pub template: Option<String>,
}

/// Require a non-empty (after trimming) value, returning the trimmed text.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CasebookError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Serde adapter for document timestamps.
///
/// Writes RFC 3339. Reads RFC 3339 and the offset-less ISO-8601 form
/// (`2024-05-01T12:34:56.123456`), which is taken as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_is_empty() {
        assert!(ReportChanges::new().is_empty());
        assert!(!ReportChanges::new().description("").is_empty());
        assert!(PerpetratorFileChanges::new().is_empty());
        assert!(!PerpetratorFileChanges::new()
            .image(ImageChange::Clear)
            .is_empty());
    }

    #[test]
    fn test_crime_display_name() {
        assert_eq!(
            Crime::new("Diebstahl", "§ 242 StGB", 5, 100).display_name(),
            "Diebstahl (§ 242 StGB)"
        );
        assert_eq!(Crime::new("Raub", "", 10, 500).display_name(), "Raub");
    }

    #[test]
    fn test_crime_key_case_insensitive() {
        let crime = Crime::new("Diebstahl", "§ 242 StGB", 5, 100);
        assert!(CrimeKey::new("DIEBSTAHL", "§ 242 stgb").matches(&crime));
        assert!(!CrimeKey::new("Diebstahl", "").matches(&crime));
    }

    #[test]
    fn test_cost_of_sums_crimes() {
        let crimes = vec![
            Crime::new("A", "", 5, 100),
            Crime::new("B", "", 7, 200),
        ];
        assert_eq!(
            Cost::of(&crimes).unwrap(),
            Cost {
                detention_units: 12,
                fine: 300
            }
        );
        assert_eq!(Cost::of(&[]).unwrap(), Cost::ZERO);
    }

    #[test]
    fn test_cost_overflow_is_validation_error() {
        let crimes = vec![
            Crime::new("A", "", i64::MAX, 0),
            Crime::new("B", "", 1, 0),
        ];
        assert!(matches!(
            Cost::of(&crimes),
            Err(CasebookError::Validation(_))
        ));
    }

    #[test]
    fn test_report_serializes_document_field_names() {
        let report = Report {
            id: Uuid::new_v4(),
            display_id: "AZ-1".to_string(),
            perpetrator_name: "Max".to_string(),
            report_type: "Anzeige".to_string(),
            crimes: vec![Crime::new("Raub", "§ 249 StGB", 10, 500)],
            description: String::new(),
            created_at: Utc::now(),
            linked_perpetrator_id: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["report_id"], "AZ-1");
        assert_eq!(value["type"], "Anzeige");
        assert_eq!(value["crimes_committed"][0]["paragraph"], "§ 249 StGB");
        assert!(value["timestamp"].is_string());
        assert!(value["linked_perpetrator_id"].is_null());
    }

    #[test]
    fn test_timestamp_accepts_naive_iso() {
        let parsed = timestamp::parse("2024-05-01T12:34:56.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T12:34:56.123456+00:00");
        assert!(timestamp::parse("2024-05-01T12:34:56+02:00").is_some());
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_preset_without_id_gets_one() {
        let preset: ReportPreset =
            serde_json::from_str(r#"{"name": "Fahndung", "template_string": "[name]"}"#).unwrap();
        assert!(!preset.id.is_nil());
        assert_eq!(preset.template, "[name]");
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("Title", "  x ").unwrap(), "x");
        assert!(require_text("Title", "   ").is_err());
    }
}
