//! Report presets: named template strings.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::{CasebookError, Result};
use crate::template;
use crate::types::{require_text, PresetChanges, ReportPreset};

const SIGNATURE: &str =
    "Unterschrift [Officer Name]: Unterschrift [Unterschrift Officer Name (Cursiv)]";

/// Presets seeded into an empty preset document.
pub fn default_presets() -> Vec<ReportPreset> {
    let presets = [
        (
            "Standard Anzeige",
            "[Herr/Frau] [name] hat am [Datum] um [uhrzeit] folgende Straftaten begangen \
             [Straftat1,2,3,4,5, etc], laut [Gesetz] wurden [Hafteinheiten] Hafteinheiten \
             und eine Strafe von [Strafbetrag] verhängt.",
        ),
        (
            "Ordnungswidrigkeit",
            "Am [Datum] um [uhrzeit] wurde [Herr/Frau] [name] wegen einer \
             Ordnungswidrigkeit ([OWI-Art]) gemäß [OWI-Gesetz] mit einem Verwarnungsgeld \
             von [Verwarnungsgeld] € belegt.",
        ),
        (
            "Fahndung",
            "FAHNDUNG nach [name], geboren am [Geburtsdatum] in [Geburtsort]. \
             Beschreibung: [Beschreibung]. Letzter bekannter Aufenthaltsort: [Ort]. \
             Grund: [Grund der Fahndung]. Bei Sichtung bitte [Maßnahme] ergreifen. \
             Aktenzeichen: [Aktenzeichen].",
        ),
        (
            "Festnahme",
            "Festnahme von [Herr/Frau] [name] am [Datum] um [uhrzeit] in [Ort]. \
             Grund der Festnahme: [Grund]. Die Person wurde zur [Ort der Verbringung] \
             verbracht. Aktenzeichen: [Aktenzeichen].",
        ),
        (
            "Verkehrsunfall/Unfallbericht",
            "Verkehrsunfall am [Datum] um [uhrzeit] in [Ort]. Beteiligte Fahrzeuge: \
             [Fahrzeug 1], [Fahrzeug 2]. Beteiligte Personen: [Personen]. \
             Sachschaden: [Sachschaden]. Personenschaden: [Personenschaden]. \
             Ursache: [Unfallursache]. Aktenzeichen: [Aktenzeichen].",
        ),
        (
            "Zeugenvernehmung",
            "Zeugenvernehmung von [Herr/Frau] [Zeugenname] am [Datum] um [uhrzeit] in \
             [Ort]. Zum Sachverhalt: [Sachverhalt]. Aussage: [Aussage des Zeugen]. \
             Aktenzeichen: [Aktenzeichen].",
        ),
    ];

    presets
        .iter()
        .map(|(name, body)| ReportPreset {
            id: Uuid::new_v4(),
            name: name.to_string(),
            template: format!("{} {}", body, SIGNATURE),
        })
        .collect()
}

/// Render a preset with the given placeholder values.
pub fn generate(preset: &ReportPreset, values: &BTreeMap<String, String>) -> String {
    template::render(&preset.template, values)
}

#[derive(Debug, Clone, Default)]
pub struct PresetBook {
    presets: Vec<ReportPreset>,
}

impl PresetBook {
    pub fn new(presets: Vec<ReportPreset>) -> Self {
        Self { presets }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_presets())
    }

    pub fn presets(&self) -> &[ReportPreset] {
        &self.presets
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ReportPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&ReportPreset> {
        let wanted = name.trim().to_lowercase();
        self.presets
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    pub fn add(&mut self, name: &str, template: &str) -> Result<ReportPreset> {
        let preset = ReportPreset {
            id: Uuid::new_v4(),
            name: require_text("Preset name", name)?,
            template: require_text("Template", template)?,
        };
        self.presets.push(preset.clone());
        Ok(preset)
    }

    pub fn edit(&mut self, id: Uuid, changes: PresetChanges) -> Result<ReportPreset> {
        let preset = self
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CasebookError::NotFound(format!("preset {}", id)))?;

        let name = match changes.name.as_deref() {
            Some(name) => require_text("Preset name", name)?,
            None => preset.name.clone(),
        };
        let template = match changes.template.as_deref() {
            Some(template) => require_text("Template", template)?,
            None => preset.template.clone(),
        };
        preset.name = name;
        preset.template = template;
        Ok(preset.clone())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<ReportPreset> {
        let index = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CasebookError::NotFound(format!("preset {}", id)))?;
        Ok(self.presets.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let presets = default_presets();
        assert_eq!(presets.len(), 6);
        assert!(presets
            .iter()
            .all(|p| p.template.ends_with("[Unterschrift Officer Name (Cursiv)]")));

        let standard = &presets[0];
        let fields = template::unique_placeholders(&standard.template);
        assert_eq!(&fields[..4], &["Herr/Frau", "name", "Datum", "uhrzeit"]);
    }

    #[test]
    fn test_generate_strips_unfilled_fields() {
        let book = PresetBook::with_defaults();
        let fahndung = book.find("fahndung").unwrap();
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), "Max Muster".to_string());

        let text = generate(fahndung, &values);
        assert!(text.starts_with("FAHNDUNG nach Max Muster, geboren am  in ."));
        assert!(!text.contains('['));
    }

    #[test]
    fn test_add_edit_delete() {
        let mut book = PresetBook::default();
        assert!(matches!(
            book.add("", "[x]"),
            Err(CasebookError::Validation(_))
        ));
        let preset = book.add("Kurz", "[name]").unwrap();
        let edited = book
            .edit(
                preset.id,
                PresetChanges {
                    template: Some("[name] [Datum]".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.name, "Kurz");
        assert_eq!(edited.template, "[name] [Datum]");

        book.delete(preset.id).unwrap();
        assert!(book.is_empty());
        assert!(matches!(
            book.delete(preset.id),
            Err(CasebookError::NotFound(_))
        ));
    }
}
