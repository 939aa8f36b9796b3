//! Crime catalog: the reusable offense definitions reports pick from.

use crate::error::{CasebookError, Result};
use crate::types::{require_text, Crime, CrimeChanges, CrimeKey};

/// Offenses seeded into an empty catalog: (name, statute, detention units, fine).
const DEFAULT_CRIMES: &[(&str, &str, i64, i64)] = &[
    ("Diebstahl", "§ 242 StGB", 5, 100),
    ("Raub", "§ 249 StGB", 10, 500),
    ("Körperverletzung", "§ 223 StGB", 7, 200),
    ("Sachbeschädigung", "§ 303 StGB", 3, 50),
    ("Einbruch", "§ 244 StGB", 8, 300),
    ("Betrug", "§ 263 StGB", 6, 250),
    ("Drogenhandel", "BtMG", 15, 1000),
    ("Widerstand gegen die Staatsgewalt", "§ 113 StGB", 4, 150),
    ("Fahren ohne Fahrerlaubnis", "§ 21 StVG", 2, 80),
    ("Verkehrsunfallflucht", "§ 142 StGB", 5, 120),
    ("Brandstiftung", "§ 306 StGB", 12, 700),
    ("Mord", "§ 211 StGB", 999, 5000),
    ("Totschlag", "§ 212 StGB", 999, 3000),
    ("Nötigung", "§ 240 StGB", 4, 100),
    ("Beleidigung", "§ 185 StGB", 1, 30),
    ("Hausfriedensbruch", "§ 123 StGB", 2, 40),
];

/// The default catalog.
pub fn default_crimes() -> Vec<Crime> {
    DEFAULT_CRIMES
        .iter()
        .map(|(name, statute, units, fine)| Crime::new(*name, *statute, *units, *fine))
        .collect()
}

/// Ordered set of crimes, unique by (name, statute) ignoring case.
#[derive(Debug, Clone, Default)]
pub struct CrimeCatalog {
    crimes: Vec<Crime>,
}

impl CrimeCatalog {
    pub fn new(crimes: Vec<Crime>) -> Self {
        Self { crimes }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_crimes())
    }

    pub fn crimes(&self) -> &[Crime] {
        &self.crimes
    }

    pub fn len(&self) -> usize {
        self.crimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crimes.is_empty()
    }

    pub fn get(&self, key: &CrimeKey) -> Option<&Crime> {
        self.crimes.iter().find(|c| key.matches(c))
    }

    pub fn add(
        &mut self,
        name: &str,
        statute: &str,
        detention_units: i64,
        fine: i64,
    ) -> Result<Crime> {
        let crime = Self::validated(name, statute, detention_units, fine)?;
        if self.get(&crime.key()).is_some() {
            return Err(CasebookError::Duplicate(format!(
                "crime '{}' is already in the catalog",
                crime.display_name()
            )));
        }
        self.crimes.push(crime.clone());
        Ok(crime)
    }

    /// Edit the crime identified by `key`. The edited entry is excluded from
    /// the duplicate check, so changing only the letter case is allowed.
    pub fn edit(&mut self, key: &CrimeKey, changes: CrimeChanges) -> Result<Crime> {
        let index = self.position(key)?;
        let current = &self.crimes[index];

        let updated = Self::validated(
            changes.name.as_deref().unwrap_or(&current.name),
            changes.statute.as_deref().unwrap_or(&current.statute),
            changes.detention_units.unwrap_or(current.detention_units),
            changes.fine.unwrap_or(current.fine),
        )?;

        let new_key = updated.key();
        let collides = self
            .crimes
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && new_key.matches(c));
        if collides {
            return Err(CasebookError::Duplicate(format!(
                "crime '{}' is already in the catalog",
                updated.display_name()
            )));
        }

        self.crimes[index] = updated.clone();
        Ok(updated)
    }

    /// Remove a crime from the catalog. Reports keep their snapshots.
    pub fn remove(&mut self, key: &CrimeKey) -> Result<Crime> {
        let index = self.position(key)?;
        Ok(self.crimes.remove(index))
    }

    /// Case-insensitive substring search over name or statute.
    pub fn search(&self, filter: &str) -> Vec<Crime> {
        let needle = filter.trim().to_lowercase();
        self.crimes
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.statute.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Look up a crime by display label (`"Name (Statute)"`) or by its bare
    /// name when only one entry carries that name.
    pub fn resolve(&self, label: &str) -> Result<Crime> {
        let wanted = label.trim().to_lowercase();
        if let Some(crime) = self
            .crimes
            .iter()
            .find(|c| c.display_name().to_lowercase() == wanted)
        {
            return Ok(crime.clone());
        }

        let by_name: Vec<&Crime> = self
            .crimes
            .iter()
            .filter(|c| c.name.to_lowercase() == wanted)
            .collect();
        match by_name.as_slice() {
            [] => Err(CasebookError::NotFound(format!(
                "crime '{}' is not in the catalog",
                label.trim()
            ))),
            [crime] => Ok((*crime).clone()),
            _ => Err(CasebookError::Validation(format!(
                "crime name '{}' is ambiguous; use \"Name (Statute)\"",
                label.trim()
            ))),
        }
    }

    fn position(&self, key: &CrimeKey) -> Result<usize> {
        self.crimes
            .iter()
            .position(|c| key.matches(c))
            .ok_or_else(|| CasebookError::NotFound(format!("crime '{}'", key)))
    }

    fn validated(name: &str, statute: &str, detention_units: i64, fine: i64) -> Result<Crime> {
        let name = require_text("Crime name", name)?;
        if detention_units < 0 || fine < 0 {
            return Err(CasebookError::Validation(
                "Detention units and fine must not be negative".to_string(),
            ));
        }
        Ok(Crime::new(name, statute.trim(), detention_units, fine))
    }
}
