//! Case ledger: reports, perpetrator files, and the links between them.
//!
//! Every perpetrator file caches the penalty totals of the reports linked to
//! it. Operations that move cost between files compute the full set of new
//! totals first and only write once every step has succeeded, so a failed
//! operation leaves both collections untouched.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CasebookError, Result};
use crate::types::{
    require_text, Cost, Crime, ImageChange, NewPerpetratorFile, NewReport, PerpetratorFile,
    PerpetratorFileChanges, Report, ReportChanges,
};

/// Result of editing a perpetrator file.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub file: PerpetratorFile,
    /// Image reference that is no longer used by the file
    pub superseded_image: Option<String>,
}

/// A consistency problem between reports and perpetrator files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Cached totals differ from the sum over linked reports
    TotalsMismatch {
        file_id: Uuid,
        name: String,
        stored: Cost,
        expected: Cost,
    },
    /// Linked totals cannot be represented
    TotalsOverflow { file_id: Uuid, name: String },
    /// File lists a report that does not exist
    DanglingLink { file_id: Uuid, report_id: Uuid },
    /// Report points at a file that does not exist
    MissingPerpetrator { report_id: Uuid, file_id: Uuid },
    /// Report points at a file that does not list it
    UnlistedReport { report_id: Uuid, file_id: Uuid },
    /// File lists a report whose back-reference points elsewhere
    ForeignLink { file_id: Uuid, report_id: Uuid },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::TotalsMismatch {
                name,
                stored,
                expected,
                ..
            } => write!(
                f,
                "file '{}' totals {}/{} differ from linked reports {}/{}",
                name, stored.detention_units, stored.fine, expected.detention_units, expected.fine
            ),
            IntegrityIssue::TotalsOverflow { name, .. } => {
                write!(f, "file '{}' linked totals are out of range", name)
            }
            IntegrityIssue::DanglingLink { file_id, report_id } => {
                write!(f, "file {} links missing report {}", file_id, report_id)
            }
            IntegrityIssue::MissingPerpetrator { report_id, file_id } => {
                write!(f, "report {} links missing file {}", report_id, file_id)
            }
            IntegrityIssue::UnlistedReport { report_id, file_id } => {
                write!(f, "report {} is not listed by file {}", report_id, file_id)
            }
            IntegrityIssue::ForeignLink { file_id, report_id } => write!(
                f,
                "file {} lists report {} which links elsewhere",
                file_id, report_id
            ),
        }
    }
}

/// Where an edited report's cost lands.
enum Target {
    Existing(usize),
    Create(PerpetratorFile),
}

/// Reports and perpetrator files, kept mutually consistent.
#[derive(Debug, Clone, Default)]
pub struct CaseLedger {
    reports: Vec<Report>,
    files: Vec<PerpetratorFile>,
}

impl CaseLedger {
    pub fn new(reports: Vec<Report>, files: Vec<PerpetratorFile>) -> Self {
        Self { reports, files }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn perpetrator_files(&self) -> &[PerpetratorFile] {
        &self.files
    }

    pub fn get_report(&self, id: Uuid) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn get_perpetrator_file(&self, id: Uuid) -> Option<&PerpetratorFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_perpetrator_by_name(&self, name: &str) -> Option<&PerpetratorFile> {
        self.files.iter().find(|f| f.is_named(name))
    }

    /// Reports listed by a perpetrator file, in report order.
    pub fn linked_reports(&self, file_id: Uuid) -> Result<Vec<&Report>> {
        let file = self
            .get_perpetrator_file(file_id)
            .ok_or_else(|| not_found_file(file_id))?;
        Ok(self
            .reports
            .iter()
            .filter(|r| file.linked_report_ids.contains(&r.id))
            .collect())
    }

    /// File a new report, creating the perpetrator file if the name is unknown.
    pub fn create_report(&mut self, new: NewReport) -> Result<Report> {
        let (display_id, perpetrator_name, report_type) =
            validate_report(&new.display_id, &new.perpetrator_name, &new.report_type, &new.crimes)?;
        let cost = Cost::of(&new.crimes)?;

        let target = self.target_for(&perpetrator_name);
        let new_totals = match &target {
            Target::Existing(index) => self.files[*index].totals().checked_add(cost)?,
            Target::Create(_) => cost,
        };

        let index = self.materialize(target);
        let report = Report {
            id: Uuid::new_v4(),
            display_id,
            perpetrator_name,
            report_type,
            crimes: new.crimes,
            description: new.description,
            created_at: Utc::now(),
            linked_perpetrator_id: Some(self.files[index].id),
        };

        let file = &mut self.files[index];
        file.set_totals(new_totals);
        link(file, report.id);
        tracing::info!(report = %report.id, file = %file.id, "report created");

        self.reports.push(report.clone());
        Ok(report)
    }

    /// Edit a report, moving its cost and link if the perpetrator changed.
    pub fn edit_report(&mut self, id: Uuid, changes: ReportChanges) -> Result<Report> {
        let index = self
            .reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CasebookError::NotFound(format!("report {}", id)))?;
        let current = &self.reports[index];

        let crimes = changes.crimes.unwrap_or_else(|| current.crimes.clone());
        let (display_id, perpetrator_name, report_type) = validate_report(
            changes.display_id.as_deref().unwrap_or(&current.display_id),
            changes
                .perpetrator_name
                .as_deref()
                .unwrap_or(&current.perpetrator_name),
            changes.report_type.as_deref().unwrap_or(&current.report_type),
            &crimes,
        )?;
        let description = changes
            .description
            .unwrap_or_else(|| current.description.clone());

        let old_cost = current.cost()?;
        let new_cost = Cost::of(&crimes)?;
        let old_file = current
            .linked_perpetrator_id
            .and_then(|fid| self.files.iter().position(|f| f.id == fid));

        // Plan: new totals per file index, checked before anything is written.
        let target = self.target_for(&perpetrator_name);
        let mut totals: HashMap<usize, Cost> = HashMap::new();
        if let Some(old) = old_file {
            totals.insert(old, self.files[old].totals().checked_sub(old_cost)?);
        }
        let created_totals = match &target {
            Target::Existing(t) => {
                let base = match totals.get(t) {
                    Some(reduced) => *reduced,
                    None => self.files[*t].totals(),
                };
                totals.insert(*t, base.checked_add(new_cost)?);
                None
            }
            Target::Create(_) => Some(new_cost),
        };

        // Apply.
        if let Some(old) = old_file {
            unlink(&mut self.files[old], id);
        }
        for (file_index, cost) in &totals {
            self.files[*file_index].set_totals(*cost);
        }
        let target_index = self.materialize(target);
        if let Some(cost) = created_totals {
            self.files[target_index].set_totals(cost);
        }
        link(&mut self.files[target_index], id);

        let report = &mut self.reports[index];
        report.display_id = display_id;
        report.perpetrator_name = perpetrator_name;
        report.report_type = report_type;
        report.crimes = crimes;
        report.description = description;
        report.linked_perpetrator_id = Some(self.files[target_index].id);
        tracing::info!(report = %id, file = %self.files[target_index].id, "report edited");

        Ok(report.clone())
    }

    /// Delete a report and reverse its cost. Unknown ids are a no-op.
    pub fn delete_report(&mut self, id: Uuid) -> Result<Option<Report>> {
        let Some(index) = self.reports.iter().position(|r| r.id == id) else {
            tracing::debug!(report = %id, "delete of unknown report ignored");
            return Ok(None);
        };
        let report = &self.reports[index];

        let old_file = report
            .linked_perpetrator_id
            .and_then(|fid| self.files.iter().position(|f| f.id == fid));
        let reduced = match old_file {
            Some(old) => Some(self.files[old].totals().checked_sub(report.cost()?)?),
            None => None,
        };

        if let (Some(old), Some(cost)) = (old_file, reduced) {
            let file = &mut self.files[old];
            file.set_totals(cost);
            unlink(file, id);
        }
        let removed = self.reports.remove(index);
        tracing::info!(report = %id, "report deleted");
        Ok(Some(removed))
    }

    /// Create a perpetrator file by hand.
    pub fn create_perpetrator_file(&mut self, new: NewPerpetratorFile) -> Result<PerpetratorFile> {
        let name = require_text("Name", &new.name)?;
        if self.find_perpetrator_by_name(&name).is_some() {
            return Err(CasebookError::DuplicateName(name));
        }

        let mut file = PerpetratorFile::named(name);
        file.date_of_birth = new.date_of_birth.trim().to_string();
        file.birthplace = new.birthplace.trim().to_string();
        file.description = new.description;
        file.image_ref = new.image_ref;

        tracing::info!(file = %file.id, "perpetrator file created");
        self.files.push(file.clone());
        Ok(file)
    }

    /// Edit a perpetrator file. A rename is copied to every linked report.
    pub fn edit_perpetrator_file(
        &mut self,
        id: Uuid,
        changes: PerpetratorFileChanges,
    ) -> Result<FileUpdate> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| not_found_file(id))?;

        let name = match changes.name.as_deref() {
            Some(name) => require_text("Name", name)?,
            None => self.files[index].name.clone(),
        };
        let collides = self
            .files
            .iter()
            .any(|f| f.id != id && f.is_named(&name));
        if collides {
            return Err(CasebookError::DuplicateName(name));
        }

        let file = &mut self.files[index];
        let renamed = file.name != name;
        file.name = name;
        if let Some(dob) = changes.date_of_birth {
            file.date_of_birth = dob.trim().to_string();
        }
        if let Some(birthplace) = changes.birthplace {
            file.birthplace = birthplace.trim().to_string();
        }
        if let Some(description) = changes.description {
            file.description = description;
        }
        let superseded_image = match changes.image {
            ImageChange::Keep => None,
            ImageChange::Replace(new_ref) => {
                let old = file.image_ref.replace(new_ref.clone());
                old.filter(|old| *old != new_ref)
            }
            ImageChange::Clear => file.image_ref.take(),
        };
        let file = file.clone();

        if renamed {
            for report in self
                .reports
                .iter_mut()
                .filter(|r| r.linked_perpetrator_id == Some(id))
            {
                report.perpetrator_name = file.name.clone();
            }
        }
        tracing::info!(file = %id, renamed, "perpetrator file edited");

        Ok(FileUpdate {
            file,
            superseded_image,
        })
    }

    /// Delete a perpetrator file. Linked reports are kept and unlinked.
    pub fn delete_perpetrator_file(&mut self, id: Uuid) -> Result<PerpetratorFile> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| not_found_file(id))?;

        for report in self
            .reports
            .iter_mut()
            .filter(|r| r.linked_perpetrator_id == Some(id))
        {
            report.linked_perpetrator_id = None;
        }
        let removed = self.files.remove(index);
        tracing::info!(file = %id, "perpetrator file deleted");
        Ok(removed)
    }

    /// Check the cached totals and both directions of every link.
    pub fn verify(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for file in &self.files {
            let mut expected: Result<Cost> = Ok(Cost::ZERO);
            for report_id in &file.linked_report_ids {
                match self.get_report(*report_id) {
                    Some(report) => {
                        if report.linked_perpetrator_id != Some(file.id) {
                            issues.push(IntegrityIssue::ForeignLink {
                                file_id: file.id,
                                report_id: *report_id,
                            });
                        }
                        expected = expected
                            .and_then(|acc| report.cost().and_then(|c| acc.checked_add(c)));
                    }
                    None => issues.push(IntegrityIssue::DanglingLink {
                        file_id: file.id,
                        report_id: *report_id,
                    }),
                }
            }
            match expected {
                Ok(expected) if expected != file.totals() => {
                    issues.push(IntegrityIssue::TotalsMismatch {
                        file_id: file.id,
                        name: file.name.clone(),
                        stored: file.totals(),
                        expected,
                    })
                }
                Ok(_) => {}
                Err(_) => issues.push(IntegrityIssue::TotalsOverflow {
                    file_id: file.id,
                    name: file.name.clone(),
                }),
            }
        }

        for report in &self.reports {
            let Some(file_id) = report.linked_perpetrator_id else {
                continue;
            };
            match self.get_perpetrator_file(file_id) {
                None => issues.push(IntegrityIssue::MissingPerpetrator {
                    report_id: report.id,
                    file_id,
                }),
                Some(file) if !file.linked_report_ids.contains(&report.id) => {
                    issues.push(IntegrityIssue::UnlistedReport {
                        report_id: report.id,
                        file_id,
                    })
                }
                Some(_) => {}
            }
        }

        issues
    }

    /// Recompute link sets and totals from each report's back-reference.
    /// Reports pointing at a missing file are unlinked. Returns the number of
    /// records changed.
    pub fn rebuild_totals(&mut self) -> Result<usize> {
        let mut plan: Vec<(Vec<Uuid>, Cost)> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let mut ids = Vec::new();
            let mut cost = Cost::ZERO;
            for report in self
                .reports
                .iter()
                .filter(|r| r.linked_perpetrator_id == Some(file.id))
            {
                ids.push(report.id);
                cost = cost.checked_add(report.cost()?)?;
            }
            plan.push((ids, cost));
        }

        let mut changed = 0;
        for (file, (ids, cost)) in self.files.iter_mut().zip(plan) {
            if file.linked_report_ids != ids || file.totals() != cost {
                file.linked_report_ids = ids;
                file.set_totals(cost);
                changed += 1;
            }
        }
        let files = &self.files;
        for report in &mut self.reports {
            if let Some(file_id) = report.linked_perpetrator_id {
                if !files.iter().any(|f| f.id == file_id) {
                    report.linked_perpetrator_id = None;
                    changed += 1;
                }
            }
        }
        tracing::info!(changed, "ledger totals rebuilt");
        Ok(changed)
    }

    fn target_for(&self, name: &str) -> Target {
        match self.files.iter().position(|f| f.is_named(name)) {
            Some(index) => Target::Existing(index),
            None => Target::Create(PerpetratorFile::named(name)),
        }
    }

    fn materialize(&mut self, target: Target) -> usize {
        match target {
            Target::Existing(index) => index,
            Target::Create(file) => {
                tracing::info!(file = %file.id, "perpetrator file created for report");
                self.files.push(file);
                self.files.len() - 1
            }
        }
    }
}

/// Human-readable crime list: `"A"`, `"A and B"`, `"A, B and C"`.
pub fn format_crime_list(crimes: &[Crime]) -> String {
    let names: Vec<String> = crimes.iter().map(Crime::display_name).collect();
    match names.as_slice() {
        [] => "No crimes selected".to_string(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}

fn validate_report(
    display_id: &str,
    perpetrator_name: &str,
    report_type: &str,
    crimes: &[Crime],
) -> Result<(String, String, String)> {
    let display_id = require_text("Report ID", display_id)?;
    let perpetrator_name = require_text("Perpetrator name", perpetrator_name)?;
    let report_type = require_text("Report type", report_type)?;
    if crimes.is_empty() {
        return Err(CasebookError::Validation(
            "At least one crime must be selected".to_string(),
        ));
    }
    Ok((display_id, perpetrator_name, report_type))
}

fn link(file: &mut PerpetratorFile, report_id: Uuid) {
    if !file.linked_report_ids.contains(&report_id) {
        file.linked_report_ids.push(report_id);
    }
}

fn unlink(file: &mut PerpetratorFile, report_id: Uuid) {
    file.linked_report_ids.retain(|id| *id != report_id);
}

fn not_found_file(id: Uuid) -> CasebookError {
    CasebookError::NotFound(format!("perpetrator file {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diebstahl() -> Crime {
        Crime::new("Diebstahl", "§ 242 StGB", 5, 100)
    }

    fn raub() -> Crime {
        Crime::new("Raub", "§ 249 StGB", 10, 500)
    }

    fn report(name: &str, crimes: Vec<Crime>) -> NewReport {
        NewReport::new("AZ-1", name, "Anzeige", crimes)
    }

    #[test]
    fn test_create_report_auto_creates_file() {
        let mut ledger = CaseLedger::default();
        let created = ledger
            .create_report(report("Max Muster", vec![diebstahl(), raub()]))
            .unwrap();

        let file = ledger.find_perpetrator_by_name("max muster").unwrap();
        assert_eq!(file.total_detention_units, 15);
        assert_eq!(file.total_fine, 600);
        assert_eq!(file.linked_report_ids, vec![created.id]);
        assert_eq!(created.linked_perpetrator_id, Some(file.id));
        assert_ne!(created.id.to_string(), created.display_id);
    }

    #[test]
    fn test_create_report_reuses_file_case_insensitively() {
        let mut ledger = CaseLedger::default();
        ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        ledger.create_report(report("MAX", vec![raub()])).unwrap();

        assert_eq!(ledger.perpetrator_files().len(), 1);
        let file = &ledger.perpetrator_files()[0];
        assert_eq!(file.totals(), Cost { detention_units: 15, fine: 600 });
        assert_eq!(file.linked_report_ids.len(), 2);
    }

    #[test]
    fn test_create_report_validation() {
        let mut ledger = CaseLedger::default();
        assert!(matches!(
            ledger.create_report(report("Max", vec![])),
            Err(CasebookError::Validation(_))
        ));
        assert!(matches!(
            ledger.create_report(NewReport::new("  ", "Max", "Anzeige", vec![raub()])),
            Err(CasebookError::Validation(_))
        ));
        assert!(ledger.perpetrator_files().is_empty());
        assert!(ledger.reports().is_empty());
    }

    #[test]
    fn test_edit_report_moves_cost_to_new_perpetrator() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        ledger.create_report(report("Erika", vec![raub()])).unwrap();

        let edited = ledger
            .edit_report(created.id, ReportChanges::new().perpetrator_name("erika"))
            .unwrap();

        let max = ledger.find_perpetrator_by_name("Max").unwrap();
        assert_eq!(max.totals(), Cost::ZERO);
        assert!(max.linked_report_ids.is_empty());

        let erika = ledger.find_perpetrator_by_name("Erika").unwrap();
        assert_eq!(erika.totals(), Cost { detention_units: 15, fine: 600 });
        assert_eq!(edited.linked_perpetrator_id, Some(erika.id));
        assert!(ledger.verify().is_empty());
    }

    #[test]
    fn test_edit_report_same_file_applies_net_change() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        ledger
            .edit_report(created.id, ReportChanges::new().crimes(vec![raub(), raub()]))
            .unwrap();

        let file = ledger.find_perpetrator_by_name("Max").unwrap();
        assert_eq!(file.totals(), Cost { detention_units: 20, fine: 1000 });
        assert_eq!(file.linked_report_ids, vec![created.id]);
    }

    #[test]
    fn test_edit_report_to_unknown_name_creates_file() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        ledger
            .edit_report(created.id, ReportChanges::new().perpetrator_name("Neu"))
            .unwrap();
        assert_eq!(ledger.perpetrator_files().len(), 2);
        assert_eq!(
            ledger.find_perpetrator_by_name("neu").unwrap().totals(),
            diebstahl().cost()
        );
    }

    #[test]
    fn test_edit_report_failure_changes_nothing() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        let before_files = ledger.perpetrator_files().to_vec();

        let err = ledger
            .edit_report(
                created.id,
                ReportChanges::new()
                    .perpetrator_name("Erika")
                    .crimes(vec![]),
            )
            .unwrap_err();
        assert!(matches!(err, CasebookError::Validation(_)));
        assert_eq!(ledger.perpetrator_files(), before_files.as_slice());

        assert!(matches!(
            ledger.edit_report(Uuid::new_v4(), ReportChanges::new()),
            Err(CasebookError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_report_reverses_cost() {
        let mut ledger = CaseLedger::default();
        let first = ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        ledger.create_report(report("Max", vec![raub()])).unwrap();

        let removed = ledger.delete_report(first.id).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(first.id));
        let file = ledger.find_perpetrator_by_name("Max").unwrap();
        assert_eq!(file.totals(), raub().cost());
        assert_eq!(file.linked_report_ids.len(), 1);
    }

    #[test]
    fn test_delete_unknown_report_is_noop() {
        let mut ledger = CaseLedger::default();
        ledger.create_report(report("Max", vec![diebstahl()])).unwrap();
        assert!(ledger.delete_report(Uuid::new_v4()).unwrap().is_none());
        assert_eq!(ledger.reports().len(), 1);
    }

    #[test]
    fn test_deleting_sole_report_keeps_zeroed_file() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![raub()])).unwrap();
        ledger.delete_report(created.id).unwrap();

        let file = ledger.find_perpetrator_by_name("Max").unwrap();
        assert_eq!(file.totals(), Cost::ZERO);
        assert!(file.linked_report_ids.is_empty());
    }

    #[test]
    fn test_create_perpetrator_file_duplicate_name() {
        let mut ledger = CaseLedger::default();
        ledger
            .create_perpetrator_file(NewPerpetratorFile::new("Max"))
            .unwrap();
        assert!(matches!(
            ledger.create_perpetrator_file(NewPerpetratorFile::new(" max ")),
            Err(CasebookError::DuplicateName(_))
        ));
        assert!(matches!(
            ledger.create_perpetrator_file(NewPerpetratorFile::new("")),
            Err(CasebookError::Validation(_))
        ));
    }

    #[test]
    fn test_rename_propagates_to_linked_reports() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![raub()])).unwrap();
        let file_id = created.linked_perpetrator_id.unwrap();

        ledger
            .edit_perpetrator_file(file_id, PerpetratorFileChanges::new().name("Maximilian"))
            .unwrap();
        assert_eq!(
            ledger.get_report(created.id).unwrap().perpetrator_name,
            "Maximilian"
        );
    }

    #[test]
    fn test_rename_collision_leaves_state_unchanged() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![raub()])).unwrap();
        ledger.create_report(report("Erika", vec![diebstahl()])).unwrap();
        let file_id = created.linked_perpetrator_id.unwrap();

        let err = ledger
            .edit_perpetrator_file(file_id, PerpetratorFileChanges::new().name("ERIKA"))
            .unwrap_err();
        assert!(matches!(err, CasebookError::DuplicateName(_)));
        assert_eq!(ledger.get_perpetrator_file(file_id).unwrap().name, "Max");
        assert_eq!(ledger.get_report(created.id).unwrap().perpetrator_name, "Max");
    }

    #[test]
    fn test_image_changes_report_superseded_ref() {
        let mut ledger = CaseLedger::default();
        let file = ledger
            .create_perpetrator_file(NewPerpetratorFile::new("Max").with_image_ref("a.png"))
            .unwrap();

        let update = ledger
            .edit_perpetrator_file(
                file.id,
                PerpetratorFileChanges::new().image(ImageChange::Replace("b.png".into())),
            )
            .unwrap();
        assert_eq!(update.superseded_image.as_deref(), Some("a.png"));
        assert_eq!(update.file.image_ref.as_deref(), Some("b.png"));

        let update = ledger
            .edit_perpetrator_file(file.id, PerpetratorFileChanges::new().image(ImageChange::Clear))
            .unwrap();
        assert_eq!(update.superseded_image.as_deref(), Some("b.png"));
        assert!(update.file.image_ref.is_none());
    }

    #[test]
    fn test_delete_perpetrator_file_unlinks_reports() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![raub()])).unwrap();
        let file_id = created.linked_perpetrator_id.unwrap();

        ledger.delete_perpetrator_file(file_id).unwrap();
        let kept = ledger.get_report(created.id).unwrap();
        assert!(kept.linked_perpetrator_id.is_none());
        assert!(ledger.verify().is_empty());
        assert!(matches!(
            ledger.delete_perpetrator_file(file_id),
            Err(CasebookError::NotFound(_))
        ));
    }

    #[test]
    fn test_verify_and_rebuild() {
        let mut ledger = CaseLedger::default();
        let created = ledger.create_report(report("Max", vec![raub()])).unwrap();
        ledger.files[0].total_fine = 1;
        ledger.files[0].linked_report_ids.push(Uuid::new_v4());

        let issues = ledger.verify();
        assert!(issues
            .iter()
            .any(|i| matches!(i, IntegrityIssue::DanglingLink { .. })));
        assert!(issues
            .iter()
            .any(|i| matches!(i, IntegrityIssue::TotalsMismatch { .. })));

        assert_eq!(ledger.rebuild_totals().unwrap(), 1);
        assert!(ledger.verify().is_empty());
        assert_eq!(ledger.files[0].linked_report_ids, vec![created.id]);
    }

    #[test]
    fn test_linked_reports() {
        let mut ledger = CaseLedger::default();
        let a = ledger.create_report(report("Max", vec![raub()])).unwrap();
        ledger.create_report(report("Erika", vec![raub()])).unwrap();
        let linked = ledger
            .linked_reports(a.linked_perpetrator_id.unwrap())
            .unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, a.id);
    }

    #[test]
    fn test_format_crime_list() {
        assert_eq!(format_crime_list(&[]), "No crimes selected");
        assert_eq!(format_crime_list(&[raub()]), "Raub (§ 249 StGB)");
        assert_eq!(
            format_crime_list(&[raub(), Crime::new("Mord", "", 999, 5000)]),
            "Raub (§ 249 StGB) and Mord"
        );
        assert_eq!(
            format_crime_list(&[raub(), diebstahl(), Crime::new("X", "", 0, 0)]),
            "Raub (§ 249 StGB), Diebstahl (§ 242 StGB) and X"
        );
    }
}
