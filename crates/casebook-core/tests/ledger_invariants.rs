use proptest::prelude::*;

use casebook_core::{
    CaseLedger, CasebookError, Crime, CrimeCatalog, NewPerpetratorFile, NewReport,
    PerpetratorFileChanges, ReportChanges,
};

const NAMES: &[&str] = &["Max", "max", "Erika", "ERIKA", "Otto", "Lena"];

#[derive(Debug, Clone)]
enum Op {
    Create { name: usize, crimes: Vec<usize> },
    Edit { report: usize, name: usize, crimes: Vec<usize> },
    DeleteReport { report: usize },
    CreateFile { name: usize },
    RenameFile { file: usize, name: usize },
    DeleteFile { file: usize },
}

fn op() -> impl Strategy<Value = Op> {
    let crimes = prop::collection::vec(0usize..16, 0..4);
    prop_oneof![
        (0..NAMES.len(), crimes.clone()).prop_map(|(name, crimes)| Op::Create { name, crimes }),
        (0usize..8, 0..NAMES.len(), crimes)
            .prop_map(|(report, name, crimes)| Op::Edit { report, name, crimes }),
        (0usize..8).prop_map(|report| Op::DeleteReport { report }),
        (0..NAMES.len()).prop_map(|name| Op::CreateFile { name }),
        (0usize..6, 0..NAMES.len()).prop_map(|(file, name)| Op::RenameFile { file, name }),
        (0usize..6).prop_map(|file| Op::DeleteFile { file }),
    ]
}

fn pick(catalog: &[Crime], indices: &[usize]) -> Vec<Crime> {
    indices.iter().map(|i| catalog[*i].clone()).collect()
}

fn apply(ledger: &mut CaseLedger, catalog: &[Crime], op: &Op) -> Result<(), CasebookError> {
    match op {
        Op::Create { name, crimes } => ledger
            .create_report(NewReport::new("AZ", NAMES[*name], "Anzeige", pick(catalog, crimes)))
            .map(|_| ()),
        Op::Edit {
            report,
            name,
            crimes,
        } => match ledger.reports().get(*report).map(|r| r.id) {
            Some(id) => ledger
                .edit_report(
                    id,
                    ReportChanges::new()
                        .perpetrator_name(NAMES[*name])
                        .crimes(pick(catalog, crimes)),
                )
                .map(|_| ()),
            None => Ok(()),
        },
        Op::DeleteReport { report } => match ledger.reports().get(*report).map(|r| r.id) {
            Some(id) => ledger.delete_report(id).map(|_| ()),
            None => Ok(()),
        },
        Op::CreateFile { name } => ledger
            .create_perpetrator_file(NewPerpetratorFile::new(NAMES[*name]))
            .map(|_| ()),
        Op::RenameFile { file, name } => {
            match ledger.perpetrator_files().get(*file).map(|f| f.id) {
                Some(id) => ledger
                    .edit_perpetrator_file(id, PerpetratorFileChanges::new().name(NAMES[*name]))
                    .map(|_| ()),
                None => Ok(()),
            }
        }
        Op::DeleteFile { file } => match ledger.perpetrator_files().get(*file).map(|f| f.id) {
            Some(id) => ledger.delete_perpetrator_file(id).map(|_| ()),
            None => Ok(()),
        },
    }
}

proptest! {
    #[test]
    fn ledger_stays_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let catalog = CrimeCatalog::with_defaults().crimes().to_vec();
        let mut ledger = CaseLedger::default();

        for op in &ops {
            let files_before = ledger.perpetrator_files().to_vec();
            let reports_before = ledger.reports().to_vec();

            if let Err(err) = apply(&mut ledger, &catalog, op) {
                prop_assert!(err.is_user_error(), "unexpected error {:?}", err);
                prop_assert_eq!(ledger.perpetrator_files(), files_before.as_slice());
                prop_assert_eq!(ledger.reports(), reports_before.as_slice());
            }

            let issues = ledger.verify();
            prop_assert!(issues.is_empty(), "after {:?}: {:?}", op, issues);

            let mut names: Vec<String> = ledger
                .perpetrator_files()
                .iter()
                .map(|f| f.name.to_lowercase())
                .collect();
            names.sort();
            let before = names.len();
            names.dedup();
            prop_assert_eq!(before, names.len());
        }
    }

    #[test]
    fn report_totals_match_crime_costs(indices in prop::collection::vec(0usize..16, 1..6)) {
        let catalog = CrimeCatalog::with_defaults().crimes().to_vec();
        let crimes = pick(&catalog, &indices);
        let mut ledger = CaseLedger::default();
        ledger
            .create_report(NewReport::new("AZ", "Max", "Anzeige", crimes.clone()))
            .expect("create should succeed");

        let file = ledger.find_perpetrator_by_name("Max").expect("file should exist");
        prop_assert_eq!(
            file.total_detention_units,
            crimes.iter().map(|c| c.detention_units).sum::<i64>()
        );
        prop_assert_eq!(file.total_fine, crimes.iter().map(|c| c.fine).sum::<i64>());
    }
}
