//! The capture run: pull the recent, not yet seen rows of a source export
//! into the originals file.
use tracing::{info, info_span};

use crate::{
    config::CaptureConfig,
    error::Result,
    existing_keys, get_field,
    input::{load_table, load_table_or_empty},
    schema::{DATE_FIELD, KEY_FIELD, ORIGINALS_COLUMNS},
    NoveltyTally, RecencyTally, RowStream, Table,
};

/// How many new keys are echoed to the log before appending.
const SAMPLE_SIZE: usize = 10;

/// Numbers describing one capture run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub source_rows: usize,
    pub recency: RecencyTally,
    pub existing_keys: usize,
    pub novelty: NoveltyTally,
    pub written: usize,
    /// First few keys that were appended.
    pub sample_keys: Vec<String>,
}

/// Runs the whole chain once.
///
/// Missing files or columns abort the run before anything is written. Bad
/// dates and repeated keys are only counted in the returned report.
pub fn run_capture(config: &CaptureConfig) -> Result<CaptureReport> {
    let _span = info_span!("capture", source = %config.source_path.display()).entered();

    let source = load_table(&config.source_path, config.encoding)?;
    let mut report = CaptureReport {
        source_rows: source.len(),
        ..CaptureReport::default()
    };

    let projected = source.select(ORIGINALS_COLUMNS)?;
    info!(
        "trimmed source to {} columns, {} rows",
        ORIGINALS_COLUMNS.len(),
        report.source_rows
    );

    let recent = projected.recent(DATE_FIELD, config.window())?;
    let recency = recent.tally();
    let candidates = Table::from_stream(recent)?;
    report.recency = recency.snapshot();

    if candidates.is_empty() {
        info!("no recent rows in source after {} filter, nothing to do", DATE_FIELD);

        return Ok(report);
    }

    let originals = load_table_or_empty(&config.destination_path, config.encoding)?;
    let existing = existing_keys(&originals, KEY_FIELD);
    report.existing_keys = existing.len();

    let novel = candidates.novel(KEY_FIELD, existing)?;
    let novelty = novel.tally();
    let new_rows = Table::from_stream(novel)?;
    report.novelty = novelty.snapshot();

    report.sample_keys = new_rows
        .rows()
        .iter()
        .take(SAMPLE_SIZE)
        .filter_map(|row| get_field(new_rows.headers(), row, KEY_FIELD))
        .map(str::to_string)
        .collect();

    info!("new {} values to append: {}", KEY_FIELD, new_rows.len());

    if !report.sample_keys.is_empty() {
        info!("first {}: {}", report.sample_keys.len(), report.sample_keys.join(", "));
    }

    report.written = new_rows
        .append_to(&config.destination_path, ORIGINALS_COLUMNS)?
        .encoding(config.encoding)
        .run()?;

    info!("capture complete, rows written: {}", report.written);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::run_capture;
    use crate::{
        config::CaptureConfig, input::load_table, schema::ORIGINALS_COLUMNS, Error, NoveltyTally, Row,
    };
    use chrono::NaiveDate;
    use encoding::all::{UTF_8, WINDOWS_1252};
    use encoding::{EncoderTrap, Encoding};
    use std::fs;
    use std::path::Path;

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Writes a file with the originals columns, plus a `CLERK` column when
    /// `extra` is set. Every row gets `entry_date`, other values derive from
    /// the key.
    fn write_export(path: &Path, keys: &[&str], entry_date: &str, extra: bool) {
        let mut header: Vec<&str> = ORIGINALS_COLUMNS.to_vec();

        if extra {
            header.push("CLERK");
        }

        let mut text = header.join(",");
        text.push('\n');

        for key in keys {
            let fields: Vec<String> = header
                .iter()
                .map(|c| match *c {
                    "DOC_ID" => key.to_string(),
                    "ENTRY_DATE" => entry_date.to_string(),
                    other => format!("{}-{}", other.to_lowercase(), key),
                })
                .collect();

            text.push_str(&fields.join(","));
            text.push('\n');
        }

        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_appends_only_new_keys() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tm.csv");
        let originals = dir.path().join("originals.csv");

        write_export(&source, &["1", "2", "3", "4", "5"], "10/06/2024", true);
        write_export(&originals, &["1", "2", "3"], "01/06/2024", false);

        let config = CaptureConfig::new(&source, &originals, june_15());
        let report = run_capture(&config).unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.existing_keys, 3);
        assert_eq!(report.sample_keys, vec!["4", "5"]);

        let after = load_table(&originals, UTF_8).unwrap();

        assert_eq!(*after.headers().as_row(), Row::from(ORIGINALS_COLUMNS.to_vec()));
        assert_eq!(
            after.column("DOC_ID").unwrap().collect::<Vec<_>>(),
            vec!["1", "2", "3", "4", "5"]
        );

        let again = run_capture(&config).unwrap();

        assert_eq!(again.written, 0);
        assert_eq!(load_table(&originals, UTF_8).unwrap().len(), 5);
    }

    #[test]
    fn test_destination_keeps_its_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tm.csv");
        let originals = dir.path().join("originals.csv");

        write_export(&source, &["1", "2"], "10/06/2024", true);
        write_export(&originals, &["1"], "01/06/2024", false);

        for path in [&source, &originals] {
            let text = fs::read_to_string(path)
                .unwrap()
                .replace("vendor_name_1-", "Café-");
            let bytes = WINDOWS_1252.encode(&text, EncoderTrap::Strict).unwrap();

            fs::write(path, bytes).unwrap();
        }

        let mut config = CaptureConfig::new(&source, &originals, june_15());
        config.encoding = WINDOWS_1252;

        assert_eq!(run_capture(&config).unwrap().written, 1);

        let after = load_table(&originals, WINDOWS_1252).unwrap();

        assert_eq!(
            after.column("VENDOR_NAME_1").unwrap().collect::<Vec<_>>(),
            vec!["Café-1", "Café-2"]
        );
    }

    #[test]
    fn test_bootstrap_from_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let originals = dir.path().join("data").join("originals.csv");

        let config = CaptureConfig::new("test/assets/transaction_master.csv", &originals, june_15());
        let report = run_capture(&config).unwrap();

        assert_eq!(report.source_rows, 6);
        // 30 days back from 15/06 is 16/05: 01/05 and 30/04 are too old
        assert_eq!(report.recency.kept, 3);
        assert_eq!(report.recency.too_old, 2);
        assert_eq!(report.recency.unparseable, 1);
        assert_eq!(report.existing_keys, 0);
        assert_eq!(
            report.novelty,
            NoveltyTally {
                duplicates: 1,
                already_captured: 0,
                novel: 2,
            }
        );

        let written = load_table(&originals, UTF_8).unwrap();

        assert_eq!(written.len(), 2);
        assert!(!written.headers().contains_key("CLERK"));
        // the first of the two 5100000002 rows is the one kept
        assert_eq!(
            written.column("AMOUNT").unwrap().collect::<Vec<_>>(),
            vec!["1250.00", "88.40"]
        );
        assert_eq!(
            written.column("VENDOR_NAME_1").unwrap().last(),
            Some("Harbour Freight")
        );
    }

    #[test]
    fn test_wider_window_reaches_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let originals = dir.path().join("originals.csv");

        let mut config =
            CaptureConfig::new("test/assets/transaction_master.csv", &originals, june_15());
        config.days_back = 45;

        let report = run_capture(&config).unwrap();

        // 01/05/2024 is exactly 45 days back and counts as recent
        assert_eq!(report.recency.kept, 4);
        assert_eq!(report.written, 3);
    }

    #[test]
    fn test_nothing_recent_leaves_destination_alone() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tm.csv");
        let originals = dir.path().join("missing").join("originals.csv");

        write_export(&source, &["1", "2"], "01/01/2020", true);

        let report = run_capture(&CaptureConfig::new(&source, &originals, june_15())).unwrap();

        assert_eq!(report.recency.too_old, 2);
        assert_eq!(report.written, 0);
        assert!(!originals.exists());
    }

    #[test]
    fn test_structural_errors_abort() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tm.csv");
        let originals = dir.path().join("originals.csv");

        let missing = run_capture(&CaptureConfig::new(&source, &originals, june_15()));

        assert!(matches!(missing, Err(Error::NotFound(_))));

        fs::write(&source, "DOC_ID,ENTRY_DATE\n1,10/06/2024\n").unwrap();

        match run_capture(&CaptureConfig::new(&source, &originals, june_15())) {
            Err(Error::Schema { stage, missing }) => {
                assert_eq!(stage, "select");
                assert!(missing.contains(&"ABN".to_string()));
                assert!(!missing.contains(&"DOC_ID".to_string()));
            }
            other => panic!("expected a schema error, got {:?}", other),
        }

        assert!(!originals.exists());
    }
}
