use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::EventExport;
use crate::export::xlsx::export_xlsx;
use crate::models::{RawRow, Subject};
use crate::store::EventStore;
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use crate::utils::time::parse_timestamp;
use chrono::NaiveDate;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the ledger to `file`.
    ///
    /// - `subject`: only this subject's log, otherwise every subject.
    /// - `range`: `None`, `"all"` or a period expression (`YYYY`, `YYYY-MM`,
    ///   `YYYY-MM-DD`, or two of the same joined by `:`). With a period, rows
    ///   whose timestamp does not parse are left out.
    ///
    /// Returns the number of rows written.
    pub fn export<S: EventStore>(
        store: &S,
        format: ExportFormat,
        file: &str,
        subject: Option<&Subject>,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_period(r)?),
        };

        let sheets = collect(store, subject, bounds)?;
        let count: usize = sheets.iter().map(|(_, rows)| rows.len()).sum();

        if count == 0 {
            warning("No events found for the selected subjects and range.");
        }

        match format {
            ExportFormat::Csv => export_csv(&flatten(sheets), path)?,
            ExportFormat::Json => export_json(&flatten(sheets), path)?,
            ExportFormat::Xlsx => export_xlsx(&sheets, path)?,
        }

        store.audit(
            "export",
            &path.to_string_lossy(),
            &format!("{count} row(s) exported as {}", format.as_str()),
        );

        Ok(count)
    }
}

fn collect<S: EventStore>(
    store: &S,
    only: Option<&Subject>,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<(String, Vec<EventExport>)>> {
    let subjects = match only {
        Some(s) => vec![s.clone()],
        None => store.subjects()?,
    };

    let mut sheets = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let rows: Vec<EventExport> = store
            .read_rows(&subject)?
            .iter()
            .filter(|row| in_bounds(row, bounds))
            .map(|row| EventExport::from_row(&subject, row))
            .collect();
        if !rows.is_empty() {
            sheets.push((subject.to_string(), rows));
        }
    }
    Ok(sheets)
}

fn in_bounds(row: &RawRow, bounds: Option<(NaiveDate, NaiveDate)>) -> bool {
    match bounds {
        None => true,
        Some((from, to)) => parse_timestamp(&row.timestamp)
            .is_some_and(|t| (from..=to).contains(&t.date())),
    }
}

fn flatten(sheets: Vec<(String, Vec<EventExport>)>) -> Vec<EventExport> {
    sheets.into_iter().flat_map(|(_, rows)| rows).collect()
}
