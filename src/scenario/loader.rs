//! Load scenario parameter sets from CSV
//!
//! One scenario per row. Columns match the `ScenarioParams` field names and
//! may appear in any order; omitted columns take the defaults. Dates are
//! `YYYY-MM-DD`, and an empty date cell counts as absent.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ScenarioParams;
use crate::error::LoadError;

/// Load scenarios from a CSV file on disk
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioParams>, LoadError> {
    let file = File::open(path.as_ref())?;
    let scenarios = load_scenarios_from_reader(file)?;
    log::info!("Loaded {} scenarios from {}", scenarios.len(), path.as_ref().display());
    Ok(scenarios)
}

/// Load scenarios from any CSV reader
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<ScenarioParams>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let name_col = headers.iter().position(|h| h == "name");

    let mut scenarios = Vec::new();
    // Rows count from 1, header excluded, to match `Scenario` default names
    for (i, record) in csv_reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|source| LoadError::Scenario {
            row,
            name: format!("scenario_{row}"),
            source,
        })?;
        let params: ScenarioParams =
            record
                .deserialize(Some(&headers))
                .map_err(|source| LoadError::Scenario {
                    row,
                    name: row_name(&record, name_col, row),
                    source,
                })?;
        scenarios.push(params);
    }
    Ok(scenarios)
}

fn row_name(record: &csv::StringRecord, name_col: Option<usize>, row: usize) -> String {
    name_col
        .and_then(|col| record.get(col))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("scenario_{row}"))
}
