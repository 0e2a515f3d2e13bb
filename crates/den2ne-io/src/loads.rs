//! `loads.csv` ingestion: `Bus_no, 15, 30, ..., 1440` — one row per
//! load-bearing node, 96 fifteen-minute columns of signed kW.
//!
//! Grounded on `getLoads(filename, threshold)` in
//! `src/ccomplex/iterative.py`: values are rounded to a fixed number of
//! decimals on ingest (spec.md §6 fixes this at 3).

use std::collections::HashMap;
use std::path::Path;

use den2ne_core::diagnostics::Diagnostics;
use den2ne_core::error::{DenError, DenResult};

/// Decimal places loads are rounded to on ingest, per spec.md §6.
pub const LOAD_ROUND_DECIMALS: i32 = 3;

/// The parsed contents of `loads.csv`: the ordered timestep columns (the
/// header values after `Bus_no`) and each node's per-timestep load vector.
#[derive(Debug, Clone, Default)]
pub struct LoadsTable {
    pub timesteps: Vec<u32>,
    pub rows: HashMap<String, Vec<f64>>,
}

impl LoadsTable {
    /// The per-node load map for one timestep, suitable for
    /// `GraphInput::loads`. Nodes without an entry are simply absent (they
    /// become VIRTUAL nodes at graph-construction time, per spec.md §4.1).
    pub fn loads_at(&self, timestep: u32) -> HashMap<String, f64> {
        let Some(col) = self.timesteps.iter().position(|&t| t == timestep) else {
            return HashMap::new();
        };
        self.rows
            .iter()
            .filter_map(|(name, values)| values.get(col).map(|&v| (name.clone(), v)))
            .collect()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn load_loads_csv(path: &Path) -> DenResult<(LoadsTable, Diagnostics)> {
    let mut diag = Diagnostics::new();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DenError::Parse(format!("failed to open {}: {}", path.display(), e)))?;

    let header = reader.headers().map_err(|e| DenError::Parse(e.to_string()))?.clone();
    let mut timesteps = Vec::with_capacity(header.len().saturating_sub(1));
    for col in header.iter().skip(1) {
        match col.trim().parse::<u32>() {
            Ok(t) => timesteps.push(t),
            Err(_) => diag.add_warning_at_line("parse", &format!("non-numeric timestep column header '{}'", col), 1),
        }
    }

    let mut rows = HashMap::new();
    for (line, record) in reader.records().enumerate() {
        let line = line + 2; // header is line 1, csv::Reader is 0-indexed past it
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                diag.add_error_at_line("parse", &format!("malformed row: {}", e), line);
                continue;
            }
        };
        let Some(node_name) = record.get(0) else {
            diag.add_error_at_line("parse", "row missing Bus_no column", line);
            continue;
        };
        let node_name = node_name.trim().to_string();

        let mut values = Vec::with_capacity(timesteps.len());
        let mut row_ok = true;
        for field in record.iter().skip(1) {
            match field.trim().parse::<f64>() {
                Ok(v) => values.push(round_to(v, LOAD_ROUND_DECIMALS)),
                Err(_) => {
                    diag.add_error_with_entity("parse", &format!("non-numeric load value '{}'", field), &node_name);
                    row_ok = false;
                    break;
                }
            }
        }
        if row_ok {
            rows.insert(node_name, values);
        }
    }

    Ok((LoadsTable { timesteps, rows }, diag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_header_timesteps_and_rounds_values() {
        let f = write_fixture("Bus_no,15,30\n2,1.23456,-2.00001\n3,0,0\n");
        let (table, diag) = load_loads_csv(f.path()).unwrap();
        assert_eq!(table.timesteps, vec![15, 30]);
        assert!(!diag.has_errors());
        assert_eq!(table.rows["2"], vec![1.235, -2.0]);
    }

    #[test]
    fn loads_at_missing_timestep_is_empty() {
        let f = write_fixture("Bus_no,15,30\n2,1.0,2.0\n");
        let (table, _) = load_loads_csv(f.path()).unwrap();
        assert!(table.loads_at(999).is_empty());
    }

    #[test]
    fn loads_at_returns_per_node_map() {
        let f = write_fixture("Bus_no,15,30\n2,1.0,2.0\n3,-1.0,-2.0\n");
        let (table, _) = load_loads_csv(f.path()).unwrap();
        let at_30 = table.loads_at(30);
        assert_eq!(at_30.get("2"), Some(&2.0));
        assert_eq!(at_30.get("3"), Some(&-2.0));
    }

    #[test]
    fn malformed_row_reported_not_fatal() {
        let f = write_fixture("Bus_no,15\n2,not_a_number\n3,1.0\n");
        let (table, diag) = load_loads_csv(f.path()).unwrap();
        assert!(diag.has_errors());
        assert!(table.rows.contains_key("3"));
        assert!(!table.rows.contains_key("2"));
    }
}
