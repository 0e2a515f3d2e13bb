//! `links.csv` and `links_config*.csv` ingestion.
//!
//! Grounded on `getEdges`/`getEdges_Config` in `src/ccomplex/iterative.py`.

use std::collections::HashMap;
use std::path::Path;

use den2ne_core::diagnostics::Diagnostics;
use den2ne_core::error::{DenError, DenResult};
use den2ne_core::graph::NormalEdgeInput;
use den2ne_core::link::LinkConfig;

/// `links.csv`: `Node A, Node B, Length (ft.), Config.`
pub fn load_links_csv(path: &Path) -> DenResult<(Vec<NormalEdgeInput>, Diagnostics)> {
    let mut diag = Diagnostics::new();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DenError::Parse(format!("failed to open {}: {}", path.display(), e)))?;

    let mut edges = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let line = line + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                diag.add_error_at_line("parse", &format!("malformed row: {}", e), line);
                continue;
            }
        };

        let fields = (record.get(0), record.get(1), record.get(2), record.get(3));
        let (Some(a), Some(b), Some(dist), Some(config)) = fields else {
            diag.add_error_at_line("parse", "row is missing a required column", line);
            continue;
        };

        let dist_ft: u32 = match dist.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                diag.add_error_at_line("parse", &format!("non-integer length '{}'", dist), line);
                continue;
            }
        };
        let config_id: u32 = match config.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                diag.add_error_at_line("parse", &format!("non-integer config id '{}'", config), line);
                continue;
            }
        };

        edges.push(NormalEdgeInput {
            a: a.trim().to_string(),
            b: b.trim().to_string(),
            dist_ft,
            config_id,
        });
    }

    Ok((edges, diag))
}

/// `links_config*.csv`: `id, coef_r, i_max, section` (section is free-form
/// and unused by the core, per spec.md §6).
pub fn load_links_config_csv(path: &Path) -> DenResult<(HashMap<u32, LinkConfig>, Diagnostics)> {
    let mut diag = Diagnostics::new();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DenError::Parse(format!("failed to open {}: {}", path.display(), e)))?;

    let mut configs = HashMap::new();
    for (line, record) in reader.records().enumerate() {
        let line = line + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                diag.add_error_at_line("parse", &format!("malformed row: {}", e), line);
                continue;
            }
        };

        let fields = (record.get(0), record.get(1), record.get(2));
        let (Some(id), Some(coef_r), Some(i_max)) = fields else {
            diag.add_error_at_line("parse", "row is missing a required column", line);
            continue;
        };

        let id: u32 = match id.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                diag.add_error_at_line("parse", &format!("non-integer config id '{}'", id), line);
                continue;
            }
        };
        let coef_r: f64 = match coef_r.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                diag.add_error_with_entity("parse", &format!("non-numeric coef_r '{}'", coef_r), &id.to_string());
                continue;
            }
        };
        let i_max: f64 = match i_max.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                diag.add_error_with_entity("parse", &format!("non-numeric i_max '{}'", i_max), &id.to_string());
                continue;
            }
        };

        configs.insert(id, LinkConfig { coef_r, i_max });
    }

    Ok((configs, diag))
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
    fn parses_links_csv() {
        let f = write_fixture("Node A,Node B,Length (ft.),Config.\n1,2,100,1\n2,3,100,1\n");
        let (edges, diag) = load_links_csv(f.path()).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(!diag.has_errors());
        assert_eq!(edges[0].a, "1");
        assert_eq!(edges[0].dist_ft, 100);
    }

    #[test]
    fn parses_links_config_csv() {
        let f = write_fixture("id,coef_r,i_max,section\n1,0.3,400,main\n");
        let (configs, diag) = load_links_config_csv(f.path()).unwrap();
        assert!(!diag.has_errors());
        let cfg = configs.get(&1).unwrap();
        assert_eq!(cfg.coef_r, 0.3);
        assert_eq!(cfg.i_max, 400.0);
    }

    #[test]
    fn malformed_config_row_reported_not_fatal() {
        let f = write_fixture("id,coef_r,i_max,section\n1,bad,400,main\n2,0.3,400,main\n");
        let (configs, diag) = load_links_config_csv(f.path()).unwrap();
        assert!(diag.has_errors());
        assert!(!configs.contains_key(&1));
        assert!(configs.contains_key(&2));
    }
}
