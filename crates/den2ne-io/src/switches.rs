//! `switches.csv` ingestion (optional file): `Node A, Node B, State`.

use std::path::Path;

use den2ne_core::diagnostics::Diagnostics;
use den2ne_core::error::{DenError, DenResult};
use den2ne_core::graph::SwitchEdgeInput;
use den2ne_core::link::SwitchState;

fn parse_state(raw: &str) -> Option<SwitchState> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "open" => Some(SwitchState::Open),
        "closed" => Some(SwitchState::Closed),
        _ => None,
    }
}

pub fn load_switches_csv(path: &Path) -> DenResult<(Vec<SwitchEdgeInput>, Diagnostics)> {
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

        let fields = (record.get(0), record.get(1), record.get(2));
        let (Some(a), Some(b), Some(state_raw)) = fields else {
            diag.add_error_at_line("parse", "row is missing a required column", line);
            continue;
        };

        let Some(state) = parse_state(state_raw) else {
            diag.add_error_at_line("parse", &format!("unknown switch state '{}'", state_raw), line);
            continue;
        };

        edges.push(SwitchEdgeInput { a: a.trim().to_string(), b: b.trim().to_string(), state });
    }

    Ok((edges, diag))
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
    fn parses_switch_states() {
        let f = write_fixture("Node A,Node B,State\n2,99,open\n3,100,closed\n");
        let (edges, diag) = load_switches_csv(f.path()).unwrap();
        assert!(!diag.has_errors());
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].state, SwitchState::Open);
        assert_eq!(edges[1].state, SwitchState::Closed);
    }

    #[test]
    fn unknown_state_is_reported_not_fatal() {
        let f = write_fixture("Node A,Node B,State\n2,99,maybe\n3,100,closed\n");
        let (edges, diag) = load_switches_csv(f.path()).unwrap();
        assert!(diag.has_errors());
        assert_eq!(edges.len(), 1);
    }
}
