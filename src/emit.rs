use log::info;
use std::fs::{self, File};
use std::path::Path;

use crate::assign::SolverTables;
use crate::error::{LpnError, Result};
use crate::network::{ElementValue, PREFIX_FLOW, PREFIX_PRESSURE, PREFIX_RESISTOR};

/// Fixed output file names; the downstream solver looks these up by name.
pub const ELEMENT_FILE: &str = "elementTypesAndValues.txt";
pub const BIFURCATION_FILE: &str = "bifurcations.txt";
pub const BOUNDARY_FILE: &str = "boundaryConditions.txt";

/// `<ID>: <prefix>: <value>` per element.
pub fn format_element_types(tables: &SolverTables) -> String {
    let mut out = String::new();
    for (id, entry) in &tables.element_types {
        out.push_str(&format!("{}: {}: {}\n", id, entry.prefix, entry.value.tokens()));
    }
    out
}

/// `<ID>: <space-joined neighbor IDs>` per element; an empty neighbor
/// list leaves nothing after the separator.
pub fn format_bifurcations(tables: &SolverTables) -> String {
    let mut out = String::new();
    for (id, neighbors) in &tables.bifurcations {
        let joined = neighbors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("{}: {}\n", id, joined));
    }
    out
}

/// Boundary-condition records. The literal tokens are part of the solver
/// contract and must not change.
pub fn format_boundary_conditions(tables: &SolverTables) -> Result<String> {
    let mut out = String::new();
    for (&id, entry) in &tables.boundary_conditions {
        match entry.prefix {
            PREFIX_RESISTOR => {
                out.push_str(&format!(
                    "{}:OUTLET RESISTANCE 0.0 {}\n",
                    id,
                    entry.value.tokens()
                ));
            }
            PREFIX_FLOW => {
                out.push_str("0:INLET FLOW ");
                push_source_value(&mut out, &entry.value);
            }
            PREFIX_PRESSURE => {
                out.push_str("0:PRESSURE SOURCE ");
                push_source_value(&mut out, &entry.value);
            }
            prefix => return Err(LpnError::UnsupportedBoundary { id, prefix }),
        }
    }
    Ok(out)
}

/// A constant source is emitted as a two-point hold; a time-varying one
/// as its flattened series.
fn push_source_value(out: &mut String, value: &ElementValue) {
    match value {
        ElementValue::Scalar(v) => out.push_str(&format!("0.0 {} 1.0 {}\n", v, v)),
        ElementValue::TimeSeries(series) => {
            out.push_str(&series.flatten());
            out.push('\n');
        }
    }
}

/// Write all three solver input files into `dir`.
///
/// Every record set is formatted before the first file is touched, so a
/// formatting failure produces no output at all.
pub fn write_outputs(dir: &Path, tables: &SolverTables) -> Result<()> {
    let elements = format_element_types(tables);
    let bifurcations = format_bifurcations(tables);
    let boundaries = format_boundary_conditions(tables)?;

    fs::write(dir.join(ELEMENT_FILE), elements)?;
    info!("Wrote {}", dir.join(ELEMENT_FILE).display());
    fs::write(dir.join(BIFURCATION_FILE), bifurcations)?;
    info!("Wrote {}", dir.join(BIFURCATION_FILE).display());
    fs::write(dir.join(BOUNDARY_FILE), boundaries)?;
    info!("Wrote {}", dir.join(BOUNDARY_FILE).display());

    Ok(())
}

/// Dump the resolved tables as pretty JSON for inspection.
pub fn write_json(path: &Path, tables: &SolverTables) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, tables).map_err(std::io::Error::from)?;
    info!("Wrote {}", path.display());
    Ok(())
}
