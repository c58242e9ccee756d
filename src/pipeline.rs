use anyhow::{anyhow, Result};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assign::{assign_ids, SolverTables};
use crate::emit;
use crate::network::{ElementValue, Topology};
use crate::parser::LpnParser;
use crate::resolve::{resolve_boundaries, resolve_inlet};

/// Drives the full conversion: parse, resolve, re-key, emit.
pub struct Converter {
    topology: Option<Topology>,
    tables: Option<SolverTables>,
    config: ConverterConfig,
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Directory receiving the three solver input files.
    pub out_dir: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            out_dir: PathBuf::from("."),
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Converter {
            topology: None,
            tables: None,
            config: ConverterConfig::default(),
        }
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Converter {
            topology: None,
            tables: None,
            config,
        }
    }

    /// Load an LPN description file and resolve its topology.
    ///
    /// Time-series files referenced by a non-constant inlet are resolved
    /// relative to the description file's directory.
    pub fn load_description(&mut self, filename: &str) -> Result<()> {
        info!("Loading LPN description from: {}", filename);

        let parser = LpnParser::new();
        let declarations = parser.parse_file(filename)?;
        info!("Parsed {} declarations", declarations.len());

        let base_dir = Path::new(filename)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.load_declarations(declarations, &base_dir)
    }

    /// Load from already-parsed declarations.
    pub fn load_declarations(
        &mut self,
        declarations: Vec<crate::network::Declaration>,
        base_dir: &Path,
    ) -> Result<()> {
        let mut topology = Topology::from_declarations(declarations);
        info!(
            "Built topology: {} elements, {} tentative boundaries",
            topology.element_values.len(),
            topology.boundary.len()
        );

        resolve_boundaries(&mut topology);
        resolve_inlet(&mut topology, base_dir)?;

        self.topology = Some(topology);
        self.tables = None;
        Ok(())
    }

    /// Re-key all resolved structures from names to element IDs.
    pub fn assign_ids(&mut self) -> Result<()> {
        let topology = self
            .topology
            .as_ref()
            .ok_or_else(|| anyhow!("No description loaded"))?;

        let tables = assign_ids(topology)?;
        info!(
            "Assigned IDs: {} elements, {} bifurcation records, {} boundary conditions",
            tables.element_types.len(),
            tables.bifurcations.len(),
            tables.boundary_conditions.len()
        );

        self.tables = Some(tables);
        Ok(())
    }

    /// Write the three solver input files.
    pub fn write_outputs(&self) -> Result<()> {
        let tables = self
            .tables
            .as_ref()
            .ok_or_else(|| anyhow!("No IDs assigned; nothing to write"))?;
        emit::write_outputs(&self.config.out_dir, tables)?;
        Ok(())
    }

    /// Dump the resolved tables as JSON for inspection.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let tables = self
            .tables
            .as_ref()
            .ok_or_else(|| anyhow!("No IDs assigned; nothing to export"))?;
        emit::write_json(path, tables)?;
        Ok(())
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    pub fn tables(&self) -> Option<&SolverTables> {
        self.tables.as_ref()
    }

    /// Print a conversion summary
    pub fn print_summary(&self) {
        if let Some(tables) = &self.tables {
            println!("\n=== Conversion Summary ===");
            println!("Elements: {}", tables.element_types.len());

            let mut type_counts = HashMap::new();
            for entry in tables.element_types.values() {
                let type_name = match entry.prefix {
                    'R' => "Resistors",
                    'C' => "Capacitors",
                    'V' => "Pressure sources",
                    'I' => "Flow sources",
                    _ => "Other",
                };
                *type_counts.entry(type_name).or_insert(0) += 1;
            }
            for (type_name, count) in type_counts {
                println!("  {}: {}", type_name, count);
            }

            println!("Bifurcation records: {}", tables.bifurcations.len());
            println!("Boundary conditions: {}", tables.boundary_conditions.len());

            for (id, entry) in &tables.boundary_conditions {
                if let ElementValue::TimeSeries(series) = &entry.value {
                    println!(
                        "  inlet waveform ({}): {} points",
                        id,
                        series.points.len()
                    );
                    if let Some(span) = series.span() {
                        if let Some(mid) = series.sample(span / 2.0, span) {
                            println!("  mid-cycle value: {:.6}", mid);
                        }
                    }
                }
            }
        } else {
            println!("No conversion results available");
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
