use log::{debug, info, warn};
use std::path::Path;

use crate::error::{LpnError, Result};
use crate::network::{prefix_of, ElementValue, Topology, TypedValue, DT_SUFFIX, GROUND_ID};
use crate::parser;

/// Demote boundary terminal nodes into conditions attached to their
/// interior neighbors.
///
/// For each interior element whose adjacency list touches a tentative
/// boundary node, the boundary entry is re-keyed to the interior element
/// and the terminal node is removed from the graph. When an interior
/// element has several boundary neighbors, the first one in its adjacency
/// list wins.
pub fn resolve_boundaries(topology: &mut Topology) {
    let mut folds: Vec<(String, String, TypedValue)> = Vec::new();
    for (key, neighbors) in &topology.connectivity {
        if let Some(terminal) = neighbors.iter().find(|n| topology.boundary.contains_key(*n)) {
            // Safe: contains_key above
            let entry = topology.boundary[terminal].clone();
            folds.push((key.clone(), terminal.clone(), entry));
        }
    }

    let mut removed = Vec::new();
    for (key, terminal, entry) in folds {
        debug!("Boundary '{}' folded into interior element '{}'", terminal, key);
        topology.boundary.shift_remove(&terminal);
        topology.boundary.insert(key.clone(), entry);
        if let Some(neighbors) = topology.connectivity.get_mut(&key) {
            if let Some(position) = neighbors.iter().position(|n| n == &terminal) {
                neighbors.remove(position);
            }
        }
        removed.push(terminal);
    }

    // Removal is deferred so every fold still sees the full value table.
    for terminal in removed {
        topology.element_values.shift_remove(&terminal);
    }
}

/// Remove the designated inlet node, record its boundary condition, and
/// ground the elements it feeds.
///
/// An inlet name ending in `_dt` declares a time-varying condition: its
/// value is a filename, resolved relative to `base_dir`, holding one
/// `<time> <value>` pair per line.
pub fn resolve_inlet(topology: &mut Topology, base_dir: &Path) -> Result<()> {
    let name = match &topology.inlet_name {
        Some(name) => name.clone(),
        None => {
            warn!("No inlet declaration found; skipping inlet resolution");
            return Ok(());
        }
    };

    let missing = || LpnError::MissingInlet {
        name: Some(name.clone()),
    };

    let entry = topology.element_values.get(&name).cloned().ok_or_else(missing)?;

    let value = if name.ends_with(DT_SUFFIX) {
        let file_name = entry.value.as_scalar().ok_or_else(missing)?;
        let series = parser::read_time_series(&base_dir.join(file_name))?;
        info!(
            "Loaded {} time points for inlet '{}' from '{}'",
            series.points.len(),
            name,
            file_name
        );
        ElementValue::TimeSeries(series)
    } else {
        entry.value
    };

    topology.boundary.insert(
        name.clone(),
        TypedValue {
            prefix: prefix_of(&name),
            value,
        },
    );

    let neighbors = topology.connectivity.get(&name).cloned().ok_or_else(missing)?;
    for element in &neighbors {
        debug!("Grounding inlet neighbor '{}'", element);
        topology.element_ids.insert(element.clone(), GROUND_ID);
    }

    topology.connectivity.shift_remove(&name);
    topology.element_values.shift_remove(&name);
    topology.element_ids.insert(name, GROUND_ID);

    Ok(())
}
