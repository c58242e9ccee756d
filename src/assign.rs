use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::error::{LpnError, Result};
use crate::network::{Topology, TypedValue, PREFIX_RESISTOR};

/// The three ID-keyed structures consumed by the emitters.
#[derive(Debug, Clone, Serialize)]
pub struct SolverTables {
    /// Adjacency per element ID, each undirected edge recorded once.
    pub bifurcations: IndexMap<usize, Vec<usize>>,
    pub boundary_conditions: IndexMap<usize, TypedValue>,
    pub element_types: IndexMap<usize, TypedValue>,
}

/// Re-key connectivity, boundary, and element values from names to IDs.
///
/// Every surviving name must have an ID by now; a miss means an earlier
/// stage broke the books, not bad input.
pub fn assign_ids(topology: &Topology) -> Result<SolverTables> {
    let id_of = |name: &str| -> Result<usize> {
        topology
            .element_ids
            .get(name)
            .copied()
            .ok_or_else(|| LpnError::UnknownElementId(name.to_string()))
    };

    let mut bifurcations: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for (key, neighbors) in &topology.connectivity {
        let ids = neighbors
            .iter()
            .map(|n| id_of(n))
            .collect::<Result<Vec<_>>>()?;
        bifurcations.insert(id_of(key)?, ids);
    }

    let mut boundary_conditions = IndexMap::new();
    for (key, entry) in &topology.boundary {
        let id = id_of(key)?;
        // A boundary resistor has no further interior neighbors
        if key.starts_with(PREFIX_RESISTOR) {
            bifurcations.insert(id, Vec::new());
        }
        boundary_conditions.insert(id, entry.clone());
    }

    let mut element_types = IndexMap::new();
    for (key, entry) in &topology.element_values {
        element_types.insert(id_of(key)?, entry.clone());
    }

    collapse_symmetric_edges(&mut bifurcations);

    Ok(SolverTables {
        bifurcations,
        boundary_conditions,
        element_types,
    })
}

/// An edge `a -> b` and its mirror `b -> a` are the same undirected edge.
/// Keep the copy owned by the first-encountered endpoint and drop the
/// mirror.
fn collapse_symmetric_edges(bifurcations: &mut IndexMap<usize, Vec<usize>>) {
    let keys: Vec<usize> = bifurcations.keys().copied().collect();
    for key in keys {
        let neighbors = bifurcations.get(&key).cloned().unwrap_or_default();
        for neighbor in neighbors {
            if neighbor == key {
                continue;
            }
            let mirrored = bifurcations
                .get(&neighbor)
                .map_or(false, |list| list.contains(&key));
            if mirrored {
                debug!("Collapsing mirrored edge {} -> {}", neighbor, key);
                if let Some(list) = bifurcations.get_mut(&neighbor) {
                    list.retain(|&id| id != key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ElementValue, Topology};
    use crate::parser::LpnParser;
    use crate::resolve::{resolve_boundaries, resolve_inlet};
    use std::path::Path;

    fn tables_from(content: &str) -> SolverTables {
        let declarations = LpnParser::new().parse_description(content).unwrap();
        let mut topology = Topology::from_declarations(declarations);
        resolve_boundaries(&mut topology);
        resolve_inlet(&mut topology, Path::new(".")).unwrap();
        assign_ids(&topology).unwrap()
    }

    #[test]
    fn test_resistor_outlet_scenario() {
        let tables = tables_from("R1 5 R2 10\nR2 3\n");

        assert_eq!(tables.element_types[&1], TypedValue::scalar('R', "5"));
        assert_eq!(tables.boundary_conditions[&1], TypedValue::scalar('R', "3"));
        // the resistor-boundary rule forces an empty adjacency
        assert_eq!(tables.bifurcations[&1], Vec::<usize>::new());
    }

    #[test]
    fn test_constant_inlet_scenario() {
        let tables = tables_from("start ground Iin\nIin 7 R1 5\n");

        assert_eq!(tables.boundary_conditions[&0], TypedValue::scalar('I', "7"));
        assert_eq!(tables.element_types[&0], TypedValue::scalar('R', "5"));
    }

    #[test]
    fn test_ids_are_injective_off_ground() {
        let tables =
            tables_from("start ground Iin\nIin 7 R1 5\nR1 5 C1 2\nC1 2 R2 6\nR2 6 C1 2\nR3 3\nR2 6 R3 3\n");

        let mut seen = std::collections::HashSet::new();
        for (&id, _) in &tables.element_types {
            if id != 0 {
                assert!(seen.insert(id), "duplicate non-ground ID {}", id);
            }
        }
    }

    #[test]
    fn test_symmetric_edges_collapse_to_one() {
        let tables = tables_from("start ground Iin\nIin 7 R1 5\nR1 5 C1 2\nC1 2 R1 5\n");

        for (&a, neighbors) in &tables.bifurcations {
            for &b in neighbors {
                let mirrored = tables
                    .bifurcations
                    .get(&b)
                    .map_or(false, |list| list.contains(&a));
                assert!(!mirrored, "edge {}-{} recorded at both endpoints", a, b);
            }
        }
        // the edge itself survives exactly once
        let total: usize = tables
            .bifurcations
            .iter()
            .map(|(&a, l)| l.iter().filter(|&&b| a != 0 || b != 0).count())
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_unassigned_name_is_fatal() {
        // C1 only ever appears as an edge target, so it never gets an ID
        let declarations = LpnParser::new()
            .parse_description("R1 5 C1 2\n")
            .unwrap();
        let topology = Topology::from_declarations(declarations);
        let err = assign_ids(&topology).unwrap_err();
        assert!(matches!(err, LpnError::UnknownElementId(_)));
    }

    #[test]
    fn test_time_series_survives_rekeying() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("flow.txt"), "0.0 1.0\n0.1 1.2\n").unwrap();

        let declarations = LpnParser::new()
            .parse_description("start ground Iin_dt\nIin_dt flow.txt R1 5\n")
            .unwrap();
        let mut topology = Topology::from_declarations(declarations);
        resolve_boundaries(&mut topology);
        resolve_inlet(&mut topology, dir.path()).unwrap();
        let tables = assign_ids(&topology).unwrap();

        match &tables.boundary_conditions[&0].value {
            ElementValue::TimeSeries(series) => assert_eq!(series.points.len(), 2),
            other => panic!("expected time series, got {:?}", other),
        }
    }
}
