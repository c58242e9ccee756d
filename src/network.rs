use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Element name prefixes. The first character of an element name is
/// load-bearing: it selects the boundary-condition semantics the
/// downstream solver applies.
pub const PREFIX_PRESSURE: char = 'V';
pub const PREFIX_RESISTOR: char = 'R';
pub const PREFIX_CAPACITOR: char = 'C';
pub const PREFIX_FLOW: char = 'I';

/// First token of the declaration that designates the network inlet.
pub const INLET_KEYWORD: &str = "start";

/// Inlet names carrying this suffix take their value from a time-series file.
pub const DT_SUFFIX: &str = "_dt";

/// Reserved ID for the reference node. The inlet and every element
/// directly adjacent to it are mapped here.
pub const GROUND_ID: usize = 0;

pub fn prefix_of(name: &str) -> char {
    name.chars().next().unwrap_or('?')
}

/// An ordered sequence of (time, value) pairs read from an auxiliary file.
/// Both fields are kept as the original text tokens so emitting them is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<(String, String)>,
}

impl TimeSeries {
    pub fn new(points: Vec<(String, String)>) -> Self {
        TimeSeries { points }
    }

    /// Flatten to the solver's wire form: `t0 v0 t1 v1 ...`
    pub fn flatten(&self) -> String {
        self.points
            .iter()
            .flat_map(|(t, v)| [t.as_str(), v.as_str()])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Time of the last point, if it parses as a number.
    pub fn span(&self) -> Option<f64> {
        self.points.last()?.0.parse().ok()
    }

    /// Value at `time`, wrapping by `period` and linearly interpolating
    /// between the two closest defined points. Returns `None` if the
    /// series is empty, the period is non-positive, or a token does not
    /// parse as a number.
    pub fn sample(&self, time: f64, period: f64) -> Option<f64> {
        if period <= 0.0 {
            return None;
        }
        let mut points = Vec::with_capacity(self.points.len());
        for (t, v) in &self.points {
            points.push((t.parse::<f64>().ok()?, v.parse::<f64>().ok()?));
        }
        let first = *points.first()?;
        let last = *points.last()?;
        let t = time.rem_euclid(period);
        if t <= first.0 {
            return Some(first.1);
        }
        if t >= last.0 {
            return Some(last.1);
        }
        for w in points.windows(2) {
            let (t0, v0) = w[0];
            let (t1, v1) = w[1];
            if t < t0 || t > t1 {
                continue;
            }
            if (t1 - t).abs() <= 1e-8 {
                return Some(v1);
            }
            if (t - t0).abs() <= 1e-8 || t1 <= t0 {
                return Some(v0);
            }
            return Some(v0 + (t - t0) * (v1 - v0) / (t1 - t0));
        }
        Some(last.1)
    }
}

/// Value attached to an element: a scalar numeric string, or (for
/// non-constant inlets) a time series. Consumers branch on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementValue {
    Scalar(String),
    TimeSeries(TimeSeries),
}

impl ElementValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ElementValue::Scalar(s) => Some(s),
            ElementValue::TimeSeries(_) => None,
        }
    }

    /// Text form used by the emitters: the scalar verbatim, or the
    /// flattened series.
    pub fn tokens(&self) -> String {
        match self {
            ElementValue::Scalar(s) => s.clone(),
            ElementValue::TimeSeries(ts) => ts.flatten(),
        }
    }
}

/// A `(prefix, value)` record, used both for element type/value entries
/// and for boundary conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub prefix: char,
    pub value: ElementValue,
}

impl TypedValue {
    pub fn scalar(prefix: char, value: impl Into<String>) -> Self {
        TypedValue {
            prefix,
            value: ElementValue::Scalar(value.into()),
        }
    }
}

/// One parsed declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `start ground <name>`: designates the network inlet.
    Inlet { name: String },
    /// `<name> <value>`: a tentative boundary terminal.
    Boundary { name: String, value: String },
    /// `<a> <value_a> <b> <value_b>`: an interior edge.
    Edge {
        a: String,
        value_a: String,
        b: String,
        value_b: String,
    },
}

/// Name-keyed network state threaded through the resolution stages.
///
/// All maps are insertion-ordered, so every tie-break that the resolution
/// stages make (first boundary neighbor wins, first endpoint keeps a
/// symmetric edge) is deterministic: first inserted wins.
#[derive(Debug, Clone)]
pub struct Topology {
    /// IDs assigned in first-seen order starting at 1; 0 is ground.
    pub element_ids: IndexMap<String, usize>,
    pub element_values: IndexMap<String, TypedValue>,
    /// Adjacency as declared, `a -> [b, ...]`.
    pub connectivity: IndexMap<String, Vec<String>>,
    /// Keyed by boundary node name until resolution re-keys entries to
    /// the interior element touching them.
    pub boundary: IndexMap<String, TypedValue>,
    pub inlet_name: Option<String>,
    next_id: usize,
}

impl Topology {
    pub fn new() -> Self {
        Topology {
            element_ids: IndexMap::new(),
            element_values: IndexMap::new(),
            connectivity: IndexMap::new(),
            boundary: IndexMap::new(),
            inlet_name: None,
            next_id: 1,
        }
    }

    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        let mut topology = Topology::new();
        for declaration in declarations {
            topology.add_declaration(declaration);
        }
        topology
    }

    pub fn add_declaration(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Inlet { name } => {
                if let Some(previous) = &self.inlet_name {
                    warn!("Inlet '{}' overrides earlier inlet '{}'", name, previous);
                }
                debug!("Found inlet: {}", name);
                self.inlet_name = Some(name);
            }
            Declaration::Boundary { name, value } => {
                // No ID yet; resolution decides whether this node survives.
                let entry = TypedValue::scalar(prefix_of(&name), value);
                self.boundary.insert(name, entry);
            }
            Declaration::Edge {
                a,
                value_a,
                b,
                value_b,
            } => {
                if !self.element_ids.contains_key(&a) {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!("Assigned ID {} to element '{}'", id, a);
                    self.element_ids.insert(a.clone(), id);
                }
                // Repeated declarations for the same name overwrite
                // earlier values: last write wins.
                self.element_values
                    .insert(a.clone(), TypedValue::scalar(prefix_of(&a), value_a));
                self.element_values
                    .insert(b.clone(), TypedValue::scalar(prefix_of(&b), value_b));
                self.connectivity.entry(a).or_default().push(b);
            }
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}
