pub mod assign;
pub mod cli;
pub mod emit;
pub mod error;
pub mod network;
pub mod parser;
pub mod pipeline;
pub mod resolve;

// Re-export commonly used types
pub use assign::{assign_ids, SolverTables};
pub use error::{LpnError, Result};
pub use network::{Declaration, ElementValue, TimeSeries, Topology, TypedValue};
pub use parser::LpnParser;
pub use pipeline::{Converter, ConverterConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
