//! Error types for lpngen.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LpnError {
    #[error("malformed declaration at line {line_no}: '{line}'")]
    MalformedDeclaration { line_no: usize, line: String },

    #[error("malformed time series entry in '{file}' at line {line_no}: '{line}'")]
    MalformedTimeSeries {
        file: String,
        line_no: usize,
        line: String,
    },

    #[error("cannot read input file '{path}': {source}")]
    MissingInputFile {
        path: String,
        source: std::io::Error,
    },

    #[error("no usable inlet declaration found{}", .name.as_ref().map(|n| format!(" (inlet '{}' never declared as an element)", n)).unwrap_or_default())]
    MissingInlet { name: Option<String> },

    #[error("element '{0}' was never assigned an ID")]
    UnknownElementId(String),

    #[error("element {id} has unsupported boundary prefix '{prefix}'")]
    UnsupportedBoundary { id: usize, prefix: char },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LpnError>;
