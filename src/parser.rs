use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{LpnError, Result};
use crate::network::{Declaration, TimeSeries, INLET_KEYWORD};

lazy_static! {
    static ref ELEMENT_NAME_PATTERN: Regex = Regex::new(r"^[VRCI]\w*$").unwrap();
}

/// Parses the raw, whitespace-delimited LPN description into declarations.
///
/// Exact-duplicate lines collapse to one; the first occurrence wins and
/// survivors keep first-seen order.
pub struct LpnParser;

impl Default for LpnParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LpnParser {
    pub fn new() -> Self {
        LpnParser
    }

    pub fn parse_file(&self, filename: &str) -> Result<Vec<Declaration>> {
        let content = fs::read_to_string(filename).map_err(|e| LpnError::MissingInputFile {
            path: filename.to_string(),
            source: e,
        })?;
        self.parse_description(&content)
    }

    pub fn parse_description(&self, content: &str) -> Result<Vec<Declaration>> {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut declarations = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();

            // Skip blank lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if !seen.insert(tokens.clone()) {
                debug!("Skipping duplicate declaration at line {}", index + 1);
                continue;
            }

            declarations.push(self.parse_tokens(&tokens, index + 1, line)?);
        }

        Ok(declarations)
    }

    fn parse_tokens(&self, tokens: &[String], line_no: usize, line: &str) -> Result<Declaration> {
        let malformed = || LpnError::MalformedDeclaration {
            line_no,
            line: line.to_string(),
        };

        // Inlet designation: `start ground <name>`. The middle token is
        // accepted verbatim and discarded.
        if tokens[0] == INLET_KEYWORD {
            if tokens.len() != 3 || !ELEMENT_NAME_PATTERN.is_match(&tokens[2]) {
                return Err(malformed());
            }
            return Ok(Declaration::Inlet {
                name: tokens[2].clone(),
            });
        }

        match tokens.len() {
            2 => {
                if !ELEMENT_NAME_PATTERN.is_match(&tokens[0]) {
                    return Err(malformed());
                }
                Ok(Declaration::Boundary {
                    name: tokens[0].clone(),
                    value: tokens[1].clone(),
                })
            }
            4 => {
                if !ELEMENT_NAME_PATTERN.is_match(&tokens[0])
                    || !ELEMENT_NAME_PATTERN.is_match(&tokens[2])
                {
                    return Err(malformed());
                }
                Ok(Declaration::Edge {
                    a: tokens[0].clone(),
                    value_a: tokens[1].clone(),
                    b: tokens[2].clone(),
                    value_b: tokens[3].clone(),
                })
            }
            _ => Err(malformed()),
        }
    }
}

/// Read a time-series file: one `<time> <value>` pair per line.
pub fn read_time_series(path: &Path) -> Result<TimeSeries> {
    let content = fs::read_to_string(path).map_err(|e| LpnError::MissingInputFile {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_time_series(&content, &path.display().to_string())
}

pub fn parse_time_series(content: &str, file: &str) -> Result<TimeSeries> {
    let mut points = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(LpnError::MalformedTimeSeries {
                file: file.to_string(),
                line_no: index + 1,
                line: line.to_string(),
            });
        }
        points.push((tokens[0].to_string(), tokens[1].to_string()));
    }

    Ok(TimeSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declaration_shapes() {
        let parser = LpnParser::new();
        let declarations = parser
            .parse_description("start ground Iin\nR2 3\nR1 5 R2 10\n")
            .unwrap();

        assert_eq!(declarations.len(), 3);
        assert_eq!(
            declarations[0],
            Declaration::Inlet {
                name: "Iin".to_string()
            }
        );
        assert_eq!(
            declarations[1],
            Declaration::Boundary {
                name: "R2".to_string(),
                value: "3".to_string()
            }
        );
        assert_eq!(
            declarations[2],
            Declaration::Edge {
                a: "R1".to_string(),
                value_a: "5".to_string(),
                b: "R2".to_string(),
                value_b: "10".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_lines_collapse() {
        let parser = LpnParser::new();
        let once = parser.parse_description("R1 5 R2 10\n").unwrap();
        let twice = parser.parse_description("R1 5 R2 10\nR1 5 R2 10\n").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let parser = LpnParser::new();
        let declarations = parser
            .parse_description("# aortic outlet block\n\nR1 5 R2 10\n")
            .unwrap();
        assert_eq!(declarations.len(), 1);
    }

    #[test]
    fn test_malformed_token_counts_rejected() {
        let parser = LpnParser::new();
        assert!(parser.parse_description("R1\n").is_err());
        assert!(parser.parse_description("R1 5 R2 10 C1\n").is_err());
        // 3 tokens without the inlet keyword
        assert!(parser.parse_description("R1 5 R2\n").is_err());
        // inlet keyword with the wrong count
        assert!(parser.parse_description("start ground Iin extra\n").is_err());
    }

    #[test]
    fn test_invalid_element_names_rejected() {
        let parser = LpnParser::new();
        assert!(parser.parse_description("X1 5\n").is_err());
        assert!(parser.parse_description("R1 5 Q2 10\n").is_err());
        // time-varying inlet names are valid element names
        assert!(parser.parse_description("Iin_dt flow.txt R1 5\n").is_ok());
    }

    #[test]
    fn test_parse_time_series_pairs() {
        let series = parse_time_series("0.0 1.0\n0.1 1.2\n", "flow.txt").unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.flatten(), "0.0 1.0 0.1 1.2");

        assert!(parse_time_series("0.0 1.0 2.0\n", "flow.txt").is_err());
        assert!(parse_time_series("0.0\n", "flow.txt").is_err());
    }
}
