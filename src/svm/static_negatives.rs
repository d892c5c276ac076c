//! Loader for fixed negative training examples.

use nalgebra::DVector;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};

/// Read negative feature vectors from a whitespace-delimited text file.
///
/// Each non-empty line holds one example. Every value is multiplied by `scale`.
/// Lines starting with `#` are ignored.
///
/// # Arguments
/// * `file_path` - Path to the example file
/// * `max_count` - Maximum number of examples to read (`None` reads all)
/// * `scale` - Factor applied to every value
pub fn load_static_negatives<P: AsRef<Path>>(
    file_path: P,
    max_count: Option<usize>,
    scale: f64,
) -> Result<Vec<DVector<f64>>> {
    let file = File::open(&file_path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("failed to open negatives file: {}", e),
        ))
    })?;
    parse_static_negatives(BufReader::new(file), max_count, scale)
}

fn parse_static_negatives<R: BufRead>(
    reader: R,
    max_count: Option<usize>,
    scale: f64,
) -> Result<Vec<DVector<f64>>> {
    let limit = max_count.unwrap_or(usize::MAX);
    let mut examples: Vec<DVector<f64>> = Vec::new();

    for (index, line_result) in reader.lines().enumerate() {
        if examples.len() >= limit {
            break;
        }
        let line = line_result.map_err(Error::IoError)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map(|v| v * scale).map_err(|_| {
                    Error::ParseError(format!("line {}: invalid value '{}'", index + 1, token))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = examples.first() {
            if first.len() != values.len() {
                return Err(Error::ParseError(format!(
                    "line {}: expected {} values, got {}",
                    index + 1,
                    first.len(),
                    values.len()
                )));
            }
        }
        examples.push(DVector::from_vec(values));
    }

    tracing::debug!(count = examples.len(), "loaded static negatives");
    Ok(examples)
}
