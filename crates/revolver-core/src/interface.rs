//! Loading interface curves written by facet extraction tools.
//!
//! The expected format is whitespace-delimited text with one point per row
//! and at least two numeric columns.
//! Every two consecutive points form one line segment of the interface.
//! Extraction tools typically separate segments with blank lines;
//! these are skipped, as are rows starting with `#`.
//! Columns past the second are ignored.
//!
//! ```text
//! 0.5 0
//! 0.5 0.25
//!
//! 0.5 0.25
//! 0.625 0.5
//! ```

use std::path::{Path, PathBuf};

use crate::Vec2;

/// Error in loading an interface curve.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The file couldn't be read.
    #[error("Failed to read interface file {path:?}")]
    Io {
        /// Path of the file we tried to read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A row in the data couldn't be interpreted as a point.
    #[error("Invalid interface data on line {line}: {reason}")]
    Malformed {
        /// 1-based line number of the offending row.
        line: usize,
        /// Description of what was wrong with it.
        reason: String,
    },
}

/// Load the points of an interface curve from a file.
///
/// See the [module-level docs][self] for the format.
pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<Vec2>, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_points(&text)?;
    log::debug!("Loaded {} interface points from {path:?}", points.len());
    Ok(points)
}

/// Parse the points of an interface curve from text.
///
/// ```
/// # use revolver_core::{parse_points, Vec2};
/// let points = parse_points("1 0\n1 1\n\n1 1 0.5\n2 1\n").unwrap();
/// assert_eq!(points[2], Vec2::new(1., 1.));
/// assert_eq!(points.len(), 4);
/// ```
pub fn parse_points(text: &str) -> Result<Vec<Vec2>, LoadError> {
    let mut points = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = |reason: String| LoadError::Malformed {
            line: line_idx + 1,
            reason,
        };

        let mut columns = line.split_whitespace();
        let mut coord = || -> Result<f64, LoadError> {
            let col = columns
                .next()
                .ok_or_else(|| malformed("expected at least 2 columns".to_string()))?;
            col.parse::<f64>()
                .map_err(|_| malformed(format!("{col:?} is not a number")))
        };
        let x = coord()?;
        let y = coord()?;
        points.push(Vec2::new(x, y));
    }

    Ok(points)
}
