//! Diagram loaders
//!
//! Reads diagrams from JSON, either in the runtime form ([`DiagramData`]) or
//! in the compact persisted form (see [`compact`]).

pub mod compact;

pub use compact::{load_compact, CompactDiagram};

use crate::ir::DiagramData;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Diagram loader result
pub type LoadResult<T> = Result<T, LoadError>;

/// Diagram loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

pub(crate) fn read(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path).map_err(|source| LoadError::FileNotFound {
        path: path.display().to_string(),
        source,
    })
}

/// Load a diagram in the runtime JSON form
pub fn load_diagram<P: AsRef<Path>>(path: P) -> LoadResult<DiagramData> {
    let contents = read(path.as_ref())?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load every `.json` diagram in a directory, sorted by file name
///
/// Files that fail to load are skipped with a warning.
pub fn load_diagrams<P: AsRef<Path>>(dir: P, compact: bool) -> LoadResult<Vec<(String, DiagramData)>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LoadError::InvalidFormat(format!("{} is not a directory", dir.display())));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| LoadError::FileNotFound {
        path: dir.display().to_string(),
        source,
    })? {
        let path = entry
            .map_err(|source| LoadError::FileNotFound { path: dir.display().to_string(), source })?
            .path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut diagrams = Vec::new();
    for path in paths {
        let loaded = if compact { load_compact(&path) } else { load_diagram(&path) };
        match loaded {
            Ok(data) => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
                diagrams.push((name, data));
            }
            Err(err) => warn!(path = %path.display(), %err, "skipping diagram"),
        }
    }

    Ok(diagrams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_form_parses() {
        let json = r#"{
            "points": [{"id": "A", "x": 0, "y": 0}, {"id": "B", "x": 1, "y": 0}, {"id": "C", "x": 0, "y": 1}],
            "edges": [{"points": ["A", "B"]}],
            "angles": [{"id": "a", "pointId": "A", "sidepoints": ["B", "C"], "value": null, "target": true}]
        }"#;
        let data: DiagramData = serde_json::from_str(json).unwrap();

        assert_eq!(data.points.len(), 3);
        assert!(data.has_targets());
        assert!(data.lines.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_diagram("/nonexistent/diagram.json").unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}
