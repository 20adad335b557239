//! YAML loading helpers shared by every catalogue component.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{PackError, PackResult};

/// Parse YAML text, tagging errors with `origin` (a path or resource name).
pub(crate) fn parse_yaml<T: DeserializeOwned>(text: &str, origin: &Path) -> PackResult<T> {
    serde_yaml::from_str(text).map_err(|source| PackError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Read and parse a YAML file.
pub(crate) fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> PackResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| PackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read catalogue file");
    parse_yaml(&text, path)
}
