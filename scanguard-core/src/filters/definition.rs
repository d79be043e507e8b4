//! Filter definitions and their CSV form.
//!
//! The on-disk header is `FilterCode,PythonQuery`; both names are part of
//! the file contract and are matched verbatim.

use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// One named boolean rule over table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    #[serde(rename = "FilterCode", default)]
    pub code: String,
    #[serde(rename = "PythonQuery", default)]
    pub expression: String,
}

impl FilterDefinition {
    pub fn new(code: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            expression: expression.into(),
        }
    }
}

/// Read definitions from a CSV file.
pub fn load_definitions(path: impl AsRef<Path>) -> Result<Vec<FilterDefinition>, FilterError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| FilterError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_definitions(content.as_bytes())
}

/// Read definitions from any CSV source. Rows keep file order.
pub fn read_definitions<R: Read>(reader: R) -> Result<Vec<FilterDefinition>, FilterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut definitions = Vec::new();
    for record in rdr.deserialize() {
        definitions.push(record?);
    }
    Ok(definitions)
}

/// Write definitions with the canonical header.
pub fn write_definitions(definitions: &[FilterDefinition]) -> Result<String, FilterError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for definition in definitions {
        wtr.serialize(definition)?;
    }
    let bytes = wtr.into_inner().map_err(|e| FilterError::Io {
        path: "<memory>".to_owned(),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
