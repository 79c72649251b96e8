//! Shared validation report (§3 loader supplement, §7): every loader
//! stage returns one of these rather than failing the whole batch on
//! the first bad record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub record_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub missing_references: usize,
    pub errors: Vec<ValidationError>,
}

impl LoadReport {
    pub fn reject(&mut self, record_id: impl Into<String>, message: impl Into<String>) {
        self.invalid += 1;
        self.errors.push(ValidationError { record_id: record_id.into(), message: message.into() });
    }

    pub fn accept(&mut self) {
        self.valid += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }
}

pub fn read_json_array(path: &std::path::Path) -> crate::error::LoaderResult<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path).map_err(|source| crate::error::LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| crate::error::LoaderError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(crate::error::LoaderError::NotAnArray { path: path.display().to_string() }),
    }
}
