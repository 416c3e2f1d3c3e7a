//! Fact loading.
//!
//! Manifest decoding happens in an external extractor; this CLI consumes
//! the extractor's output as a JSON fact bundle. "File does not exist" and
//! "file exists but cannot be decoded" stay distinct all the way up, and a
//! bundle that fails to decode never yields partial facts.

use std::io::ErrorKind;
use std::path::PathBuf;
use tenken_policy::{FactError, FactSource, ManifestFacts};

pub struct JsonFactSource {
    path: PathBuf,
}

impl JsonFactSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FactSource for JsonFactSource {
    fn load(&self) -> Result<ManifestFacts, FactError> {
        let data = std::fs::read_to_string(&self.path).map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                FactError::MissingInput(self.path.clone())
            } else {
                FactError::MalformedInput(error.to_string())
            }
        })?;
        serde_json::from_str(&data).map_err(|error| FactError::MalformedInput(error.to_string()))
    }
}
