use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rmr_core::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Values a key may buffer before they are reduced in place.
    pub buffer_size: usize,
    pub partitions: usize,
    pub fail_on_malformed: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            buffer_size: 100,
            partitions: 1,
            fail_on_malformed: false,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.buffer_size == 0 {
            return Err(CoreError::InvalidConfig("buffer_size must be at least 1".into()));
        }
        if self.partitions == 0 {
            return Err(CoreError::InvalidConfig("partitions must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"partitions": 4}}"#).unwrap();

        let cfg = RuntimeConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.partitions, 4);
        assert_eq!(cfg.buffer_size, 100);
        assert!(!cfg.fail_on_malformed);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let cfg = RuntimeConfig {
            buffer_size: 0,
            ..RuntimeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));

        let cfg = RuntimeConfig {
            partitions: 0,
            ..RuntimeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RuntimeConfig::from_json_file("/nonexistent/rmr.json").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
