//! Configuration of the pod parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::timezone::TimeZone;

pub mod format;

pub use format::{DeserializeError, Format};

/// Annotation holding the serialized reference to the controller that created a pod.
pub const CREATED_BY_ANNOTATION: &str = "kubernetes.io/created-by";

/// Annotation the sidecar injector writes with the names of the containers it added.
pub const SIDECAR_STATUS_ANNOTATION: &str = "sidecar.istio.io/status";

/// Configuration for converting Kubernetes pods into the display model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct PodParserConfig {
    /// Annotation carrying the JSON-encoded owner reference.
    pub created_by_annotation: String,

    /// Annotation carrying the JSON-encoded sidecar injection status.
    pub sidecar_status_annotation: String,

    /// Timezone in which the creation timestamp is rendered.
    pub timezone: TimeZone,
}

impl Default for PodParserConfig {
    fn default() -> Self {
        Self {
            created_by_annotation: CREATED_BY_ANNOTATION.to_owned(),
            sidecar_status_annotation: SIDECAR_STATUS_ANNOTATION.to_owned(),
            timezone: TimeZone::default(),
        }
    }
}

impl PodParserConfig {
    /// Loads the configuration from a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = Format::from_path(path).map_err(|path| LoadError::UnknownFormat {
            path: path.to_owned(),
        })?;
        let content = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        let config = format::deserialize(&content, format).context(ParseSnafu { path })?;
        debug!(message = "Loaded pod parser configuration.", path = ?path, %format);
        Ok(config)
    }
}

/// An error returned when loading the configuration.
#[derive(Debug, Snafu)]
pub enum LoadError {
    #[snafu(display("could not read config file {}: {}", path.display(), source))]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display(
        "unknown config format for {}, expected a .toml, .yaml, .yml or .json file",
        path.display()
    ))]
    UnknownFormat { path: PathBuf },

    #[snafu(display("could not parse config file {}: {}", path.display(), source))]
    Parse {
        source: DeserializeError,
        path: PathBuf,
    },
}
