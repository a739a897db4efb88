//! Support for loading data from multiple formats.

#![deny(missing_docs, missing_debug_implementations)]

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de;
use snafu::{ResultExt, Snafu};

/// The format used to represent configuration or manifest data.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Format {
    /// TOML format is used.
    #[default]
    Toml,
    /// JSON format is used.
    Json,
    /// YAML format is used.
    Yaml,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Format::Toml),
            "yaml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(format!("Invalid format: {s}")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let format = match self {
            Format::Toml => "toml",
            Format::Json => "json",
            Format::Yaml => "yaml",
        };
        write!(f, "{format}")
    }
}

impl Format {
    /// Obtain the format from the file path using extension as a hint.
    pub fn from_path<T: AsRef<Path>>(path: T) -> Result<Self, T> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(path),
        }
    }
}

/// An error returned when content can't be parsed in the requested format.
#[derive(Debug, Snafu)]
pub enum DeserializeError {
    /// Invalid TOML.
    #[snafu(display("invalid TOML: {source}"))]
    Toml {
        /// The underlying error.
        source: toml::de::Error,
    },
    /// Invalid YAML.
    #[snafu(display("invalid YAML: {source}"))]
    Yaml {
        /// The underlying error.
        source: serde_yaml::Error,
    },
    /// Invalid JSON.
    #[snafu(display("invalid JSON: {source}"))]
    Json {
        /// The underlying error.
        source: serde_json::Error,
    },
}

/// Parse the string represented in the specified format.
pub fn deserialize<T>(content: &str, format: Format) -> Result<T, DeserializeError>
where
    T: de::DeserializeOwned,
{
    match format {
        Format::Toml => toml::from_str(content).context(TomlSnafu),
        Format::Yaml => serde_yaml::from_str(content).context(YamlSnafu),
        Format::Json => serde_json::from_str(content).context(JsonSnafu),
    }
}
