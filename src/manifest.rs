//! Decoding of pod manifests as produced by `kubectl get -o json|yaml`.

use k8s_openapi::api::core::v1::Pod;
use serde::Deserialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::config::Format;

/// An error returned when a manifest can't be decoded into pods.
#[derive(Debug, Snafu)]
pub enum DecodeError {
    #[snafu(display("{format} is not a supported manifest format, expected json or yaml"))]
    UnsupportedFormat { format: Format },

    #[snafu(display("invalid YAML document: {source}"))]
    Yaml { source: serde_yaml::Error },

    #[snafu(display("invalid JSON document: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("manifest has no kind"))]
    MissingKind,

    #[snafu(display("unsupported manifest kind {kind:?}, expected Pod, PodList or List"))]
    UnsupportedKind { kind: String },

    #[snafu(display("{kind} has no items list"))]
    MissingItems { kind: String },

    #[snafu(display("invalid pod at index {index}: {source}"))]
    InvalidPod {
        source: serde_json::Error,
        index: usize,
    },
}

/// Decodes every pod found in `text`.
///
/// YAML input may hold several documents, their pods are returned in order.
pub fn decode(text: &str, format: Format) -> Result<Vec<Pod>, DecodeError> {
    let mut pods = Vec::new();
    match format {
        Format::Json => {
            let value: Value = serde_json::from_str(text).context(JsonSnafu)?;
            pods.extend(decode_value(value)?);
        }
        Format::Yaml => {
            for document in serde_yaml::Deserializer::from_str(text) {
                let value = Value::deserialize(document).context(YamlSnafu)?;
                if value.is_null() {
                    continue;
                }
                pods.extend(decode_value(value)?);
            }
        }
        Format::Toml => return UnsupportedFormatSnafu { format }.fail(),
    }
    Ok(pods)
}

fn decode_value(mut value: Value) -> Result<Vec<Pod>, DecodeError> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .context(MissingKindSnafu)?
        .to_owned();

    match kind.as_str() {
        "Pod" => {
            let pod = serde_json::from_value(value).context(InvalidPodSnafu { index: 0usize })?;
            Ok(vec![pod])
        }
        "PodList" | "List" => {
            let items = match value.get_mut("items").map(Value::take) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) => Vec::new(),
                _ => return MissingItemsSnafu { kind }.fail(),
            };
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| serde_json::from_value(item).context(InvalidPodSnafu { index }))
                .collect()
        }
        _ => UnsupportedKindSnafu { kind }.fail(),
    }
}
