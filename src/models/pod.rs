//! Display model of a pod and its conversion from the Kubernetes resource.

use std::collections::BTreeMap;
use std::ops::Deref;

use chrono::SecondsFormat;
use k8s_openapi::api::core::v1::{Container, Pod as K8sPod};
use serde::{Deserialize, Serialize};

use super::annotations::{SerializedReference, SidecarStatus};
use crate::{
    config::PodParserConfig,
    internal_events::{PodAnnotationDecodeError, PodParsed, SidecarContainerNotFound},
};

/// A pod as shown to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub created_at: String,
    pub created_by: Reference,
    pub istio_containers: Vec<ContainerInfo>,
    pub istio_init_containers: Vec<ContainerInfo>,
}

/// The controller that created a pod.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reference {
    pub name: String,
    pub kind: String,
}

/// A sidecar container and the image it runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
}

impl Pod {
    /// Builds the display model of `pod`.
    ///
    /// Annotations that are missing or can't be decoded leave the related
    /// fields empty; the conversion itself never fails.
    pub fn parse(pod: &K8sPod, config: &PodParserConfig) -> Self {
        let metadata = &pod.metadata;
        let name = metadata.name.clone().unwrap_or_default();

        let created_at = metadata
            .creation_timestamp
            .as_ref()
            .map(|time| {
                config
                    .timezone
                    .to_fixed_offset(time.0)
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            })
            .unwrap_or_default();

        let created_by = annotation(
            pod,
            &name,
            &config.created_by_annotation,
            SerializedReference::decode,
        )
        .map(SerializedReference::into_reference)
        .unwrap_or_default();

        let sidecars = annotation(
            pod,
            &name,
            &config.sidecar_status_annotation,
            SidecarStatus::decode,
        )
        .unwrap_or_default();

        let (containers, init_containers) = pod
            .spec
            .as_ref()
            .map(|spec| {
                (
                    spec.containers.as_slice(),
                    spec.init_containers.as_deref().unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        let istio_containers = container_infos(&name, &sidecars.containers, containers, false);
        let istio_init_containers =
            container_infos(&name, &sidecars.init_containers, init_containers, true);

        emit!(PodParsed {
            pod_name: &name,
            sidecars: istio_containers.len(),
            init_sidecars: istio_init_containers.len(),
        });

        Self {
            labels: metadata.labels.clone().unwrap_or_default(),
            name,
            created_at,
            created_by,
            istio_containers,
            istio_init_containers,
        }
    }
}

impl From<&K8sPod> for Pod {
    fn from(pod: &K8sPod) -> Self {
        Self::parse(pod, &PodParserConfig::default())
    }
}

/// Looks up and decodes an annotation, treating decode failures as absent.
fn annotation<T>(
    pod: &K8sPod,
    pod_name: &str,
    key: &str,
    decode: impl FnOnce(&str) -> Result<T, serde_json::Error>,
) -> Option<T> {
    let value = pod.metadata.annotations.as_ref()?.get(key)?;
    match decode(value) {
        Ok(decoded) => Some(decoded),
        Err(error) => {
            emit!(PodAnnotationDecodeError {
                pod_name,
                annotation: key,
                error: &error,
            });
            None
        }
    }
}

/// One entry per sidecar name, in annotation order.
fn container_infos(
    pod_name: &str,
    names: &[String],
    containers: &[Container],
    init: bool,
) -> Vec<ContainerInfo> {
    names
        .iter()
        .map(|name| {
            let image = match containers.iter().find(|container| &container.name == name) {
                Some(container) => container.image.clone().unwrap_or_default(),
                None => {
                    emit!(SidecarContainerNotFound {
                        pod_name,
                        container: name,
                        init,
                    });
                    String::new()
                }
            };
            ContainerInfo {
                name: name.clone(),
                image,
            }
        })
        .collect()
}

/// Display models of a list of pods, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Pods(pub Vec<Pod>);

impl Pods {
    pub fn parse<'a>(
        pods: impl IntoIterator<Item = &'a K8sPod>,
        config: &PodParserConfig,
    ) -> Self {
        Self(pods.into_iter().map(|pod| Pod::parse(pod, config)).collect())
    }

    /// Whether any of the pods runs at least one sidecar container.
    pub fn has_istio_sidecar(&self) -> bool {
        self.0.iter().any(|pod| !pod.istio_containers.is_empty())
    }
}

impl Deref for Pods {
    type Target = [Pod];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Pods {
    type Item = Pod;
    type IntoIter = std::vec::IntoIter<Pod>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
