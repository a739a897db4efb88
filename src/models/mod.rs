//! Display models built from Kubernetes resources.

pub mod annotations;
pub mod pod;

pub use pod::{ContainerInfo, Pod, Pods, Reference};
