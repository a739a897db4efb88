#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::module_name_repetitions)]

//! Converts Kubernetes [`Pod`](k8s_openapi::api::core::v1::Pod) resources into
//! the flat display model consumed by service mesh observability views.
//!
//! The conversion itself lives in [`models::pod`]. It never fails: malformed
//! annotations simply leave the related fields empty.

#[macro_use]
extern crate tracing;

#[macro_use]
pub mod internal_events;
pub mod app;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod models;
pub mod timezone;
pub mod trace;

pub use config::PodParserConfig;
pub use models::{ContainerInfo, Pod, Pods, Reference};
pub use timezone::TimeZone;
