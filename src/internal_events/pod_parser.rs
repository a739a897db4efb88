use metrics::counter;

use super::InternalEvent;

const ANNOTATION_DECODE_FAILED: &str = "annotation_decode_failed";

#[derive(Debug)]
pub struct PodAnnotationDecodeError<'a> {
    pub pod_name: &'a str,
    pub annotation: &'a str,
    pub error: &'a serde_json::Error,
}

impl InternalEvent for PodAnnotationDecodeError<'_> {
    fn emit(self) {
        warn!(
            message = "Ignoring pod annotation that could not be decoded.",
            pod_name = %self.pod_name,
            annotation = %self.annotation,
            error = %self.error,
            error_code = ANNOTATION_DECODE_FAILED,
        );
        counter!(
            "pod_annotation_decode_errors_total",
            "annotation" => self.annotation.to_owned(),
        )
        .increment(1);
    }
}

#[derive(Debug)]
pub struct SidecarContainerNotFound<'a> {
    pub pod_name: &'a str,
    pub container: &'a str,
    pub init: bool,
}

impl InternalEvent for SidecarContainerNotFound<'_> {
    fn emit(self) {
        let container_type = if self.init {
            "init_container"
        } else {
            "container"
        };
        debug!(
            message = "Sidecar listed in the status annotation is missing from the pod spec.",
            pod_name = %self.pod_name,
            container = %self.container,
            container_type,
        );
        counter!(
            "sidecar_containers_not_found_total",
            "container_type" => container_type,
        )
        .increment(1);
    }
}

#[derive(Debug)]
pub struct PodParsed<'a> {
    pub pod_name: &'a str,
    pub sidecars: usize,
    pub init_sidecars: usize,
}

impl InternalEvent for PodParsed<'_> {
    fn emit(self) {
        trace!(
            message = "Pod parsed.",
            pod_name = %self.pod_name,
            sidecars = self.sidecars,
            init_sidecars = self.init_sidecars,
        );
        counter!("pods_parsed_total").increment(1);
    }
}
