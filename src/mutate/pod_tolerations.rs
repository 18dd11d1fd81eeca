//! Pod toleration injection
//!
//! Appends the configured tolerations to the pod's existing list and returns
//! a single replace patch for `/spec/tolerations`. The append is
//! unconditional: no dedup or presence check is performed, so reapplying the
//! mutation to an already-mutated pod duplicates entries. That matches the
//! behavior this webhook replaces and callers rely on the API server only
//! admitting each pod once.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::admission::{AdmissionRequest, AdmissionResponse};
use crate::config::MutationConfig;
use crate::mutate::Mutate;
use crate::patch::tolerations_replace_patch;
use crate::pod::AdmittedObject;

/// Denial message for objects that are not pods
pub const UNSUPPORTED_KIND_MESSAGE: &str =
    "Invalid Kind for the request, only pods are supported for mutation";

/// Mutator that injects the configured tolerations into admitted pods
#[derive(Debug, Clone)]
pub struct PodTolerationMutator {
    config: MutationConfig,
}

impl PodTolerationMutator {
    /// Create a mutator enforcing the given configuration
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }
}

impl Mutate for PodTolerationMutator {
    fn decide(&self, request: &AdmissionRequest) -> AdmissionResponse {
        let uid = &request.uid;
        let object = &request.object;

        if object.is_null() {
            warn!(uid = %uid, "admission request carries no object");
            return AdmissionResponse::denied(uid, "admission request contains no object");
        }

        let pod = match serde_json::from_value::<AdmittedObject>(object.clone()) {
            Ok(AdmittedObject::Pod(pod)) => pod,
            Err(err) => {
                // A decodable object of the wrong kind (or with no kind at
                // all) gets the fixed eligibility message; anything else is
                // reported as a decode failure.
                return match object.get("kind") {
                    Some(Value::String(kind)) if kind != "Pod" => {
                        debug!(uid = %uid, kind = %kind, "object kind is not eligible for mutation");
                        AdmissionResponse::denied(uid, UNSUPPORTED_KIND_MESSAGE)
                    }
                    None => {
                        debug!(uid = %uid, "object has no kind field");
                        AdmissionResponse::denied(uid, UNSUPPORTED_KIND_MESSAGE)
                    }
                    _ => {
                        warn!(uid = %uid, error = %err, "failed to decode admitted object");
                        AdmissionResponse::denied(
                            uid,
                            format!("failed to decode admitted object: {err}"),
                        )
                    }
                };
            }
        };

        let mut desired = pod.spec.tolerations;
        desired.extend(self.config.tolerations.iter().cloned());

        match tolerations_replace_patch(&desired) {
            Ok(patch) => {
                info!(
                    uid = %uid,
                    namespace = %request.namespace,
                    tolerations = desired.len(),
                    "injecting tolerations into pod"
                );
                AdmissionResponse::allowed(uid).with_patch(patch)
            }
            Err(err) => {
                warn!(uid = %uid, error = %err, "failed to build tolerations patch");
                AdmissionResponse::denied(uid, format!("failed to build tolerations patch: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::PatchType;
    use crate::pod::{TaintEffect, Toleration, TolerationOperator};

    const UID: &str = "70a7fc1a-a84b-4e9d-9e6e-500f45a4697b";

    fn request_with_object(object: serde_json::Value) -> AdmissionRequest {
        AdmissionRequest {
            uid: UID.to_string(),
            object,
            ..AdmissionRequest::default()
        }
    }

    fn default_mutator() -> PodTolerationMutator {
        PodTolerationMutator::new(MutationConfig::default())
    }

    #[test]
    fn valid_pod_without_tolerations_gets_configured_toleration() {
        let request = request_with_object(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": "fake-pod", "namespace": "fake-ns"},
            "spec": {"containers": [{"name": "fake-container"}]}
        }));

        let response = default_mutator().decide(&request);

        assert_eq!(response.uid, UID);
        assert!(response.allowed);
        assert!(response.result.is_none());
        assert_eq!(response.patch_type, Some(PatchType::JsonPatch));
        assert_eq!(
            response.patch.as_deref(),
            Some(
                br#"[{"op":"replace","path":"/spec/tolerations","value":[{"key":"cloud.google.com/alloydb-host","operator":"Exists","effect":"NoSchedule"}]}]"#
                    .as_slice()
            )
        );
    }

    #[test]
    fn existing_tolerations_are_preserved_and_appended_to() {
        let request = request_with_object(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": "test-pod"},
            "spec": {
                "tolerations": [{"key": "key1", "operator": "Equal", "value": "value1"}],
                "containers": [{"name": "test-container"}]
            }
        }));

        let response = default_mutator().decide(&request);

        assert!(response.allowed);
        assert_eq!(
            response.patch.as_deref(),
            Some(
                br#"[{"op":"replace","path":"/spec/tolerations","value":[{"key":"key1","operator":"Equal","value":"value1"},{"key":"cloud.google.com/alloydb-host","operator":"Exists","effect":"NoSchedule"}]}]"#
                    .as_slice()
            )
        );
    }

    #[test]
    fn reapplying_the_mutation_duplicates_the_toleration() {
        // Append is deliberately unconditional: a pod that already carries
        // the configured toleration gets a second copy.
        let request = request_with_object(serde_json::json!({
            "kind": "Pod",
            "spec": {
                "tolerations": [
                    {"key": "cloud.google.com/alloydb-host", "operator": "Exists", "effect": "NoSchedule"}
                ],
                "containers": [{"name": "c"}]
            }
        }));

        let response = default_mutator().decide(&request);
        assert!(response.allowed);

        let patch: serde_json::Value =
            serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        let value = patch[0]["value"].as_array().unwrap();
        assert_eq!(value.len(), 2, "reapplication must duplicate, not dedup");
        assert_eq!(value[0], value[1]);
    }

    #[test]
    fn existing_order_comes_first_then_configured_order() {
        let config = MutationConfig {
            tolerations: vec![
                Toleration {
                    key: "cfg-a".to_string(),
                    operator: TolerationOperator::Exists,
                    value: None,
                    effect: None,
                },
                Toleration {
                    key: "cfg-b".to_string(),
                    operator: TolerationOperator::Exists,
                    value: None,
                    effect: Some(TaintEffect::NoExecute),
                },
            ],
        };
        let mutator = PodTolerationMutator::new(config);

        let request = request_with_object(serde_json::json!({
            "kind": "Pod",
            "spec": {
                "tolerations": [
                    {"key": "pod-1", "operator": "Exists"},
                    {"key": "pod-2", "operator": "Equal", "value": "x"}
                ]
            }
        }));

        let response = mutator.decide(&request);
        let patch: serde_json::Value =
            serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        let keys: Vec<&str> = patch[0]["value"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["pod-1", "pod-2", "cfg-a", "cfg-b"]);
    }

    #[test]
    fn invalid_kind_is_denied_with_fixed_message() {
        let request = request_with_object(serde_json::json!({
            "apiVersion": "v1",
            "kind": "InvalidKind",
            "metadata": {"name": "test-pod"},
            "spec": {"containers": [{"name": "test-container"}]}
        }));

        let response = default_mutator().decide(&request);

        assert_eq!(response.uid, UID);
        assert!(!response.allowed);
        assert_eq!(
            response.result.as_ref().unwrap().message,
            UNSUPPORTED_KIND_MESSAGE
        );
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
    }

    #[test]
    fn missing_kind_is_denied_with_fixed_message() {
        let request = request_with_object(serde_json::json!({
            "metadata": {"name": "anonymous"},
            "spec": {}
        }));

        let response = default_mutator().decide(&request);
        assert!(!response.allowed);
        assert_eq!(
            response.result.as_ref().unwrap().message,
            UNSUPPORTED_KIND_MESSAGE
        );
    }

    #[test]
    fn malformed_pod_is_denied_with_decode_error() {
        // kind says Pod but the tolerations list is not a list
        let request = request_with_object(serde_json::json!({
            "kind": "Pod",
            "spec": {"tolerations": "not-a-list"}
        }));

        let response = default_mutator().decide(&request);
        assert!(!response.allowed);
        let message = &response.result.as_ref().unwrap().message;
        assert!(
            message.contains("failed to decode admitted object"),
            "unexpected message: {message}"
        );
        assert!(response.patch.is_none());
    }

    #[test]
    fn missing_object_is_denied() {
        let request = AdmissionRequest {
            uid: UID.to_string(),
            ..AdmissionRequest::default()
        };

        let response = default_mutator().decide(&request);
        assert_eq!(response.uid, UID);
        assert!(!response.allowed);
        assert!(response
            .result
            .as_ref()
            .unwrap()
            .message
            .contains("no object"));
    }

    #[test]
    fn empty_configuration_still_patches_eligible_pods() {
        let mutator = PodTolerationMutator::new(MutationConfig { tolerations: vec![] });
        let request = request_with_object(serde_json::json!({
            "kind": "Pod",
            "spec": {"containers": [{"name": "c"}]}
        }));

        let response = mutator.decide(&request);
        assert!(response.allowed);
        assert_eq!(
            response.patch.as_deref(),
            Some(br#"[{"op":"replace","path":"/spec/tolerations","value":[]}]"#.as_slice())
        );
    }
}
