//! Minimal admission review envelope
//!
//! Only the fields this webhook actually reads or writes are modeled; the
//! embedded object stays a raw [`serde_json::Value`] and is decoded lazily by
//! the mutation decider. The response side enforces the protocol invariants
//! through its constructors: the uid always echoes the request, `result` is
//! only present on denials, and `patch`/`patchType` are only present when a
//! mutation was produced.

use serde::{Deserialize, Serialize};

/// API version written on outbound envelopes
const ADMISSION_API_VERSION: &str = "admission.k8s.io/v1beta1";

/// Kind written on outbound envelopes
const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";

/// The envelope exchanged with the API server, wrapping either a request
/// (inbound) or a response (outbound)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionReview {
    /// Envelope apiVersion; tolerated absent on inbound reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Envelope kind; tolerated absent on inbound reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The admission request (inbound direction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    /// The admission response (outbound direction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

/// A single admission request as sent by the API server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionRequest {
    /// Correlation identifier, echoed verbatim in the response
    pub uid: String,

    /// Group/version/kind of the object under admission
    pub kind: GroupVersionKind,

    /// Group/version/resource of the object under admission
    pub resource: GroupVersionResource,

    /// Namespace the object is being admitted into
    pub namespace: String,

    /// Operation verb (CREATE, UPDATE, ...)
    pub operation: String,

    /// The serialized object being admitted; decoded lazily and only as far
    /// as the mutation needs
    pub object: serde_json::Value,
}

/// Group/version/kind triple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupVersionKind {
    /// API group ("" for the core group)
    pub group: String,
    /// API version
    pub version: String,
    /// Object kind
    pub kind: String,
}

/// Group/version/resource triple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupVersionResource {
    /// API group ("" for the core group)
    pub group: String,
    /// API version
    pub version: String,
    /// Resource name (plural)
    pub resource: String,
}

/// The admission decision returned to the API server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// Correlation identifier copied from the request
    pub uid: String,

    /// Whether the object is admitted
    pub allowed: bool,

    /// Denial reason; present iff `allowed` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,

    /// JSON-Patch to apply to the object, base64 on the wire;
    /// present iff `allowed` is true and a mutation was produced
    #[serde(with = "patch_bytes", skip_serializing_if = "Option::is_none")]
    pub patch: Option<Vec<u8>>,

    /// Patch format marker; accompanies `patch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,
}

/// Patch format enumeration; JSONPatch is the only value the protocol defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchType {
    /// RFC 6902 JSON-Patch
    #[serde(rename = "JSONPatch")]
    JsonPatch,
}

/// Human-readable denial status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Denial reason shown to the caller
    pub message: String,
}

impl AdmissionResponse {
    /// Admit the object unchanged, echoing the request uid
    pub fn allowed(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: true,
            ..Self::default()
        }
    }

    /// Reject the object with a reason, echoing the request uid
    pub fn denied(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: false,
            result: Some(Status {
                message: message.into(),
            }),
            ..Self::default()
        }
    }

    /// Attach a JSON-Patch to an allowed response
    pub fn with_patch(mut self, patch: Vec<u8>) -> Self {
        self.patch = Some(patch);
        self.patch_type = Some(PatchType::JsonPatch);
        self
    }

    /// Wrap the response in an outbound envelope
    pub fn into_review(self) -> AdmissionReview {
        AdmissionReview {
            api_version: Some(ADMISSION_API_VERSION.to_string()),
            kind: Some(ADMISSION_REVIEW_KIND.to_string()),
            request: None,
            response: Some(self),
        }
    }
}

/// Base64 wire encoding for the patch field, matching how the upstream
/// protocol marshals byte payloads
mod patch_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_str(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
