//! Minimal view of the object under admission
//!
//! The admitted object is decoded as a tagged union keyed by `kind`, exposing
//! only the fields the mutation needs. This keeps the webhook decoupled from
//! the full pod schema: everything else in the object passes through
//! untouched because the patch targets a single path.

use serde::{Deserialize, Serialize};

/// The admitted object, keyed by its `kind` field.
///
/// Pods are the only kind this webhook mutates; any other kind fails to
/// decode into a variant and is denied by the decider.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum AdmittedObject {
    /// A pod, the single supported kind
    Pod(PodView),
}

/// The slice of a pod the mutation reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodView {
    /// Pod spec, reduced to the fields of interest
    pub spec: PodSpecView,
}

/// The slice of a pod spec the mutation reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSpecView {
    /// Tolerations already present on the pod, in order
    pub tolerations: Vec<Toleration>,
    /// Containers declared by the pod
    pub containers: Vec<ContainerView>,
}

/// A container, reduced to its name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerView {
    /// Container name
    pub name: String,
}

/// A node toleration.
///
/// Field order is load-bearing: the patch builder's output must be
/// byte-stable, and serialization follows declaration order
/// (key, operator, value, effect). Unset optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toleration {
    /// Taint key the toleration matches
    pub key: String,

    /// How the key is matched against taints
    pub operator: TolerationOperator,

    /// Taint value; only meaningful with [`TolerationOperator::Equal`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Taint effect the toleration applies to; unset tolerates all effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<TaintEffect>,
}

/// Toleration matching operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TolerationOperator {
    /// Match any taint with the key, regardless of value
    Exists,
    /// Match taints whose value equals the toleration's value
    Equal,
}

/// Node taint effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaintEffect {
    /// New pods without a matching toleration are not scheduled
    NoSchedule,
    /// Scheduler avoids the node but may still place pods there
    PreferNoSchedule,
    /// Running pods without a matching toleration are evicted
    NoExecute,
}
