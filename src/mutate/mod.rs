//! Mutation deciders
//!
//! Each supported admission use-case is one variant of [`Mutator`], selected
//! by the router when the state is built. The dispatcher only sees the
//! [`Mutate`] capability, so adding a use-case means adding a variant, not
//! touching the dispatcher.

mod pod_tolerations;

pub use pod_tolerations::{PodTolerationMutator, UNSUPPORTED_KIND_MESSAGE};

use crate::admission::{AdmissionRequest, AdmissionResponse};
use crate::config::MutationConfig;

/// Capability to turn an admission request into an admission decision.
///
/// Implementations are pure with respect to process state: they read their
/// own configuration and the request, nothing else, so concurrent
/// invocations never interfere.
pub trait Mutate {
    /// Decide whether to admit the request and with which mutation
    fn decide(&self, request: &AdmissionRequest) -> AdmissionResponse;
}

/// The closed set of mutation use-cases this webhook supports
#[derive(Debug, Clone)]
pub enum Mutator {
    /// Inject configured tolerations into pods
    PodTolerations(PodTolerationMutator),
}

impl Mutator {
    /// Build the pod-tolerations mutator from a configuration
    pub fn pod_tolerations(config: MutationConfig) -> Self {
        Self::PodTolerations(PodTolerationMutator::new(config))
    }
}

impl Mutate for Mutator {
    fn decide(&self, request: &AdmissionRequest) -> AdmissionResponse {
        match self {
            Self::PodTolerations(mutator) => mutator.decide(request),
        }
    }
}
