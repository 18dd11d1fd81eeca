//! JSON-Patch construction for the tolerations mutation
//!
//! The patch is always a single `replace` of the whole `/spec/tolerations`
//! array rather than per-element `add` operations; replacing wholesale
//! sidesteps path-index ambiguity in the target object.

use json_patch::{Patch, PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;

use crate::pod::Toleration;

/// Build the patch bytes replacing `/spec/tolerations` with `tolerations`.
///
/// Output is deterministic and byte-stable: entries keep their input order
/// and each entry serializes its fields in declaration order with unset
/// fields omitted. Toleration contents are not validated here.
pub fn tolerations_replace_patch(
    tolerations: &[Toleration],
) -> Result<Vec<u8>, serde_json::Error> {
    let ops = vec![PatchOperation::Replace(ReplaceOperation {
        path: PointerBuf::from_tokens(["spec", "tolerations"]),
        value: serde_json::to_value(tolerations)?,
    })];

    serde_json::to_vec(&Patch(ops))
}
