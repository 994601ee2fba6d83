//! Owner-reference types.
//!
//! The wire shape is the Kubernetes `meta/v1` `OwnerReference`, taken from
//! `k8s-openapi` so that serialized references match what the API server
//! accepts: camelCase keys, `controller` / `blockOwnerDeletion` omitted when unset.

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

/// Build a plain owner reference with neither flag set.
pub fn owner_reference(
    api_version: impl Into<String>,
    kind: impl Into<String>,
    name: impl Into<String>,
    uid: impl Into<String>,
) -> OwnerReference {
    OwnerReference {
        api_version: api_version.into(),
        kind: kind.into(),
        name: name.into(),
        uid: uid.into(),
        controller: None,
        block_owner_deletion: None,
    }
}

/// Build the reference a controller sets on objects it manages:
/// `controller: true` and `blockOwnerDeletion: true`.
pub fn controller_reference(
    api_version: impl Into<String>,
    kind: impl Into<String>,
    name: impl Into<String>,
    uid: impl Into<String>,
) -> OwnerReference {
    OwnerReference {
        controller: Some(true),
        block_owner_deletion: Some(true),
        ..owner_reference(api_version, kind, name, uid)
    }
}

/// Names the first required field that is empty, if any.
pub fn missing_field(reference: &OwnerReference) -> Option<&'static str> {
    [
        ("apiVersion", &reference.api_version),
        ("kind", &reference.kind),
        ("name", &reference.name),
        ("uid", &reference.uid),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
}
