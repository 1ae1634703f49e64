//! Decoding of discovery response resources

use init_probe_proto::{ClusterLoadAssignment, CLUSTER_LOAD_ASSIGNMENT_TYPE_URL};
use prost::Message;
use prost_types::Any;
use tracing::warn;

use crate::error::{Error, Result};

/// Decode a single `Any` resource into a `ClusterLoadAssignment`
pub fn decode_cluster_load_assignment(resource: &Any) -> Result<ClusterLoadAssignment> {
    if resource.type_url != CLUSTER_LOAD_ASSIGNMENT_TYPE_URL {
        return Err(Error::Decode(format!(
            "unexpected resource type '{}'",
            resource.type_url
        )));
    }

    ClusterLoadAssignment::decode(resource.value.as_slice())
        .map_err(|e| Error::Decode(format!("invalid ClusterLoadAssignment: {e}")))
}

/// Decode every `ClusterLoadAssignment` in a response.
///
/// Resources that cannot be decoded are logged and skipped; the clusters they
/// might have described get no readiness entry.
#[must_use]
pub fn parse_cluster_load_assignments(resources: &[Any]) -> Vec<ClusterLoadAssignment> {
    resources
        .iter()
        .filter_map(|resource| match decode_cluster_load_assignment(resource) {
            Ok(assignment) => Some(assignment),
            Err(e) => {
                warn!(type_url = %resource.type_url, "Skipping discovery resource: {}", e);
                None
            }
        })
        .collect()
}
