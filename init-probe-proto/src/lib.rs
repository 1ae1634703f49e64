//! init-probe Protocol Definitions
//!
//! This crate carries the subset of the Envoy xDS v2 API that init-probe
//! speaks: the discovery request/response envelope, `ClusterLoadAssignment`
//! and its endpoint tree, and a unary `EndpointDiscoveryService` client.
//!
//! Field numbers follow the upstream `envoy/api/v2` protos so responses from a
//! real control plane decode; fields init-probe never reads are left out and
//! are skipped by prost as unknown fields.

pub mod v2;

pub use v2::eds::endpoint_discovery_service_client::EndpointDiscoveryServiceClient;
pub use v2::{
    ClusterLoadAssignment, DiscoveryRequest, DiscoveryResponse, CLUSTER_LOAD_ASSIGNMENT_TYPE_URL,
};
