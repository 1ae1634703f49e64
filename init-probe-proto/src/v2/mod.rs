//! `envoy.api.v2` package

pub mod core;
pub mod eds;
pub mod endpoint;

/// Type URL carried by `Any` resources holding a [`ClusterLoadAssignment`]
pub const CLUSTER_LOAD_ASSIGNMENT_TYPE_URL: &str =
    "type.googleapis.com/envoy.api.v2.ClusterLoadAssignment";

/// A request sent by a node to a discovery service
#[derive(Clone, PartialEq, prost::Message)]
pub struct DiscoveryRequest {
    #[prost(string, tag = "1")]
    pub version_info: String,
    /// The node making the request
    #[prost(message, optional, tag = "2")]
    pub node: Option<core::Node>,
    #[prost(string, repeated, tag = "3")]
    pub resource_names: Vec<String>,
    #[prost(string, tag = "4")]
    pub type_url: String,
    #[prost(string, tag = "5")]
    pub response_nonce: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DiscoveryResponse {
    #[prost(string, tag = "1")]
    pub version_info: String,
    /// Opaque resources, decoded according to their type URL
    #[prost(message, repeated, tag = "2")]
    pub resources: Vec<prost_types::Any>,
    #[prost(bool, tag = "3")]
    pub canary: bool,
    #[prost(string, tag = "4")]
    pub type_url: String,
    #[prost(string, tag = "5")]
    pub nonce: String,
}

/// Endpoints of one upstream cluster, grouped by locality
#[derive(Clone, PartialEq, prost::Message)]
pub struct ClusterLoadAssignment {
    #[prost(string, tag = "1")]
    pub cluster_name: String,
    #[prost(message, repeated, tag = "2")]
    pub endpoints: Vec<endpoint::LocalityLbEndpoints>,
}

impl ClusterLoadAssignment {
    /// Wrap this assignment in an `Any` with the canonical type URL
    #[must_use]
    pub fn to_any(&self) -> prost_types::Any {
        use prost::Message;

        prost_types::Any {
            type_url: CLUSTER_LOAD_ASSIGNMENT_TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }
}
