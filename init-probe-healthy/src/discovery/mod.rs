//! Discovery control plane access

pub mod client;
pub mod parser;

pub use client::{EndpointDiscovery, XdsClient};
pub use parser::{decode_cluster_load_assignment, parse_cluster_load_assignments};
