//! `envoy.api.v2.endpoint` package

use super::core::{Address, HealthStatus, Locality};

/// Upstream host identifier
#[derive(Clone, PartialEq, prost::Message)]
pub struct Endpoint {
    #[prost(message, optional, tag = "1")]
    pub address: Option<Address>,
    /// Present when the control plane configured active health checking for
    /// this host.
    #[prost(message, optional, tag = "2")]
    pub health_check_config: Option<endpoint::HealthCheckConfig>,
    #[prost(string, tag = "3")]
    pub hostname: String,
}

/// Nested message and enum types in `Endpoint`.
pub mod endpoint {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct HealthCheckConfig {
        #[prost(uint32, tag = "1")]
        pub port_value: u32,
        #[prost(string, tag = "2")]
        pub hostname: String,
    }
}

/// An Endpoint that Envoy can route traffic to
#[derive(Clone, PartialEq, prost::Message)]
pub struct LbEndpoint {
    #[prost(enumeration = "HealthStatus", tag = "2")]
    pub health_status: i32,
    #[prost(message, optional, tag = "4")]
    pub load_balancing_weight: Option<u32>,
    #[prost(oneof = "lb_endpoint::HostIdentifier", tags = "1, 5")]
    pub host_identifier: Option<lb_endpoint::HostIdentifier>,
}

/// Nested message and enum types in `LbEndpoint`.
pub mod lb_endpoint {
    /// Upstream host identifier or a named reference to one
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum HostIdentifier {
        #[prost(message, tag = "1")]
        Endpoint(super::Endpoint),
        /// Name of an endpoint resolved through the assignment's named endpoints
        #[prost(string, tag = "5")]
        EndpointName(String),
    }
}

/// A group of endpoints belonging to a Locality
#[derive(Clone, PartialEq, prost::Message)]
pub struct LocalityLbEndpoints {
    #[prost(message, optional, tag = "1")]
    pub locality: Option<Locality>,
    #[prost(message, repeated, tag = "2")]
    pub lb_endpoints: Vec<LbEndpoint>,
    #[prost(message, optional, tag = "3")]
    pub load_balancing_weight: Option<u32>,
    #[prost(uint32, tag = "5")]
    pub priority: u32,
}
