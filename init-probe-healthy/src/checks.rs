//! Readiness checks run by the controller each cycle
//!
//! Listener and cluster discovery precede endpoint discovery in a full xDS
//! exchange. Their checks here are placeholders that always pass; only
//! [`EndpointCheck`] verifies anything.

use async_trait::async_trait;
use init_probe_proto::v2::core::Node;
use init_probe_proto::DiscoveryRequest;
use tracing::{error, info};

use crate::discovery::{parse_cluster_load_assignments, EndpointDiscovery};
use crate::readiness::{self, DependencySet, SatisfactionPolicy};

/// One step of the readiness gate
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this step currently passes
    async fn check(&self) -> bool;
}

/// Listener discovery placeholder, always passes
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerCheck;

#[async_trait]
impl ReadinessCheck for ListenerCheck {
    fn name(&self) -> &'static str {
        "listener"
    }

    async fn check(&self) -> bool {
        true
    }
}

/// Cluster discovery placeholder, always passes
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterCheck;

#[async_trait]
impl ReadinessCheck for ClusterCheck {
    fn name(&self) -> &'static str {
        "cluster"
    }

    async fn check(&self) -> bool {
        true
    }
}

/// Passes once every dependent cluster shows up in endpoint discovery
pub struct EndpointCheck<D> {
    discovery: D,
    cluster_id: String,
    depend_services: DependencySet,
    policy: SatisfactionPolicy,
}

impl<D: EndpointDiscovery> EndpointCheck<D> {
    #[must_use]
    pub const fn new(
        discovery: D,
        cluster_id: String,
        depend_services: DependencySet,
        policy: SatisfactionPolicy,
    ) -> Self {
        Self {
            discovery,
            cluster_id,
            depend_services,
            policy,
        }
    }

    /// Request identifying this node by its cluster id
    fn discovery_request(&self) -> DiscoveryRequest {
        DiscoveryRequest {
            node: Some(Node {
                id: self.cluster_id.clone(),
                cluster: self.cluster_id.clone(),
            }),
            ..Default::default()
        }
    }
}

#[async_trait]
impl<D: EndpointDiscovery> ReadinessCheck for EndpointCheck<D> {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    async fn check(&self) -> bool {
        let response = match self.discovery.fetch_endpoints(self.discovery_request()).await {
            Ok(response) => response,
            Err(e) => {
                error!("discover depend services endpoint failure {}", e);
                return false;
            }
        };

        let assignments = parse_cluster_load_assignments(&response.resources);
        let ready_clusters = readiness::evaluate(&assignments);

        let missing = self.depend_services.missing(&ready_clusters, self.policy);
        if !missing.is_empty() {
            info!(missing = ?missing, "Waiting for dependent services");
            return false;
        }

        info!("all dependent services have been started.");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::client::MockEndpointDiscovery;
    use crate::error::Error;
    use init_probe_proto::v2::endpoint::{
        endpoint::HealthCheckConfig, lb_endpoint::HostIdentifier, Endpoint, LbEndpoint,
        LocalityLbEndpoints,
    };
    use init_probe_proto::{ClusterLoadAssignment, DiscoveryResponse};

    fn response(clusters: &[(&str, bool)]) -> DiscoveryResponse {
        let resources = clusters
            .iter()
            .map(|(name, healthy)| {
                let lb_endpoint = LbEndpoint {
                    host_identifier: Some(HostIdentifier::Endpoint(Endpoint {
                        health_check_config: healthy.then(HealthCheckConfig::default),
                        ..Default::default()
                    })),
                    ..Default::default()
                };
                ClusterLoadAssignment {
                    cluster_name: (*name).to_string(),
                    endpoints: vec![LocalityLbEndpoints {
                        lb_endpoints: vec![lb_endpoint],
                        ..Default::default()
                    }],
                }
                .to_any()
            })
            .collect();

        DiscoveryResponse {
            resources,
            ..Default::default()
        }
    }

    fn endpoint_check(
        discovery: MockEndpointDiscovery,
        deps: &str,
        policy: SatisfactionPolicy,
    ) -> EndpointCheck<MockEndpointDiscovery> {
        EndpointCheck::new(discovery, "t1_p1_web".to_string(), DependencySet::parse(deps), policy)
    }

    #[tokio::test]
    async fn test_placeholders_pass() {
        assert!(ListenerCheck.check().await);
        assert!(ClusterCheck.check().await);
    }

    #[tokio::test]
    async fn test_request_carries_cluster_id() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .withf(|req| {
                req.node.as_ref().is_some_and(|n| n.id == "t1_p1_web" && n.cluster == "t1_p1_web")
            })
            .times(1)
            .returning(|_| Ok(DiscoveryResponse::default()));

        let check = endpoint_check(discovery, "", SatisfactionPolicy::Presence);
        assert!(check.check().await);
    }

    #[tokio::test]
    async fn test_missing_dependency_fails() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .returning(|_| Ok(response(&[("svcA", true)])));

        let check = endpoint_check(discovery, "svcA,svcB", SatisfactionPolicy::Presence);
        assert!(!check.check().await);
    }

    #[tokio::test]
    async fn test_present_but_unhealthy_dependency_passes_by_default() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .returning(|_| Ok(response(&[("svcA", true), ("svcB", false)])));

        let check = endpoint_check(discovery, "svcA,svcB", SatisfactionPolicy::Presence);
        assert!(check.check().await);
    }

    #[tokio::test]
    async fn test_ready_policy_rejects_unhealthy_dependency() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .returning(|_| Ok(response(&[("svcA", true), ("svcB", false)])));

        let check = endpoint_check(discovery, "svcA,svcB", SatisfactionPolicy::Ready);
        assert!(!check.check().await);
    }

    #[tokio::test]
    async fn test_rpc_error_fails_check() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .returning(|_| Err(Error::Rpc("Unavailable: connection refused".to_string())));

        let check = endpoint_check(discovery, "svcA", SatisfactionPolicy::Presence);
        assert!(!check.check().await);
    }

    #[tokio::test]
    async fn test_empty_dependencies_pass_regardless_of_response() {
        let mut discovery = MockEndpointDiscovery::new();
        discovery
            .expect_fetch_endpoints()
            .returning(|_| Ok(response(&[("other", false)])));

        let check = endpoint_check(discovery, "", SatisfactionPolicy::Presence);
        assert!(check.check().await);
    }
}
