//! Endpoint discovery client
//!
//! [`EndpointDiscovery`] is the seam between the endpoint check and the
//! transport. [`XdsClient`] is the production implementation: a plaintext
//! tonic channel to the control plane issuing one unary `FetchEndpoints` call
//! per request.

use async_trait::async_trait;
use init_probe_proto::{DiscoveryRequest, DiscoveryResponse, EndpointDiscoveryServiceClient};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use crate::config::XdsConfig;
use crate::error::{Error, Result};

/// Fetches endpoint assignments from a discovery control plane
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EndpointDiscovery: Send + Sync {
    async fn fetch_endpoints(&self, request: DiscoveryRequest) -> Result<DiscoveryResponse>;
}

/// gRPC client for the xDS endpoint discovery service
#[derive(Debug, Clone)]
pub struct XdsClient {
    client: EndpointDiscoveryServiceClient<Channel>,
    target: String,
}

impl XdsClient {
    /// Build a client for the configured discovery service.
    ///
    /// The channel connects lazily on first use, so this only fails when the
    /// address cannot form a valid endpoint URI. Must be called from within a
    /// tokio runtime.
    pub fn connect_lazy(config: &XdsConfig) -> Result<Self> {
        let target = config.endpoint_uri();

        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|e| Error::Connection(format!("Invalid endpoint URI for {target}: {e}")))?;
        let channel = endpoint.connect_lazy();

        debug!(target = %target, "Created discovery service channel");

        Ok(Self {
            client: EndpointDiscoveryServiceClient::new(channel),
            target,
        })
    }

    /// Discovery service URI this client talks to
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl EndpointDiscovery for XdsClient {
    async fn fetch_endpoints(&self, request: DiscoveryRequest) -> Result<DiscoveryResponse> {
        // Channels are cheap to clone and share the underlying connection
        let mut client = self.client.clone();
        let response = client.fetch_endpoints(request).await?;
        Ok(response.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_lazy_valid_address() {
        let client = XdsClient::connect_lazy(&XdsConfig::default()).unwrap();
        assert_eq!(client.target(), "http://172.30.42.1:6101");
    }

    #[tokio::test]
    async fn test_connect_lazy_invalid_address() {
        let config = XdsConfig {
            host: "not a host".to_string(),
            port: 6101,
        };

        let result = XdsClient::connect_lazy(&config);
        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn test_fetch_against_unreachable_server_is_rpc_error() {
        // Port 1 on loopback refuses connections
        let config = XdsConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
        };
        let client = XdsClient::connect_lazy(&config).unwrap();

        let result = client.fetch_endpoints(DiscoveryRequest::default()).await;
        assert!(matches!(result, Err(Error::Rpc(_))));
    }
}
