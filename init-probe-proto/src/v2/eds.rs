//! `envoy.api.v2.EndpointDiscoveryService` client
//!
//! Only the unary `FetchEndpoints` call is exposed; the streaming and delta
//! variants are not used by init-probe.

/// Client for the endpoint discovery service.
pub mod endpoint_discovery_service_client {
    #![allow(clippy::all)]

    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::codegen::{Body, Bytes, StdError};

    use super::super::{DiscoveryRequest, DiscoveryResponse};

    const SERVICE_NAME: &str = "envoy.api.v2.EndpointDiscoveryService";
    const FETCH_ENDPOINTS_PATH: &str = "/envoy.api.v2.EndpointDiscoveryService/FetchEndpoints";

    #[derive(Debug, Clone)]
    pub struct EndpointDiscoveryServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> EndpointDiscoveryServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        /// Fetch the current `ClusterLoadAssignment` set for the requesting node.
        pub async fn fetch_endpoints(
            &mut self,
            request: impl tonic::IntoRequest<DiscoveryRequest>,
        ) -> Result<tonic::Response<DiscoveryResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = PathAndQuery::from_static(FETCH_ENDPOINTS_PATH);
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(tonic::GrpcMethod::new(SERVICE_NAME, "FetchEndpoints"));
            self.inner.unary(req, path, codec).await
        }
    }
}
