//! Dependent service health gate
//!
//! Blocks an application's start-up until every cluster it depends on has
//! been published by the xDS endpoint discovery service.

pub mod checks;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod readiness;

pub use checks::{ClusterCheck, EndpointCheck, ListenerCheck, ReadinessCheck};
pub use config::{LoggingConfig, ProbeConfig, XdsConfig};
pub use controller::{DependServiceHealthController, CHECK_INTERVAL};
pub use discovery::{EndpointDiscovery, XdsClient};
pub use error::{Error, Result};
pub use readiness::{DependencySet, ReadinessMap, SatisfactionPolicy};
