use std::ffi::OsString;

use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::readiness::{DependencySet, SatisfactionPolicy};

/// Default discovery service host
pub const DEFAULT_XDS_HOST: &str = "172.30.42.1";

/// Default discovery service port
pub const DEFAULT_XDS_PORT: u16 = 6101;

/// Environment variables read by [`ProbeConfig::from_env`]
const RECOGNIZED_VARS: &[&str] = &[
    "ENVOY_NODE_ID",
    "TENANT_ID",
    "PLUGIN_ID",
    "SERVICE_NAME",
    "XDS_HOST_IP",
    "XDS_HOST_PORT",
    "DEPEND_SERVICE_CLUSTER_NAMES",
    "PROBE_MAX_ATTEMPTS",
    "PROBE_REQUIRE_READY",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

/// Raw values as found in the environment
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvSettings {
    envoy_node_id: Option<String>,
    tenant_id: Option<String>,
    plugin_id: Option<String>,
    service_name: Option<String>,
    xds_host_ip: Option<String>,
    xds_host_port: Option<String>,
    depend_service_cluster_names: Option<String>,
    probe_max_attempts: Option<String>,
    probe_require_ready: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
}

/// Discovery service address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdsConfig {
    pub host: String,
    pub port: u16,
}

impl Default for XdsConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_XDS_HOST.to_string(),
            port: DEFAULT_XDS_PORT,
        }
    }
}

impl XdsConfig {
    /// Plaintext gRPC endpoint URI
    #[must_use]
    pub fn endpoint_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Probe configuration, resolved once at start-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Identity sent as both node id and node cluster
    pub cluster_id: String,
    pub xds: XdsConfig,
    pub depend_services: DependencySet,
    /// Cap on polling cycles; `None` polls until the dependencies are up
    pub max_attempts: Option<u32>,
    pub satisfaction: SatisfactionPolicy,
    pub logging: LoggingConfig,
}

impl ProbeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(recognized_vars(std::env::vars_os())?)
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        let settings: EnvSettings = ConfigBuilder::builder()
            .add_source(Environment::default().source(Some(source)))
            .build()?
            .try_deserialize()?;

        Self::resolve(settings)
    }

    fn resolve(settings: EnvSettings) -> Result<Self> {
        let cluster_id = non_empty(settings.envoy_node_id).unwrap_or_else(|| {
            format!(
                "{}_{}_{}",
                settings.tenant_id.unwrap_or_default(),
                settings.plugin_id.unwrap_or_default(),
                settings.service_name.unwrap_or_default()
            )
        });

        let port = match non_empty(settings.xds_host_port) {
            Some(port) => port.trim().parse::<u16>().map_err(|e| {
                Error::Configuration(format!("Invalid XDS_HOST_PORT '{port}': {e}"))
            })?,
            None => DEFAULT_XDS_PORT,
        };
        let xds = XdsConfig {
            host: non_empty(settings.xds_host_ip).unwrap_or_else(|| DEFAULT_XDS_HOST.to_string()),
            port,
        };

        let max_attempts = match non_empty(settings.probe_max_attempts) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) | Err(_) => {
                    return Err(Error::Configuration(format!(
                        "PROBE_MAX_ATTEMPTS must be a positive integer, got '{raw}'"
                    )));
                }
                Ok(n) => Some(n),
            },
            None => None,
        };

        let satisfaction = match non_empty(settings.probe_require_ready)
            .map(|raw| raw.trim().to_lowercase())
            .as_deref()
        {
            None | Some("false" | "0" | "no" | "off") => SatisfactionPolicy::Presence,
            Some("true" | "1" | "yes" | "on") => SatisfactionPolicy::Ready,
            Some(other) => {
                return Err(Error::Configuration(format!(
                    "PROBE_REQUIRE_READY must be a boolean, got '{other}'"
                )));
            }
        };

        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            level: non_empty(settings.log_level).unwrap_or(defaults.level),
            format: non_empty(settings.log_format).unwrap_or(defaults.format),
        };

        Ok(Self {
            cluster_id,
            xds,
            depend_services: DependencySet::parse(
                settings.depend_service_cluster_names.as_deref().unwrap_or_default(),
            ),
            max_attempts,
            satisfaction,
            logging,
        })
    }
}

/// Keep the probe's own variables out of a raw environment.
///
/// Unrelated variables are dropped untouched, whatever their encoding; a
/// recognized variable holding non-UTF-8 bytes is a configuration error.
fn recognized_vars<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.to_str().filter(|k| RECOGNIZED_VARS.contains(k))?.to_string();
            Some((key, value))
        })
        .map(|(key, value)| {
            let value = value.into_string().map_err(|raw| {
                Error::Configuration(format!("{key} is not valid UTF-8: {raw:?}"))
            })?;
            Ok((key, value))
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
