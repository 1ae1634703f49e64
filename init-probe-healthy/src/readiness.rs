//! Readiness evaluation for dependent clusters
//!
//! Turns the `ClusterLoadAssignment` records of one discovery response into a
//! [`ReadinessMap`] and decides whether a [`DependencySet`] is satisfied by it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use init_probe_proto::v2::endpoint::lb_endpoint::HostIdentifier;
use init_probe_proto::ClusterLoadAssignment;
use tracing::{debug, info};

/// Cluster name -> ready, rebuilt from each discovery response.
///
/// Only clusters present in the response have an entry.
pub type ReadinessMap = HashMap<String, bool>;

/// How a dependency is judged against a [`ReadinessMap`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SatisfactionPolicy {
    /// The dependency only needs an entry, whatever its value
    #[default]
    Presence,
    /// The dependency needs an entry whose value is `true`
    Ready,
}

/// The fixed set of cluster names that must be discovered before start-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet(BTreeSet<String>);

impl DependencySet {
    /// Parse a comma-separated list of cluster names.
    ///
    /// Names are trimmed and empty entries dropped, so `""` yields an empty set.
    #[must_use]
    pub fn parse(names: &str) -> Self {
        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Dependencies not yet satisfied by `readiness`, in name order
    #[must_use]
    pub fn missing<'a>(&'a self, readiness: &ReadinessMap, policy: SatisfactionPolicy) -> Vec<&'a str> {
        self.iter()
            .filter(|name| match policy {
                SatisfactionPolicy::Presence => !readiness.contains_key(*name),
                SatisfactionPolicy::Ready => readiness.get(*name) != Some(&true),
            })
            .collect()
    }

    /// Whether every dependency is satisfied by `readiness`
    #[must_use]
    pub fn is_satisfied_by(&self, readiness: &ReadinessMap, policy: SatisfactionPolicy) -> bool {
        self.missing(readiness, policy).is_empty()
    }
}

impl FromIterator<String> for DependencySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(","))
    }
}

/// Whether a cluster has a live endpoint.
///
/// Only the first endpoint of the first locality is consulted: it must be a
/// concrete endpoint carrying a health check config. Endpoints past that
/// position never change the verdict.
#[must_use]
pub fn cluster_ready(assignment: &ClusterLoadAssignment) -> bool {
    let Some(first) = assignment
        .endpoints
        .first()
        .and_then(|locality| locality.lb_endpoints.first())
    else {
        return false;
    };

    match &first.host_identifier {
        Some(HostIdentifier::Endpoint(endpoint)) => endpoint.health_check_config.is_some(),
        Some(HostIdentifier::EndpointName(name)) => {
            debug!(
                cluster = %assignment.cluster_name,
                endpoint_name = %name,
                "First endpoint is a named reference, treating cluster as not ready"
            );
            false
        }
        None => false,
    }
}

/// Build the readiness map for one discovery response
#[must_use]
pub fn evaluate(assignments: &[ClusterLoadAssignment]) -> ReadinessMap {
    let mut readiness = ReadinessMap::with_capacity(assignments.len());

    for assignment in assignments {
        let ready = cluster_ready(assignment);
        if ready {
            info!("depend service ({}) start complete", assignment.cluster_name);
        }
        readiness.insert(assignment.cluster_name.clone(), ready);
    }

    readiness
}
