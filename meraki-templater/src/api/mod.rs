//! Meraki Dashboard API access
//!
//! The [`DashboardApi`] trait is the seam between the pipeline and the remote
//! platform: the inventory fetcher and the assignment executor only ever see
//! the trait, so tests can substitute a recording mock for the real
//! [`MerakiClient`].

pub mod client;
pub mod models;
#[cfg(test)]
pub mod testing;

pub use client::MerakiClient;
pub use models::{ConfigTemplate, Network, Vlan, VlanPayload};

use anyhow::Result;
use async_trait::async_trait;

/// The subset of the Dashboard API this tool consumes.
///
/// Read operations carry no side effects; `bind`/`unbind` and the VLAN write
/// operations mutate remote state. Every method maps to exactly one HTTP
/// request (network listing may issue several pages).
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List every network in the organization (all pages).
    async fn list_organization_networks(&self, org_id: &str) -> Result<Vec<Network>>;

    /// List every configuration template in the organization.
    async fn list_organization_config_templates(&self, org_id: &str)
    -> Result<Vec<ConfigTemplate>>;

    /// List the appliance VLANs configured on a network.
    async fn get_network_appliance_vlans(&self, network_id: &str) -> Result<Vec<Vlan>>;

    /// Update an existing appliance VLAN.
    async fn update_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan>;

    /// Create an appliance VLAN that does not exist yet.
    async fn create_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan>;

    /// Bind a network to a configuration template (no auto-binding of
    /// child networks).
    async fn bind_network(&self, network_id: &str, template_id: &str) -> Result<()>;

    /// Unbind a network from its current template, retaining no
    /// template-derived configuration.
    async fn unbind_network(&self, network_id: &str) -> Result<()>;
}
