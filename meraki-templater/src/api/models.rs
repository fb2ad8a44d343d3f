//! Wire models for the Meraki Dashboard API

use serde::{Deserialize, Serialize};

/// An organization network as returned by `GET /organizations/{orgId}/networks`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    /// Whether the network currently carries a configuration template binding
    #[serde(default)]
    pub is_bound_to_config_template: bool,
}

/// A configuration template as returned by
/// `GET /organizations/{orgId}/configTemplates`
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigTemplate {
    pub id: String,
    pub name: String,
}

/// An appliance VLAN as returned by `GET /networks/{networkId}/appliance/vlans`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    pub id: i64,
    pub name: String,
    pub subnet: String,
    pub appliance_ip: String,
}

/// Fields sent when creating or updating an appliance VLAN
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanPayload {
    pub name: String,
    pub subnet: String,
    pub appliance_ip: String,
}

impl VlanPayload {
    /// Build the write payload from a previously captured VLAN snapshot
    pub fn from_snapshot(vlan: &Vlan) -> Self {
        Self {
            name: vlan.name.clone(),
            subnet: vlan.subnet.clone(),
            appliance_ip: vlan.appliance_ip.clone(),
        }
    }
}
