//! Recording mock of [`DashboardApi`] for tests

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::DashboardApi;
use super::models::{ConfigTemplate, Network, Vlan, VlanPayload};

/// Canned inventory plus per-operation failure switches. Every call is
/// recorded as a flat string so tests can assert on order and arguments.
#[derive(Default)]
pub struct MockDashboard {
    pub networks: Vec<Network>,
    pub templates: Vec<ConfigTemplate>,
    /// network id → VLANs returned by `get_network_appliance_vlans`
    pub vlans: Mutex<HashMap<String, Vec<Vlan>>>,
    pub fail_unbind: bool,
    pub fail_bind: bool,
    pub fail_vlan_list: bool,
    pub fail_vlan_write: bool,
    pub calls: Mutex<Vec<String>>,
}

impl MockDashboard {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardApi for MockDashboard {
    async fn list_organization_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.record(format!("list_networks {org_id}"));
        Ok(self.networks.clone())
    }

    async fn list_organization_config_templates(
        &self,
        org_id: &str,
    ) -> Result<Vec<ConfigTemplate>> {
        self.record(format!("list_templates {org_id}"));
        Ok(self.templates.clone())
    }

    async fn get_network_appliance_vlans(&self, network_id: &str) -> Result<Vec<Vlan>> {
        self.record(format!("get_vlans {network_id}"));
        if self.fail_vlan_list {
            bail!("VLAN listing failed");
        }
        Ok(self
            .vlans
            .lock()
            .unwrap()
            .get(network_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan> {
        self.record(format!(
            "update_vlan {network_id} {vlan_id} {} {}",
            payload.subnet, payload.appliance_ip
        ));
        if self.fail_vlan_write {
            bail!("VLAN update failed");
        }
        Ok(echo(vlan_id, payload))
    }

    async fn create_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan> {
        self.record(format!(
            "create_vlan {network_id} {vlan_id} {} {}",
            payload.subnet, payload.appliance_ip
        ));
        if self.fail_vlan_write {
            bail!("VLAN creation failed");
        }
        Ok(echo(vlan_id, payload))
    }

    async fn bind_network(&self, network_id: &str, template_id: &str) -> Result<()> {
        self.record(format!("bind {network_id} {template_id}"));
        if self.fail_bind {
            bail!("bind failed");
        }
        Ok(())
    }

    async fn unbind_network(&self, network_id: &str) -> Result<()> {
        self.record(format!("unbind {network_id}"));
        if self.fail_unbind {
            bail!("unbind failed");
        }
        Ok(())
    }
}

fn echo(vlan_id: i64, payload: &VlanPayload) -> Vlan {
    Vlan {
        id: vlan_id,
        name: payload.name.clone(),
        subnet: payload.subnet.clone(),
        appliance_ip: payload.appliance_ip.clone(),
    }
}
