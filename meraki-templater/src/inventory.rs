//! Fetch the remote inventory the executor resolves names against
//!
//! Three lookup tables, populated once before any mutation: network name →
//! record, network id → pre-rebind VLAN-1 snapshot, template name → id. Any
//! listing failure here is fatal — nothing downstream can compensate for a
//! missing table or a missing snapshot.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};

use crate::api::{DashboardApi, Vlan};
use crate::excel::TemplateAssignment;
use crate::executor::MANAGEMENT_VLAN_ID;
use crate::report::Reporter;

/// What the executor needs to know about one spreadsheet-referenced network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
    /// Whether the network was bound to a template when inventoried
    pub is_bound: bool,
}

/// Lookup tables built once per run and read-only thereafter.
#[derive(Debug, Default)]
pub struct Inventory {
    /// network name → record, for networks named in the spreadsheet
    pub networks: HashMap<String, NetworkRecord>,
    /// network id → VLAN-1 configuration captured before any rebind
    pub vlan_snapshots: HashMap<String, Vlan>,
    /// template name → template id, for the whole organization
    pub templates: HashMap<String, String>,
}

pub async fn fetch_inventory(
    api: &dyn DashboardApi,
    org_id: &str,
    assignments: &[TemplateAssignment],
    reporter: &dyn Reporter,
) -> Result<Inventory> {
    let wanted: HashSet<&str> = assignments
        .iter()
        .map(|a| a.network_name.as_str())
        .collect();

    reporter.message("Retrieving network information from Meraki...");
    let all_networks = api
        .list_organization_networks(org_id)
        .await
        .context("Failed to list organization networks")?;

    let mut inventory = Inventory::default();
    let mut fetched: HashSet<String> = HashSet::new();

    for network in all_networks {
        if !wanted.contains(network.name.as_str()) {
            continue;
        }

        // One VLAN listing per unique network id.
        if fetched.insert(network.id.clone()) {
            reporter.message(&format!("Retrieving VLANs from {}...", network.name));
            let vlans = api
                .get_network_appliance_vlans(&network.id)
                .await
                .with_context(|| format!("Failed to list VLANs on network '{}'", network.name))?;
            if let Some(vlan) = vlans.into_iter().find(|v| v.id == MANAGEMENT_VLAN_ID) {
                reporter.message(&format!(
                    "Retrieved VLAN 1 configuration from {}",
                    network.name
                ));
                inventory.vlan_snapshots.insert(network.id.clone(), vlan);
            }
        }

        inventory.networks.insert(
            network.name.clone(),
            NetworkRecord {
                id: network.id,
                name: network.name,
                is_bound: network.is_bound_to_config_template,
            },
        );
    }

    let templates = api
        .list_organization_config_templates(org_id)
        .await
        .context("Failed to list organization config templates")?;
    for template in templates {
        inventory.templates.insert(template.name, template.id);
    }

    Ok(inventory)
}
