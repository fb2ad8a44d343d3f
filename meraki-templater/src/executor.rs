//! Apply template assignments network by network
//!
//! Each network is processed independently; a failure on one network never
//! stops the run. Remote calls are attempted exactly once, with no retries
//! and no rollback — the results workbook is the record of what needs manual
//! remediation.

use log::{error, warn};

use crate::api::{DashboardApi, VlanPayload};
use crate::excel::TemplateAssignment;
use crate::inventory::Inventory;
use crate::report::Reporter;

/// Recorded in a result field when the corresponding step did not take effect
pub const NOT_APPLIED: &str = "n/a";

/// The VLAN whose subnet and gateway must survive a template rebind
pub const MANAGEMENT_VLAN_ID: i64 = 1;

/// Outcome of processing one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    pub network: String,
    /// The bound template name, or [`NOT_APPLIED`] if binding failed
    pub new_template: String,
    /// The restored appliance IP, or [`NOT_APPLIED`] if the VLAN write failed
    /// or no VLAN 1 was captured for this network
    pub ip: String,
    /// The restored subnet; only present when the VLAN write succeeded
    pub subnet: Option<String>,
}

/// A spreadsheet row names a network or template the organization does not
/// have. The row is skipped; the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UnknownNetwork { name: String },
    UnknownTemplate { name: String },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::UnknownNetwork { name } => {
                write!(f, "network '{}' does not exist in the organization", name)
            }
            LookupError::UnknownTemplate { name } => {
                write!(f, "template '{}' does not exist in the organization", name)
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Process every assignment in order, producing one result per row whose
/// network and template both resolved.
pub async fn apply_assignments(
    api: &dyn DashboardApi,
    inventory: &Inventory,
    assignments: &[TemplateAssignment],
    reporter: &dyn Reporter,
) -> Vec<AssignmentResult> {
    let mut results = Vec::new();
    reporter.start(assignments.len());

    for assignment in assignments {
        match apply_one(api, inventory, assignment, reporter).await {
            Ok(result) => results.push(result),
            Err(err) => warn!("Skipping '{}': {}", assignment.network_name, err),
        }
        reporter.advance();
    }

    reporter.finish();
    results
}

async fn apply_one(
    api: &dyn DashboardApi,
    inventory: &Inventory,
    assignment: &TemplateAssignment,
    reporter: &dyn Reporter,
) -> Result<AssignmentResult, LookupError> {
    let network =
        inventory
            .networks
            .get(&assignment.network_name)
            .ok_or_else(|| LookupError::UnknownNetwork {
                name: assignment.network_name.clone(),
            })?;
    let template_id =
        inventory
            .templates
            .get(&assignment.template_name)
            .ok_or_else(|| LookupError::UnknownTemplate {
                name: assignment.template_name.clone(),
            })?;

    let mut result = AssignmentResult {
        network: assignment.network_name.clone(),
        new_template: NOT_APPLIED.to_string(),
        ip: NOT_APPLIED.to_string(),
        subnet: None,
    };

    reporter.message(&format!(
        "Binding network {} to template {}...",
        network.name, assignment.template_name
    ));

    if network.is_bound {
        reporter.message(&format!("First, unbinding network {}...", network.name));
        match api.unbind_network(&network.id).await {
            Ok(()) => reporter.message(&format!("Unbinding network {} successful", network.name)),
            // Bind is still attempted against the stale binding.
            Err(err) => error!(
                "Failed to unbind network '{}' from its template: {:#}",
                network.name, err
            ),
        }
    }

    match api.bind_network(&network.id, template_id).await {
        Ok(()) => {
            result.new_template = assignment.template_name.clone();
            reporter.message(&format!(
                "Binding network {} to template {} successful",
                network.name, assignment.template_name
            ));
        }
        // A failed bind does not block the VLAN restoration below; the
        // network may still carry a VLAN 1 worth reasserting.
        Err(err) => error!(
            "Failed to bind network '{}' to template '{}': {:#}",
            network.name, assignment.template_name, err
        ),
    }

    // Without a pre-rebind snapshot there is nothing to restore.
    let Some(snapshot) = inventory.vlan_snapshots.get(&network.id) else {
        return Ok(result);
    };

    reporter.message(&format!("Collecting VLANs from {}", network.name));
    let vlan_exists = match api.get_network_appliance_vlans(&network.id).await {
        Ok(vlans) => vlans.iter().any(|v| v.id == MANAGEMENT_VLAN_ID),
        Err(err) => {
            error!(
                "Failed to list VLANs on network '{}': {:#}",
                network.name, err
            );
            return Ok(result);
        }
    };

    reporter.message(&format!("Updating VLAN 1 on network {}...", network.name));
    let payload = VlanPayload::from_snapshot(snapshot);
    let written = if vlan_exists {
        api.update_network_appliance_vlan(&network.id, MANAGEMENT_VLAN_ID, &payload)
            .await
    } else {
        api.create_network_appliance_vlan(&network.id, MANAGEMENT_VLAN_ID, &payload)
            .await
    };

    match written {
        Ok(vlan) => {
            result.ip = vlan.appliance_ip;
            result.subnet = Some(vlan.subnet);
            reporter.message(&format!(
                "Updated VLAN 1 appliance IP to {} on network {}",
                result.ip, network.name
            ));
        }
        Err(err) => error!(
            "Failed to restore VLAN 1 on network '{}': {:#}",
            network.name, err
        ),
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::api::Vlan;
    use crate::api::testing::MockDashboard;
    use crate::inventory::NetworkRecord;
    use crate::report::NullReporter;

    fn assignment(network: &str, template: &str) -> TemplateAssignment {
        TemplateAssignment {
            network_name: network.to_string(),
            template_name: template.to_string(),
        }
    }

    fn vlan1(subnet: &str, ip: &str) -> Vlan {
        Vlan {
            id: MANAGEMENT_VLAN_ID,
            name: "Default".to_string(),
            subnet: subnet.to_string(),
            appliance_ip: ip.to_string(),
        }
    }

    /// Inventory with one network N_1 ("Store-12", unbound), its VLAN-1
    /// snapshot, and one template T_9 ("Retail-Template").
    fn store_inventory(is_bound: bool, with_snapshot: bool) -> Inventory {
        let mut networks = HashMap::new();
        networks.insert(
            "Store-12".to_string(),
            NetworkRecord {
                id: "N_1".to_string(),
                name: "Store-12".to_string(),
                is_bound,
            },
        );
        let mut vlan_snapshots = HashMap::new();
        if with_snapshot {
            vlan_snapshots.insert("N_1".to_string(), vlan1("10.0.0.0/24", "10.0.0.1"));
        }
        let mut templates = HashMap::new();
        templates.insert("Retail-Template".to_string(), "T_9".to_string());
        Inventory {
            networks,
            vlan_snapshots,
            templates,
        }
    }

    fn mock_with_vlan1_present() -> MockDashboard {
        let mut vlans = HashMap::new();
        vlans.insert("N_1".to_string(), vec![vlan1("192.168.128.0/24", "192.168.128.1")]);
        MockDashboard {
            vlans: Mutex::new(vlans),
            ..MockDashboard::default()
        }
    }

    #[tokio::test]
    async fn test_round_trip_bind_and_restore() {
        let api = mock_with_vlan1_present();
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert_eq!(
            api.calls(),
            vec![
                "bind N_1 T_9",
                "get_vlans N_1",
                "update_vlan N_1 1 10.0.0.0/24 10.0.0.1",
            ]
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].network, "Store-12");
        assert_eq!(results[0].new_template, "Retail-Template");
        assert_eq!(results[0].ip, "10.0.0.1");
        assert_eq!(results[0].subnet.as_deref(), Some("10.0.0.0/24"));
    }

    #[tokio::test]
    async fn test_bound_network_is_unbound_first() {
        let api = mock_with_vlan1_present();
        let inventory = store_inventory(true, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        let calls = api.calls();
        assert_eq!(calls[0], "unbind N_1");
        assert_eq!(calls[1], "bind N_1 T_9");
    }

    #[tokio::test]
    async fn test_failed_unbind_still_attempts_bind() {
        let api = MockDashboard {
            fail_unbind: true,
            ..mock_with_vlan1_present()
        };
        let inventory = store_inventory(true, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        let calls = api.calls();
        assert_eq!(calls[0], "unbind N_1");
        assert_eq!(calls[1], "bind N_1 T_9");
        assert_eq!(results[0].new_template, "Retail-Template");
    }

    #[tokio::test]
    async fn test_failed_bind_still_restores_vlan() {
        let api = MockDashboard {
            fail_bind: true,
            ..mock_with_vlan1_present()
        };
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert_eq!(results[0].new_template, NOT_APPLIED);
        assert_eq!(results[0].ip, "10.0.0.1");
        assert!(
            api.calls()
                .iter()
                .any(|c| c.starts_with("update_vlan N_1 1"))
        );
    }

    #[tokio::test]
    async fn test_missing_snapshot_skips_vlan_calls() {
        let api = mock_with_vlan1_present();
        let inventory = store_inventory(false, false);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert_eq!(api.calls(), vec!["bind N_1 T_9"]);
        assert_eq!(results[0].ip, NOT_APPLIED);
        assert_eq!(results[0].subnet, None);
    }

    #[tokio::test]
    async fn test_vlan_created_when_template_left_none() {
        // Post-bind VLAN list comes back empty, so restoration must create.
        let api = MockDashboard::default();
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert!(
            api.calls()
                .iter()
                .any(|c| c.starts_with("create_vlan N_1 1"))
        );
        assert_eq!(results[0].ip, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_unknown_network_skipped_and_run_continues() {
        let api = mock_with_vlan1_present();
        let inventory = store_inventory(false, true);
        let rows = [
            assignment("No-Such-Store", "Retail-Template"),
            assignment("Store-12", "Retail-Template"),
        ];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].network, "Store-12");
        assert!(!api.calls().iter().any(|c| c.contains("No-Such-Store")));
    }

    #[tokio::test]
    async fn test_unknown_template_skipped() {
        let api = mock_with_vlan1_present();
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "No-Such-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert!(results.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_vlan_listing_skips_restoration_but_records_row() {
        let api = MockDashboard {
            fail_vlan_list: true,
            ..mock_with_vlan1_present()
        };
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert!(
            !api.calls()
                .iter()
                .any(|c| c.starts_with("update_vlan") || c.starts_with("create_vlan"))
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].new_template, "Retail-Template");
        assert_eq!(results[0].ip, NOT_APPLIED);
        assert_eq!(results[0].subnet, None);
    }

    #[tokio::test]
    async fn test_failed_vlan_write_leaves_fields_unset() {
        let api = MockDashboard {
            fail_vlan_write: true,
            ..mock_with_vlan1_present()
        };
        let inventory = store_inventory(false, true);
        let rows = [assignment("Store-12", "Retail-Template")];

        let results = apply_assignments(&api, &inventory, &rows, &NullReporter).await;

        assert_eq!(results[0].new_template, "Retail-Template");
        assert_eq!(results[0].ip, NOT_APPLIED);
        assert_eq!(results[0].subnet, None);
    }
}
