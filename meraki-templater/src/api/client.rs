//! reqwest-based implementation of [`DashboardApi`]

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::DashboardApi;
use super::models::{ConfigTemplate, Network, Vlan, VlanPayload};

const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Page size for the organization network listing
const NETWORKS_PER_PAGE: usize = 1000;

/// Cursor for the page after `page`, or `None` when `page` was the last one
/// (a short page means the listing is exhausted).
fn next_network_cursor(page: &[Network]) -> Option<String> {
    if page.len() < NETWORKS_PER_PAGE {
        return None;
    }
    page.last().map(|n| n.id.clone())
}

/// HTTP client for the Meraki Dashboard API v1.
///
/// Authentication is a bearer token sent on every request. Timeouts are left
/// to reqwest's defaults; the tool has no retry policy of its own.
pub struct MerakiClient {
    http: reqwest::Client,
    base_url: String,
}

impl MerakiClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different base URL (sandbox or test server).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("API key contains characters not valid in an HTTP header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", path);
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Dashboard API returned {} for {}: {}", status, path, body);
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", path))
    }

    /// POST with a JSON body, discarding the response body.
    async fn post_ok(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Dashboard API returned {} for {}: {}", status, path, text);
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for MerakiClient {
    async fn list_organization_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        let path = format!("/organizations/{org_id}/networks");
        let mut networks: Vec<Network> = Vec::new();
        let mut starting_after: Option<String> = None;

        // Cursor pagination: keep requesting until a short page comes back.
        loop {
            let mut query = vec![("perPage", NETWORKS_PER_PAGE.to_string())];
            if let Some(after) = &starting_after {
                query.push(("startingAfter", after.clone()));
            }
            let page: Vec<Network> = self.get_json(&path, &query).await?;
            let cursor = next_network_cursor(&page);
            networks.extend(page);
            match cursor {
                Some(after) => starting_after = Some(after),
                None => break,
            }
        }

        Ok(networks)
    }

    async fn list_organization_config_templates(
        &self,
        org_id: &str,
    ) -> Result<Vec<ConfigTemplate>> {
        self.get_json(&format!("/organizations/{org_id}/configTemplates"), &[])
            .await
    }

    async fn get_network_appliance_vlans(&self, network_id: &str) -> Result<Vec<Vlan>> {
        self.get_json(&format!("/networks/{network_id}/appliance/vlans"), &[])
            .await
    }

    async fn update_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan> {
        let path = format!("/networks/{network_id}/appliance/vlans/{vlan_id}");
        debug!("PUT {}", path);
        let response = self
            .http
            .put(self.url(&path))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", path))?;
        Self::decode(&path, response).await
    }

    async fn create_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: i64,
        payload: &VlanPayload,
    ) -> Result<Vlan> {
        let path = format!("/networks/{network_id}/appliance/vlans");
        debug!("POST {}", path);
        // Creation carries the VLAN id in the body alongside the payload fields.
        let body = json!({
            "id": vlan_id.to_string(),
            "name": payload.name,
            "subnet": payload.subnet,
            "applianceIp": payload.appliance_ip,
        });
        let response = self
            .http
            .post(self.url(&path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        Self::decode(&path, response).await
    }

    async fn bind_network(&self, network_id: &str, template_id: &str) -> Result<()> {
        self.post_ok(
            &format!("/networks/{network_id}/bind"),
            &json!({ "configTemplateId": template_id, "autoBind": false }),
        )
        .await
    }

    async fn unbind_network(&self, network_id: &str) -> Result<()> {
        self.post_ok(
            &format!("/networks/{network_id}/unbind"),
            &json!({ "retainConfigs": false }),
        )
        .await
    }
}
