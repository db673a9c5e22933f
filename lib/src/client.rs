use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use serde_json::{json, Map, Value};

use crate::api::{self, BatchResult, CampaignOptions, Endpoint, Method, SendResult, Template};
use crate::batch::{self, BatchEntry};
use crate::config::Config;
use crate::email::{self, EmailOptions, SendEmail};
use crate::error::Error;
use crate::query::LogQuery;

/// Asynchronous API client. One request is in flight per call; every
/// operation funnels through `request`.
pub struct Client {
    config: Config,
    client: reqwest::Client,
}

impl Client {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api::REQUEST_TIMEOUT))
            .build()
            .unwrap();

        Self { config, client }
    }

    pub fn from_api_key(api_key: &str) -> Self {
        Self::new(Config::new(api_key))
    }

    /// Per-instance settings applied over the process-wide defaults.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        Self::new(Config::from_settings(settings))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    async fn request(
        &self,
        method: Method,
        endpoint: Endpoint,
        query: Option<String>,
        body: Option<String>,
    ) -> Result<bytes::Bytes, Error> {
        let mut path = api::request_path(&self.config, &endpoint);
        if let Some(q) = query {
            path = format!("{}?{}", path, q);
        }
        let url = format!("{}{}", self.config.url, path);

        log::debug!("{} {}", method.as_str(), url);

        let mut req = self
            .client
            .request(method.into(), reqwest::Url::parse(&url)?)
            .basic_auth(&self.config.api_key, Some(""))
            .header(CONTENT_TYPE, "application/json")
            .header(api::CLIENT_HEADER, api::CLIENT_VERSION);

        if let Some(b) = body {
            req = req.body(b);
        }

        // Map response into an error if applicable
        let resp = api::map_status(req.send().await?);

        Ok(resp?.bytes().await?)
    }

    /// Send a single templated email.
    pub async fn send_email(
        &self,
        email_id: &str,
        recipient: Value,
        options: &EmailOptions,
    ) -> Result<SendResult, Error> {
        let payload = email::build_payload(email_id, &recipient, options)?;
        let resp = self
            .request(Method::Post, Endpoint::Send, None, Some(payload.to_string()))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    /// Send a set of emails in one batch request. Results are reported
    /// positionally, in the same order as the input.
    pub async fn send_emails(&self, emails: &[SendEmail]) -> Result<Vec<BatchResult>, Error> {
        let entries = batch::send_entries(emails)?;
        self.batch_send(entries).await
    }

    // Serialize the normalized descriptors once and dispatch them as a
    // single outbound request. The whole batch succeeds or fails.
    async fn batch_send(&self, entries: Vec<BatchEntry>) -> Result<Vec<BatchResult>, Error> {
        let normalized = batch::normalize(&self.config, entries)?;
        let body = serde_json::to_string(&normalized)?;
        let resp = self
            .request(Method::Post, Endpoint::Batch, None, Some(body))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    /// Render a template with the given data, without sending.
    pub async fn render(
        &self,
        template_id: &str,
        version_id: Option<&str>,
        template_data: Value,
        locale: Option<&str>,
    ) -> Result<Value, Error> {
        let mut payload = Map::new();
        payload.insert("template_id".to_string(), json!(template_id));
        payload.insert("template_data".to_string(), template_data);
        if let Some(version_id) = version_id {
            payload.insert("version_id".to_string(), json!(version_id));
        }
        if let Some(locale) = locale {
            payload.insert("locale".to_string(), json!(locale));
        }

        let body = Value::Object(payload).to_string();
        let resp = self
            .request(Method::Post, Endpoint::Render, None, Some(body))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn templates(&self) -> Result<Value, Error> {
        let resp = self
            .request(Method::Get, Endpoint::Templates, None, None)
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn create_template(&self, template: &Template) -> Result<Value, Error> {
        let body = serde_json::to_string(template)?;
        let resp = self
            .request(Method::Post, Endpoint::Templates, None, Some(body))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::Template(template_id.to_string());
        let resp = self.request(Method::Delete, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn template_versions(&self, template_id: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::TemplateVersions(template_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn template_version(
        &self,
        template_id: &str,
        version_id: &str,
    ) -> Result<Value, Error> {
        let endpoint = Endpoint::TemplateVersion(template_id.to_string(), version_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn create_template_version(
        &self,
        template_id: &str,
        template: &Template,
    ) -> Result<Value, Error> {
        let endpoint = Endpoint::TemplateVersions(template_id.to_string());
        let body = serde_json::to_string(template)?;
        let resp = self.request(Method::Post, endpoint, None, Some(body)).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn update_template_version(
        &self,
        template_id: &str,
        version_id: &str,
        template: &Template,
    ) -> Result<Value, Error> {
        let endpoint = Endpoint::TemplateVersion(template_id.to_string(), version_id.to_string());
        let body = serde_json::to_string(template)?;
        let resp = self.request(Method::Put, endpoint, None, Some(body)).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn drip_campaigns(&self) -> Result<Value, Error> {
        let resp = self
            .request(Method::Get, Endpoint::DripCampaigns, None, None)
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn drip_campaign(&self, campaign_id: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::DripCampaign(campaign_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    /// Start a recipient on a drip campaign. Optional fields follow
    /// the same presence rules as send payloads.
    pub async fn start_on_drip_campaign(
        &self,
        recipient_address: &str,
        campaign_id: &str,
        options: &CampaignOptions,
    ) -> Result<Value, Error> {
        let mut payload = Map::new();
        payload.insert("recipient_address".to_string(), json!(recipient_address));

        if let Some(ref email_data) = options.email_data {
            if email::has_entries(email_data) {
                payload.insert("email_data".to_string(), email_data.clone());
            }
        }
        if !options.tags.is_empty() {
            payload.insert("tags".to_string(), json!(options.tags));
        }
        if let Some(ref locale) = options.locale {
            payload.insert("locale".to_string(), json!(locale));
        }

        let endpoint = Endpoint::DripCampaignActivate(campaign_id.to_string());
        let body = Value::Object(payload).to_string();
        let resp = self.request(Method::Post, endpoint, None, Some(body)).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn remove_from_drip_campaign(
        &self,
        recipient_address: &str,
        campaign_id: &str,
    ) -> Result<Value, Error> {
        let endpoint = Endpoint::DripCampaignDeactivate(campaign_id.to_string());
        let body = json!({ "recipient_address": recipient_address }).to_string();
        let resp = self.request(Method::Post, endpoint, None, Some(body)).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn campaign_customers(&self, campaign_id: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::DripCampaignCustomers(campaign_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn campaign_step_customers(
        &self,
        campaign_id: &str,
        step_id: &str,
    ) -> Result<Value, Error> {
        let endpoint =
            Endpoint::DripCampaignStepCustomers(campaign_id.to_string(), step_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    /// Unsubscribe an address from all drip campaigns.
    pub async fn drips_unsubscribe(&self, email_address: &str) -> Result<Value, Error> {
        if email_address.is_empty() {
            return Err(Error::BadInput("email_address cannot be empty".to_string()));
        }

        let body = json!({ "email_address": email_address }).to_string();
        let resp = self
            .request(Method::Post, Endpoint::DripsUnsubscribe, None, Some(body))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn customer(&self, email: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::Customer(email.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn create_customer(
        &self,
        email: &str,
        data: Option<Value>,
        locale: Option<&str>,
    ) -> Result<Value, Error> {
        let mut payload = Map::new();
        payload.insert("email".to_string(), json!(email));

        if let Some(ref data) = data {
            if email::has_entries(data) {
                payload.insert("data".to_string(), data.clone());
            }
        }
        if let Some(locale) = locale {
            payload.insert("locale".to_string(), json!(locale));
        }

        let body = Value::Object(payload).to_string();
        let resp = self
            .request(Method::Post, Endpoint::Customers, None, Some(body))
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn delete_customer(&self, email: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::Customer(email.to_string());
        let resp = self.request(Method::Delete, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn customer_logs(&self, email: &str, query: &LogQuery) -> Result<Value, Error> {
        let endpoint = Endpoint::CustomerLogs(email.to_string());
        let resp = self
            .request(Method::Get, endpoint, query.to_query_string(), None)
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn logs(&self, query: &LogQuery) -> Result<Value, Error> {
        let resp = self
            .request(Method::Get, Endpoint::Logs, query.to_query_string(), None)
            .await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }

    pub async fn log(&self, log_id: &str) -> Result<Value, Error> {
        let endpoint = Endpoint::Log(log_id.to_string());
        let resp = self.request(Method::Get, endpoint, None, None).await?;
        serde_json::from_slice(&resp).map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_client() -> Client {
        Client::from_api_key("DRIFTMAIL_TEST_KEY")
    }

    #[test]
    fn test_from_api_key_defaults() {
        let client = get_client();

        assert_eq!(client.config().api_key, "DRIFTMAIL_TEST_KEY");
        assert_eq!(client.config().url, crate::config::DEFAULT_URL);
        assert_eq!(client.config().api_version, "1");
    }

    #[test]
    fn test_from_settings() {
        let mut settings = HashMap::new();
        settings.insert("api_key".to_string(), "STUFF_AND_THINGS".to_string());

        let client = Client::from_settings(&settings);

        assert_eq!(client.config().api_key, "STUFF_AND_THINGS");
    }

    #[tokio::test]
    async fn test_send_email_empty_id_fails_before_send() {
        let client = get_client();

        let result = client
            .send_email("", json!({"address": "a@example.com"}), &EmailOptions::default())
            .await;

        println!("{:?}", result.as_ref().err());
        assert!(matches!(result, Err(Error::MissingEmailId)));
    }

    #[tokio::test]
    async fn test_send_emails_empty_id_fails_before_send() {
        let client = get_client();
        let emails = vec![
            SendEmail::new("id_1", json!({"address": "a@example.com"})),
            SendEmail::new("", json!({"address": "b@example.com"})),
        ];

        let result = client.send_emails(&emails).await;

        assert!(matches!(result, Err(Error::MissingEmailId)));
    }

    #[tokio::test]
    async fn test_batch_send_null_payload_fails_before_send() {
        let client = get_client();
        let entries = vec![BatchEntry {
            endpoint: Endpoint::Send,
            method: Method::Post,
            payload: Value::Null,
        }];

        let result = client.batch_send(entries).await;

        assert!(matches!(result, Err(Error::BadBatchEntry(_))));
    }

    #[tokio::test]
    async fn test_drips_unsubscribe_empty_address() {
        let client = get_client();

        let result = client.drips_unsubscribe("").await;

        assert!(matches!(result, Err(Error::BadInput(_))));
    }
}
