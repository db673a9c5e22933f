use reqwest::StatusCode;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::Error;

/// Client version header attached to every request.
pub const CLIENT_HEADER: &str = "X-Driftmail-Client";
pub(crate) const CLIENT_VERSION: &str = concat!("rust-", env!("CARGO_PKG_VERSION"));

// Request timeout, in seconds
pub(crate) const REQUEST_TIMEOUT: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Logical API endpoints. `uri` yields the path segment relative to
/// the versioned API root.
#[derive(Clone, Debug)]
pub enum Endpoint {
    Send,
    Batch,
    Render,
    Templates,
    Template(String),
    TemplateVersions(String),
    TemplateVersion(String, String),
    Logs,
    Log(String),
    Customers,
    Customer(String),
    CustomerLogs(String),
    DripCampaigns,
    DripCampaign(String),
    DripCampaignActivate(String),
    DripCampaignDeactivate(String),
    DripCampaignCustomers(String),
    DripCampaignStepCustomers(String, String),
    DripsUnsubscribe,
}

impl Endpoint {
    pub fn uri(&self) -> String {
        match *self {
            Endpoint::Send => "send".to_string(),
            Endpoint::Batch => "batch".to_string(),
            Endpoint::Render => "render".to_string(),
            Endpoint::Templates => "templates".to_string(),
            Endpoint::Template(ref id) => format!("templates/{}", id),
            Endpoint::TemplateVersions(ref id) => format!("templates/{}/versions", id),
            Endpoint::TemplateVersion(ref id, ref vid) => {
                format!("templates/{}/versions/{}", id, vid)
            }
            Endpoint::Logs => "logs".to_string(),
            Endpoint::Log(ref id) => format!("logs/{}", id),
            Endpoint::Customers => "customers".to_string(),
            Endpoint::Customer(ref email) => format!("customers/{}", email),
            Endpoint::CustomerLogs(ref email) => format!("customers/{}/logs", email),
            Endpoint::DripCampaigns => "drip_campaigns".to_string(),
            Endpoint::DripCampaign(ref id) => format!("drip_campaigns/{}", id),
            Endpoint::DripCampaignActivate(ref id) => format!("drip_campaigns/{}/activate", id),
            Endpoint::DripCampaignDeactivate(ref id) => {
                format!("drip_campaigns/{}/deactivate", id)
            }
            Endpoint::DripCampaignCustomers(ref id) => format!("drip_campaigns/{}/customers", id),
            Endpoint::DripCampaignStepCustomers(ref id, ref step) => {
                format!("drip_campaigns/{}/step/{}/customers", id, step)
            }
            Endpoint::DripsUnsubscribe => "drips/unsubscribe".to_string(),
        }
    }
}

/// Fully-qualified request path for an endpoint, including the API
/// version prefix.
#[inline]
pub fn request_path(config: &Config, endpoint: &Endpoint) -> String {
    format!("/api/v{}/{}", config.api_version, endpoint.uri())
}

/// Map API error responses to client errors
pub fn map_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let err = resp.error_for_status_ref();

    if let Err(e) = err {
        let status = e.status().unwrap();
        let msg = e.to_string();

        match status {
            StatusCode::BAD_REQUEST => Err(Error::BadInput(msg)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::InvalidApiKey(msg)),
            StatusCode::NOT_FOUND => Err(Error::NotFound(msg)),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited(msg)),
            _ => Err(Error::Internal(msg)),
        }
    } else {
        Ok(resp)
    }
}

/// Template content for create/update operations.
#[derive(Clone, Debug, Serialize)]
pub struct Template {
    pub name: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Optional fields for drip campaign activation.
#[derive(Debug, Default)]
pub struct CampaignOptions {
    pub email_data: Option<Value>,
    pub locale: Option<String>,
    pub tags: Vec<String>,
}

/// Service acknowledgement for a single send.
#[derive(Deserialize, Debug)]
pub struct SendResult {
    pub success: bool,
    pub status: String,
    pub receipt_id: Option<String>,
}

/// One positional entry of a batch response.
#[derive(Deserialize, Debug)]
pub struct BatchResult {
    pub status_code: u16,
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path() {
        let config = Config::new("key");

        assert_eq!(request_path(&config, &Endpoint::Send), "/api/v1/send");
        assert_eq!(request_path(&config, &Endpoint::Batch), "/api/v1/batch");
        assert_eq!(
            request_path(
                &config,
                &Endpoint::TemplateVersion("tem_1".to_string(), "ver_2".to_string())
            ),
            "/api/v1/templates/tem_1/versions/ver_2"
        );
        assert_eq!(
            request_path(
                &config,
                &Endpoint::DripCampaignStepCustomers("dc_1".to_string(), "dcs_2".to_string())
            ),
            "/api/v1/drip_campaigns/dc_1/step/dcs_2/customers"
        );
        assert_eq!(
            request_path(&config, &Endpoint::CustomerLogs("some@email.stub".to_string())),
            "/api/v1/customers/some@email.stub/logs"
        );
        assert_eq!(
            request_path(&config, &Endpoint::DripsUnsubscribe),
            "/api/v1/drips/unsubscribe"
        );
    }

    #[test]
    fn test_request_path_version() {
        let mut config = Config::new("key");
        config.api_version = "2".to_string();

        assert_eq!(request_path(&config, &Endpoint::Logs), "/api/v2/logs");
    }

    #[test]
    fn test_method_strings() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Delete.as_str(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::Put), reqwest::Method::PUT);
    }
}
