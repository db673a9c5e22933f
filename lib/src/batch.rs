use serde::Serialize;
use serde_json::Value;

use crate::api::{self, Endpoint, Method};
use crate::config::Config;
use crate::email::{self, SendEmail};
use crate::error::Error;

/// One call descriptor of a batch request.
#[derive(Debug)]
pub struct BatchEntry {
    pub endpoint: Endpoint,
    pub method: Method,
    pub payload: Value,
}

/// A descriptor normalized for the wire. The batch body is a JSON
/// array of these records, executed positionally by the service.
#[derive(Debug, Serialize)]
pub struct NormalizedCall {
    pub path: String,
    pub method: String,
    pub body: Value,
}

/// Normalize descriptors into wire records, preserving input order.
/// A descriptor with a null payload fails the whole batch.
pub fn normalize(config: &Config, entries: Vec<BatchEntry>) -> Result<Vec<NormalizedCall>, Error> {
    entries
        .into_iter()
        .map(|entry| {
            if entry.payload.is_null() {
                return Err(Error::BadBatchEntry(format!(
                    "descriptor for {} has no payload",
                    entry.endpoint.uri()
                )));
            }

            Ok(NormalizedCall {
                path: api::request_path(config, &entry.endpoint),
                method: entry.method.as_str().to_string(),
                body: entry.payload,
            })
        })
        .collect()
}

/// Build one `send` descriptor per email, in input order.
pub fn send_entries(emails: &[SendEmail]) -> Result<Vec<BatchEntry>, Error> {
    emails
        .iter()
        .map(|email| {
            let payload = email::build_payload(&email.email_id, &email.recipient, &email.options)?;

            Ok(BatchEntry {
                endpoint: Endpoint::Send,
                method: Method::Post,
                payload,
            })
        })
        .collect()
}
