use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::Error;

/// A single email attachment. Content is held in memory and base64
/// encoded at payload-build time.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }

    /// Resolve an attachment from a file path. The attachment name is
    /// the file's basename.
    pub fn from_path(path: &str) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        Ok(Self { name, data })
    }

    fn to_value(&self) -> Value {
        json!({ "id": self.name, "data": base64::encode(&self.data) })
    }
}

/// Optional fields for a single send. Unset or empty fields are left
/// out of the built payload entirely.
#[derive(Debug, Default)]
pub struct EmailOptions {
    pub data: Option<Value>,
    pub sender: Option<Value>,
    pub cc: Vec<Value>,
    pub bcc: Vec<Value>,
    pub esp_account: Option<String>,
    pub version_name: Option<String>,
    pub headers: Option<Value>,
    pub tags: Vec<String>,
    pub locale: Option<String>,
    pub files: Vec<Attachment>,
}

/// One email of a batch send.
#[derive(Debug)]
pub struct SendEmail {
    pub email_id: String,
    pub recipient: Value,
    pub options: EmailOptions,
}

impl SendEmail {
    pub fn new(email_id: &str, recipient: Value) -> Self {
        Self {
            email_id: email_id.to_string(),
            recipient,
            options: EmailOptions::default(),
        }
    }

    pub fn with_options(email_id: &str, recipient: Value, options: EmailOptions) -> Self {
        Self {
            email_id: email_id.to_string(),
            recipient,
            options,
        }
    }
}

// An optional mapping counts as set only if it holds at least one entry
pub(crate) fn has_entries(value: &Value) -> bool {
    match *value {
        Value::Null => false,
        Value::Object(ref m) => !m.is_empty(),
        Value::Array(ref a) => !a.is_empty(),
        Value::String(ref s) => !s.is_empty(),
        _ => true,
    }
}

/// Build the send payload for one email. Optional fields are included
/// only when set and non-empty; the service validates the rest.
pub fn build_payload(
    email_id: &str,
    recipient: &Value,
    options: &EmailOptions,
) -> Result<Value, Error> {
    if email_id.is_empty() {
        return Err(Error::MissingEmailId);
    }

    let mut payload = Map::new();
    payload.insert("email_id".to_string(), json!(email_id));
    payload.insert("recipient".to_string(), recipient.clone());

    if let Some(ref data) = options.data {
        if has_entries(data) {
            payload.insert("email_data".to_string(), data.clone());
        }
    }
    if let Some(ref sender) = options.sender {
        if has_entries(sender) {
            payload.insert("sender".to_string(), sender.clone());
        }
    }
    if !options.cc.is_empty() {
        payload.insert("cc".to_string(), Value::Array(options.cc.clone()));
    }
    if !options.bcc.is_empty() {
        payload.insert("bcc".to_string(), Value::Array(options.bcc.clone()));
    }
    if let Some(ref esp_account) = options.esp_account {
        if !esp_account.is_empty() {
            payload.insert("esp_account".to_string(), json!(esp_account));
        }
    }
    if let Some(ref version_name) = options.version_name {
        if !version_name.is_empty() {
            payload.insert("version_name".to_string(), json!(version_name));
        }
    }
    if let Some(ref headers) = options.headers {
        if has_entries(headers) {
            payload.insert("headers".to_string(), headers.clone());
        }
    }
    if !options.tags.is_empty() {
        payload.insert("tags".to_string(), json!(options.tags));
    }
    if let Some(ref locale) = options.locale {
        if !locale.is_empty() {
            payload.insert("locale".to_string(), json!(locale));
        }
    }
    if !options.files.is_empty() {
        let files = options.files.iter().map(|f| f.to_value()).collect();
        payload.insert("files".to_string(), Value::Array(files));
    }

    Ok(Value::Object(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_payload() {
        let recipient = json!({"name": "name_1", "address": "address_1"});
        let payload = build_payload("id_1", &recipient, &EmailOptions::default()).unwrap();

        assert_eq!(
            payload,
            json!({
                "email_id": "id_1",
                "recipient": {"name": "name_1", "address": "address_1"},
            })
        );
    }

    #[test]
    fn test_empty_options_left_out() {
        let options = EmailOptions {
            data: Some(json!({})),
            esp_account: Some(String::new()),
            locale: Some(String::new()),
            ..Default::default()
        };
        let payload = build_payload("id_1", &json!({}), &options).unwrap();
        let payload = payload.as_object().unwrap();

        assert!(!payload.contains_key("email_data"));
        assert!(!payload.contains_key("sender"));
        assert!(!payload.contains_key("cc"));
        assert!(!payload.contains_key("bcc"));
        assert!(!payload.contains_key("esp_account"));
        assert!(!payload.contains_key("headers"));
        assert!(!payload.contains_key("tags"));
        assert!(!payload.contains_key("locale"));
        assert!(!payload.contains_key("files"));
    }

    #[test]
    fn test_set_options_included() {
        let options = EmailOptions {
            data: Some(json!({"foo": "bar"})),
            sender: Some(json!({"address": "from@example.com"})),
            cc: vec![json!({"address": "cc@example.com"})],
            version_name: Some("version".to_string()),
            tags: vec!["tag1".to_string(), "tag2".to_string()],
            locale: Some("en-US".to_string()),
            ..Default::default()
        };
        let payload = build_payload("id_2", &json!({"name": "name_2"}), &options).unwrap();

        assert_eq!(payload["email_data"], json!({"foo": "bar"}));
        assert_eq!(payload["sender"], json!({"address": "from@example.com"}));
        assert_eq!(payload["cc"], json!([{"address": "cc@example.com"}]));
        assert_eq!(payload["version_name"], json!("version"));
        assert_eq!(payload["tags"], json!(["tag1", "tag2"]));
        assert_eq!(payload["locale"], json!("en-US"));
        assert!(payload.get("bcc").is_none());
    }

    #[test]
    fn test_empty_email_id() {
        let result = build_payload("", &json!({}), &EmailOptions::default());

        assert!(matches!(result, Err(Error::MissingEmailId)));
    }

    #[test]
    fn test_attachment_encoding() {
        let options = EmailOptions {
            files: vec![Attachment::new("doc.txt", b"Hello there!".to_vec())],
            ..Default::default()
        };
        let payload = build_payload("id_1", &json!({}), &options).unwrap();

        assert_eq!(
            payload["files"],
            json!([{"id": "doc.txt", "data": "SGVsbG8gdGhlcmUh"}])
        );
    }

    #[test]
    fn test_attachment_from_path() {
        let path = std::env::temp_dir().join("driftmail_attachment_test.txt");
        std::fs::write(&path, b"attached").unwrap();

        let attachment = Attachment::from_path(path.to_str().unwrap()).unwrap();

        assert_eq!(attachment.name, "driftmail_attachment_test.txt");
        assert_eq!(attachment.data, b"attached".to_vec());
    }
}
