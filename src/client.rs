use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Settings;
use crate::error::Error;
use crate::resource::ResourceKind;
use crate::row::Row;

/// One operation per (kind, verb) pair against the Mailcow admin API.
///
/// The batch pipeline and the commands only see this trait, so tests can
/// substitute fakes without a server.
#[async_trait]
pub trait MailcowApi: Send + Sync {
    /// Creates one resource; returns the server's acknowledgement message
    /// (Mailcow write replies carry no record id).
    async fn create(&self, kind: ResourceKind, row: &Row) -> Result<String, Error>;

    async fn list(&self, kind: ResourceKind, include_log: bool) -> Result<Vec<Value>, Error>;

    async fn update(&self, kind: ResourceKind, id: &str, attrs: &Row) -> Result<String, Error>;

    async fn delete(&self, kind: ResourceKind, ids: &[String]) -> Result<String, Error>;
}

pub struct MailcowClient {
    http: reqwest::Client,
    api_url: String,
}

impl MailcowClient {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&settings.api_key)
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);
        headers.insert("X-API-Key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
        })
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = format!("{}/api/v1/{}", self.api_url, endpoint);
        debug!(%method, %url, "mailcow api request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::Api {
            status: status.as_u16(),
            message: format!("invalid JSON in response: {e}"),
        })
    }
}

#[async_trait]
impl MailcowApi for MailcowClient {
    async fn create(&self, kind: ResourceKind, row: &Row) -> Result<String, Error> {
        let mut payload = row.clone();
        // The add/mailbox endpoint wants the password twice.
        if kind == ResourceKind::Mailbox {
            if let Some(password) = payload.get("password").map(str::to_string) {
                if payload.is_blank("password2") {
                    payload.set("password2", password);
                }
            }
        }

        let reply = self
            .request(Method::POST, kind.add_endpoint(), Some(&payload.to_json()))
            .await?;
        check_reply(&reply)
    }

    async fn list(&self, kind: ResourceKind, include_log: bool) -> Result<Vec<Value>, Error> {
        let reply = self
            .request(Method::GET, kind.list_endpoint(include_log), None)
            .await?;
        // An empty set comes back as `{}` on some installations.
        Ok(match reply {
            Value::Array(records) => records,
            Value::Object(map) if map.is_empty() => Vec::new(),
            other => vec![other],
        })
    }

    async fn update(&self, kind: ResourceKind, id: &str, attrs: &Row) -> Result<String, Error> {
        let payload = json!({
            "items": [id],
            "attr": attrs.to_json(),
        });
        let reply = self
            .request(Method::POST, kind.edit_endpoint(), Some(&payload))
            .await?;
        check_reply(&reply)
    }

    async fn delete(&self, kind: ResourceKind, ids: &[String]) -> Result<String, Error> {
        let payload = Value::Array(ids.iter().map(|id| Value::String(id.clone())).collect());
        let reply = self
            .request(Method::POST, kind.delete_endpoint(), Some(&payload))
            .await?;
        check_reply(&reply)
    }
}

/// Decodes a Mailcow write acknowledgement.
///
/// Replies arrive as `[{"type": "success"|"error"|"danger", "msg": ...}]`
/// where `msg` is a string or a string array, or occasionally as a bare string
/// array like `["object_exists", "john@example.com"]`, which always means
/// failure.
pub fn check_reply(reply: &Value) -> Result<String, Error> {
    let items = match reply.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(Error::Rejected(format!("unexpected reply: {reply}"))),
    };

    match &items[0] {
        Value::Object(first) => {
            let message = join_msg(first.get("msg"));
            match first.get("type").and_then(Value::as_str) {
                Some("success") => Ok(message),
                _ if message.is_empty() => Err(Error::Rejected(reply.to_string())),
                _ => Err(Error::Rejected(message)),
            }
        }
        Value::String(_) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            Err(Error::Rejected(joined))
        }
        _ => Err(Error::Rejected(format!("unexpected reply: {reply}"))),
    }
}

fn join_msg(msg: Option<&Value>) -> String {
    match msg {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
