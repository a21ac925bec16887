//! PostgREST client for a hosted Supabase project.
//!
//! Tables live under `{SUPABASE_URL}/rest/v1/{table}`. The service key is sent both as
//! `apikey` and as a bearer token; inserts ask for the inserted rows back. A table's
//! schema is selected with PostgREST's `Accept-Profile` / `Content-Profile` headers.

use crate::error::{ConfigError, StoreError};
use crate::store::{DataStore, Record, TableRef};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

const REST_PATH: [&str; 2] = ["rest", "v1"];

#[derive(Clone, Debug)]
pub struct RestStore {
    base_url: Url,
    http: Client,
}

impl RestStore {
    pub fn new(url: &str, key: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(url).map_err(|e| ConfigError::ClientInit(format!("{}: {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::ClientInit(format!("{} cannot be used as a base url", url)));
        }

        let mut apikey = header::HeaderValue::from_str(key)
            .map_err(|_| ConfigError::ClientInit("key is not a valid header value".into()))?;
        apikey.set_sensitive(true);
        let mut bearer = header::HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|_| ConfigError::ClientInit("key is not a valid header value".into()))?;
        bearer.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        Ok(RestStore { base_url, http })
    }

    /// `{base}/rest/v1/{table}`; the table name is percent-encoded as a single segment.
    pub fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Decode(format!("bad base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(REST_PATH)
            .push(table);
        Ok(url)
    }

    fn read(&self, table: &TableRef) -> Result<RequestBuilder, StoreError> {
        let req = self.http.get(self.table_url(&table.name)?);
        Ok(match &table.schema {
            Some(schema) => req.header("Accept-Profile", schema),
            None => req,
        })
    }

    fn write(&self, table: &TableRef) -> Result<RequestBuilder, StoreError> {
        let req = self.http.post(self.table_url(&table.name)?);
        Ok(match &table.schema {
            Some(schema) => req.header("Content-Profile", schema),
            None => req,
        })
    }
}

/// Message to relay for a failed call: PostgREST's `message` field, else the raw body,
/// else the status reason.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(msg)) = obj.get("message") {
            return msg.clone();
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("status {}", status.as_u16()))
}

async fn read_json(resp: reqwest::Response) -> Result<Value, StoreError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let message = upstream_message(status, &body);
        tracing::warn!(status = status.as_u16(), message = %message, "postgrest call failed");
        return Err(StoreError::Upstream {
            status: status.as_u16(),
            message,
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl DataStore for RestStore {
    async fn select_all(&self, table: &TableRef) -> Result<Vec<Value>, StoreError> {
        tracing::debug!(table = %table.name, schema = ?table.schema, "select");
        let resp = self.read(table)?.query(&[("select", "*")]).send().await?;
        match read_json(resp).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::Decode(format!("expected an array of rows, got {}", other))),
        }
    }

    async fn insert(&self, table: &TableRef, record: &Record) -> Result<Value, StoreError> {
        tracing::debug!(table = %table.name, schema = ?table.schema, fields = record.len(), "insert");
        let resp = self
            .write(table)?
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn ping(&self, table: &TableRef) -> Result<(), StoreError> {
        let resp = self
            .read(table)?
            .query(&[("select", "*"), ("limit", "1")])
            .send()
            .await?;
        read_json(resp).await.map(|_| ())
    }
}
