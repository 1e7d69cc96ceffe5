//! `eth_call` transports
//!
//! `JsonRpcTransport` speaks raw JSON-RPC over reqwest and surfaces HTTP and
//! RPC error codes. `ProviderTransport` goes through an alloy provider.

use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, SdkError};

/// Timeout for a single JSON-RPC request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Read-only contract calls against a chain
#[async_trait]
pub trait EthCaller: Send + Sync {
    /// `eth_call` at the latest block, returning the raw return data
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}

#[async_trait]
impl<T: EthCaller + ?Sized> EthCaller for Box<T> {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        (**self).eth_call(to, data).await
    }
}

// ============================================
// RAW JSON-RPC
// ============================================

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

pub struct JsonRpcTransport {
    http_client: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one JSON-RPC request and return its `result`
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("JSON-RPC {} #{} -> {}", method, id, self.url);
        let response = self.http_client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(SdkError::Transport {
                status: Some(i64::from(status.as_u16())),
                message: format!("{} responded with {}", self.url, status),
            });
        }

        let rpc: JsonRpcResponse = response.json().await?;
        if let Some(error) = rpc.error {
            warn!("JSON-RPC {} failed: {} (code {})", method, error.message, error.code);
            return Err(SdkError::Transport {
                status: Some(error.code),
                message: error.message,
            });
        }

        rpc.result.ok_or_else(|| SdkError::Transport {
            status: None,
            message: format!("{} returned neither result nor error", method),
        })
    }
}

/// Decode a `0x`-prefixed hex string into bytes
pub(crate) fn decode_hex_result(value: &Value) -> Result<Bytes> {
    let s = value
        .as_str()
        .ok_or_else(|| SdkError::Decode(format!("expected hex string, got {}", value)))?;
    let raw = hex::decode(s.trim_start_matches("0x")).map_err(|e| SdkError::Decode(e.to_string()))?;
    Ok(Bytes::from(raw))
}

#[async_trait]
impl EthCaller for JsonRpcTransport {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        let result = self.request("eth_call", params).await?;
        decode_hex_result(&result)
    }
}

// ============================================
// ALLOY PROVIDER
// ============================================

/// `eth_call` through an alloy HTTP provider
pub struct ProviderTransport {
    rpc_url: String,
}

impl ProviderTransport {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self { rpc_url: rpc_url.into() }
    }
}

#[async_trait]
impl EthCaller for ProviderTransport {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let url = self.rpc_url.parse().map_err(|e| SdkError::Transport {
            status: None,
            message: format!("invalid RPC URL {}: {}", self.rpc_url, e),
        })?;
        let provider = ProviderBuilder::new().connect_http(url);

        let tx = TransactionRequest::default().to(to).input(data.into());
        provider.call(tx).await.map_err(|e| SdkError::Transport {
            status: None,
            message: format!("eth_call to {} failed: {}", to, e),
        })
    }
}
