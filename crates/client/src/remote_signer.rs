//! Remote transaction signer backed by a signer-proxy service.
//!
//! Governance keys (council members, deployers) usually live in an HSM. The
//! proxy accepts `eth_signTransaction` JSON-RPC requests and returns the
//! signed raw transaction.

use crate::ClientError;
use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::eth::TransactionRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A signer that delegates transaction signing to a signer-proxy service.
///
/// # Example
///
/// ```ignore
/// let signer = RemoteSigner::new("http://localhost:9060", address, 1);
/// let signed_tx = signer.sign_transaction(tx_request).await?;
/// provider.send_raw_transaction(&signed_tx).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    client: reqwest::Client,
    proxy_url: String,
    address: Address,
    chain_id: u64,
}

impl RemoteSigner {
    /// Creates a new remote signer.
    ///
    /// # Arguments
    /// * `proxy_url` - The URL of the signer-proxy service (e.g., "http://localhost:9060")
    /// * `address` - The account the proxy signs for
    /// * `chain_id` - The chain ID for EIP-155 replay protection
    pub fn new(proxy_url: impl Into<String>, address: Address, chain_id: u64) -> Self {
        Self::with_client(reqwest::Client::new(), proxy_url, address, chain_id)
    }

    /// Creates a new remote signer with a custom HTTP client.
    pub fn with_client(
        client: reqwest::Client,
        proxy_url: impl Into<String>,
        address: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            client,
            proxy_url: proxy_url.into(),
            address,
            chain_id,
        }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signs a transaction via the signer-proxy.
    ///
    /// Returns the EIP-2718 encoded transaction, ready for
    /// `provider.send_raw_transaction()`.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, ClientError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_signTransaction",
            params: [tx],
            id: 1,
        };

        debug!(proxy = %self.proxy_url, from = %self.address, "Requesting remote signature");

        let response = self
            .client
            .post(&self.proxy_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ClientError::Other(format!(
                "signer-proxy returned {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        parse_sign_response(&body)
    }
}

/// Decode an `eth_signTransaction` JSON-RPC response body.
fn parse_sign_response(body: &str) -> Result<Bytes, ClientError> {
    let response: JsonRpcResponse<SignedTransactionResponse> = serde_json::from_str(body)
        .map_err(|e| ClientError::Other(format!("malformed signer-proxy response: {e}")))?;

    match (response.result, response.error) {
        (Some(result), _) => result
            .raw
            .parse()
            .map_err(|e| ClientError::Other(format!("invalid signed transaction: {e}"))),
        (None, Some(error)) => Err(ClientError::Other(format!(
            "JSON-RPC error {}: {}",
            error.code, error.message
        ))),
        (None, None) => Err(ClientError::Other(
            "JSON-RPC response has neither result nor error".to_string(),
        )),
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Signed transaction as returned by the proxy.
#[derive(Debug, Deserialize)]
struct SignedTransactionResponse {
    /// Hex-encoded EIP-2718 transaction
    raw: String,
}
