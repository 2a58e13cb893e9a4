//! Etherscan-compatible explorer client for remote ABI lookups.

use super::types::ExplorerResponse;
use crate::abi::resolver::SchemaSource;
use crate::utils::config::ExplorerConfig;
use crate::utils::error::ExplorerError;
use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use log::{debug, warn};
use reqwest::blocking::Client;

/// Explorer status value for a successful call
const STATUS_OK: &str = "1";

/// Fetches verified contract ABIs from a block explorer
pub struct ExplorerClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl ExplorerClient {
    /// Create a new explorer client; every lookup is bounded by the configured timeout
    pub fn new(config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ExplorerError::RequestFailed)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the verified ABI of a contract
    ///
    /// # Errors
    /// * `ExplorerError::RequestFailed` - Network error or timeout
    /// * `ExplorerError::BadStatus` - Non-2xx HTTP status
    /// * `ExplorerError::NotFound` - Explorer reported failure or an empty ABI
    /// * `ExplorerError::InvalidAbi` - ABI string is not valid JSON ABI
    pub fn get_abi(&self, address: &Address) -> Result<JsonAbi, ExplorerError> {
        let checksummed = address.to_checksum(None);
        debug!("Looking up ABI for {}", checksummed);

        let mut query = vec![
            ("module", "contract"),
            ("action", "getabi"),
            ("address", checksummed.as_str()),
        ];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("apikey", key));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .map_err(ExplorerError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(ExplorerError::BadStatus(response.status().as_u16()));
        }

        let body: ExplorerResponse = response.json().map_err(ExplorerError::RequestFailed)?;
        parse_abi_response(body, &checksummed)
    }
}

impl SchemaSource for ExplorerClient {
    fn fetch_schema(&self, address: &Address) -> Option<JsonAbi> {
        match self.get_abi(address) {
            Ok(abi) => Some(abi),
            Err(ExplorerError::NotFound(msg)) => {
                debug!("No ABI found for {}: {}", address, msg);
                None
            }
            Err(e) => {
                warn!("ABI lookup for {} failed: {}", address, e);
                None
            }
        }
    }
}

/// Turn an explorer `getabi` response into a schema
///
/// **Private** - split out so response handling is testable offline
fn parse_abi_response(body: ExplorerResponse, address: &str) -> Result<JsonAbi, ExplorerError> {
    if body.status != STATUS_OK || body.result.is_empty() {
        return Err(ExplorerError::NotFound(format!(
            "{} ({})",
            address,
            if body.message.is_empty() { &body.result } else { &body.message }
        )));
    }

    let abi: JsonAbi = serde_json::from_str(&body.result)?;
    if abi.is_empty() {
        return Err(ExplorerError::NotFound(format!("{} (empty ABI)", address)));
    }
    Ok(abi)
}
