//! # Sales API Client
//!
//! The `SalesApi` trait is the seam between checkout orchestration and the
//! network: the register is generic over it, production code plugs in
//! [`HttpSalesApi`], and tests plug in an in-process double.
//!
//! ## Request/Response Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sale Submission Flow                                │
//! │                                                                         │
//! │  SaleRequest                                                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  POST {endpoint_url}/sales  (JSON body)                                 │
//! │      │                                                                  │
//! │      ├── connect/timeout failure ──► CheckoutError::Transport           │
//! │      │                                                                  │
//! │      ├── HTTP 4xx/5xx ────────────► CheckoutError::UnexpectedStatus     │
//! │      │                                                                  │
//! │      └── HTTP 2xx ──► parse SaleAck ──► returned to the register        │
//! │                        (ack.success=false is decided THERE, not here)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::payload::{SaleAck, SaleRequest};

// =============================================================================
// SalesApi Trait
// =============================================================================

/// A transport capable of delivering a sale submission.
///
/// Implementations report transport-level failures as errors; an
/// application-level rejection travels back inside the [`SaleAck`] so the
/// register can decide what to do with the cart.
pub trait SalesApi {
    /// Submits a sale and returns the endpoint's acknowledgement.
    fn submit_sale(
        &self,
        request: &SaleRequest,
    ) -> impl std::future::Future<Output = CheckoutResult<SaleAck>> + Send;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// `reqwest`-backed sales client.
#[derive(Debug, Clone)]
pub struct HttpSalesApi {
    client: Client,
    sales_url: Url,
}

impl HttpSalesApi {
    /// Builds a client from the checkout configuration.
    ///
    /// Fails fast on an unparseable endpoint URL so a misconfigured
    /// terminal is caught at startup, not at the first checkout.
    pub fn new(config: &CheckoutConfig) -> CheckoutResult<Self> {
        let base = Url::parse(&config.endpoint_url)
            .map_err(|e| CheckoutError::InvalidEndpoint(format!("{}: {}", config.endpoint_url, e)))?;
        let sales_url = base
            .join("sales")
            .map_err(|e| CheckoutError::InvalidEndpoint(e.to_string()))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(HttpSalesApi { client, sales_url })
    }

    /// The resolved sale-submission URL.
    pub fn sales_url(&self) -> &Url {
        &self.sales_url
    }
}

impl SalesApi for HttpSalesApi {
    async fn submit_sale(&self, request: &SaleRequest) -> CheckoutResult<SaleAck> {
        debug!(
            url = %self.sales_url,
            items = request.items.len(),
            total = %request.total_amount,
            "Submitting sale"
        );

        let response = self.client.post(self.sales_url.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Sales endpoint returned non-success status");
            return Err(CheckoutError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let ack: SaleAck = response.json().await?;
        Ok(ack)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_url_resolution() {
        let config = CheckoutConfig {
            endpoint_url: "https://pos.example.com/api/".to_string(),
            ..CheckoutConfig::default()
        };
        let api = HttpSalesApi::new(&config).unwrap();
        assert_eq!(api.sales_url().as_str(), "https://pos.example.com/api/sales");
    }

    #[test]
    fn test_invalid_endpoint_rejected_at_construction() {
        let config = CheckoutConfig {
            endpoint_url: "not a url".to_string(),
            ..CheckoutConfig::default()
        };
        let result = HttpSalesApi::new(&config);
        assert!(matches!(result, Err(CheckoutError::InvalidEndpoint(_))));
    }
}
