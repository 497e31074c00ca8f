//! # Checkout Error Types
//!
//! Error types for the submission layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Session        │  │   Transport     │  │     Application         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  CheckoutIn-    │  │  Transport      │  │  Rejected               │ │
//! │  │    Progress     │  │  Unexpected-    │  │  (endpoint said no)     │ │
//! │  │  Cart(EmptyCart)│  │    Status       │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Configuration  │   Every variant is recoverable: the cart is       │
//! │  │                 │   preserved and the cashier decides what to do    │
//! │  │  InvalidEndpoint│   next (retry, edit the cart, cancel).            │
//! │  │  ConfigLoad-    │                                                   │
//! │  │    Failed       │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use meridian_core::CoreError;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout error type covering session, transport, and endpoint failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Session Errors
    // =========================================================================
    /// A checkout is already in flight for this register.
    ///
    /// The first submission must be acknowledged or fail before another
    /// can start; nothing is queued.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// Cart-level rule violation (empty cart, stock, validation).
    #[error(transparent)]
    Cart(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The configured sales endpoint URL is not usable.
    #[error("Invalid sales endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// Failed to load the checkout config file.
    #[error("Failed to load checkout config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network-level failure (connect, timeout, body read, JSON decode).
    #[error("Sales endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("Sales endpoint returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    // =========================================================================
    // Application Errors
    // =========================================================================
    /// The endpoint acknowledged the request but refused to record the sale.
    #[error("Sale rejected by endpoint: {message}")]
    Rejected { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CheckoutError::Rejected {
            message: "cashier unknown".to_string(),
        };
        assert_eq!(err.to_string(), "Sale rejected by endpoint: cashier unknown");

        let err = CheckoutError::UnexpectedStatus { status: 503 };
        assert_eq!(err.to_string(), "Sales endpoint returned HTTP 503");
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: CheckoutError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Cart is empty");
        assert!(matches!(err, CheckoutError::Cart(CoreError::EmptyCart)));
    }
}
