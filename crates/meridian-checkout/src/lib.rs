//! # meridian-checkout: Sale Submission for Meridian POS
//!
//! Turns a finished cart into a sale-submission request and delivers it to
//! the backend sales-recording endpoint.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  meridian-core::Cart                                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌───────────────┐    ┌───────────────┐    ┌──────────────────────┐    │
//! │  │   Register    │───►│  SaleRequest  │───►│  SalesApi            │    │
//! │  │ (register.rs) │    │ (payload.rs)  │    │  (api.rs)            │    │
//! │  │               │    │               │    │                      │    │
//! │  │ Owns the cart │    │ Wire contract │    │ HTTP POST /sales     │    │
//! │  │ Guards double │    │ snake_case    │    │ via reqwest          │    │
//! │  │ checkout      │    │ minor units   │    │                      │    │
//! │  └───────────────┘    └───────────────┘    └──────────────────────┘    │
//! │                                                                         │
//! │  On acknowledged success: cart cleared (Open → Empty)                   │
//! │  On any failure: cart untouched, error surfaced, NO automatic retry     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`register`] - One sale session: cart ownership + checkout orchestration
//! - [`payload`] - `SaleRequest` / `SaleAck` wire types
//! - [`api`] - `SalesApi` trait and the `reqwest`-backed implementation
//! - [`config`] - Endpoint configuration (TOML + env override)
//! - [`error`] - `CheckoutError`

pub mod api;
pub mod config;
pub mod error;
pub mod payload;
pub mod register;

pub use api::{HttpSalesApi, SalesApi};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use payload::{SaleAck, SaleLine, SaleRequest};
pub use register::{Register, RegisterState};
