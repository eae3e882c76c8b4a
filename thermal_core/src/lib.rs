//! # thermal_core - Thermal Calculator Client
//!
//! `thermal_core` drives three heat-transfer calculators hosted by a remote
//! HTTP backend: composite wall conduction, straight fins and NTU heat
//! exchangers. The physics lives on the server; this crate validates what the
//! user typed, sends it, renders the reply and exports PDF reports.
//!
//! ## Design Philosophy
//!
//! - **Validate locally**: Nothing malformed leaves the client
//! - **JSON-First**: Requests, replies and reports are serde types
//! - **Rich Errors**: Validation, server and transport failures stay distinct
//! - **One request at a time**: A page never shows results from a stale reply
//!
//! ## Quick Start
//!
//! ```rust
//! use thermal_core::calculators::{Calculator, Fin, FinForm};
//!
//! let form = FinForm {
//!     p: "0.1".into(), ac: "0.0005".into(), l: "0.05".into(), k: "200".into(),
//!     h_conv: "25".into(), t_base: "373.15".into(), t_inf: "298.15".into(),
//! };
//! let input = Fin::validate(&form).unwrap();
//! let body = serde_json::to_string(&input).unwrap();
//! assert!(body.contains("\"T_base\":373.15"));
//! ```
//!
//! ## Modules
//!
//! - [`calculators`] - The three calculator pages and their field rules
//! - [`session`] - Per-page view-model state
//! - [`client`] - Calculate and export command handlers
//! - [`transport`] - HTTP transport to the backend
//! - [`protocol`] - Endpoints and reply decoding
//! - [`config`] - TOML configuration
//! - [`errors`] - Structured error types
//! - [`download`] - Atomic report saves

pub mod calculators;
pub mod chart;
pub mod client;
pub mod config;
pub mod download;
pub mod errors;
pub mod fields;
pub mod format;
pub mod protocol;
pub mod report;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types at crate root for convenience
pub use calculators::{Calculator, CompositeWall, Fin, HeatExchanger};
pub use client::CalcClient;
pub use config::ThermalConfig;
pub use errors::{ThermalError, ThermalResult};
pub use session::Session;
pub use transport::{HttpTransport, Transport};
