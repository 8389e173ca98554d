//! `trainwatch-pushgateway` -- best-effort delivery of per-epoch metrics to
//! a Prometheus Pushgateway.
//!
//! [`PushClient::push`] never fails visibly: every attempt produces a typed
//! [`PushOutcome`](client::PushOutcome) that the client consumes itself,
//! retrying up to three times with exponential backoff before giving up.
//! Failures surface only through logs and the client's counters.

pub mod client;
pub mod config;
pub mod error;
pub mod exposition;
pub mod registry;
pub mod transport;

pub use client::PushClient;
pub use config::PushConfig;
pub use error::{FailureKind, GatewayError, PushError};
pub use registry::{GaugeRegistry, GaugeSet};
pub use transport::{GatewayTransport, HttpGateway};
