//! `trainwatch-status` -- read-only health endpoint served alongside a run.
//!
//! [`StatusServer`] binds the listener, serves [`routes::router`] on a
//! background task and shuts it down gracefully on [`StatusServer::stop`].

pub mod error;
pub mod routes;
pub mod server;

pub use error::StatusServerError;
pub use server::StatusServer;
