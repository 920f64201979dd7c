//! HTTP client for the Batteries API
//!
//! Every request built through [`client::ApiClient`] carries the stored bearer
//! credential and funnels failures through a single reporting pipeline:
//! transport failures become notifications, application failures are split
//! between notifications and the bound form.

pub mod client;

pub use client::{
    ApiClient, ApiClientFactory, ApiClientFactoryBuilder, ClientConfig, ClientError,
    RequestStatus, StatusCell, TransportFailure,
};
