//! # wattdesk-adapter-http-reqwest
//!
//! HTTP adapter — talks to the remote energy-management service with
//! `reqwest`.
//!
//! ## Responsibilities
//! - REST calls for every record collection (list / get / create / partial
//!   update / delete), device statistics and the current user
//! - Token endpoints (obtain, refresh, verify) and bearer authentication
//! - The combined GraphQL dashboard query
//! - Implement the app ports: [`RestSource`] and [`UserSource`] for
//!   `RecordSource`, [`ApiClient`] for `DashboardSource`
//! - Persist the access token in a single file ([`TokenStore`])
//!
//! ## Dependency rule
//! Depends on `wattdesk-app` (for port traits) and `wattdesk-domain`.

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod resource;
pub mod source;
pub mod token;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use resource::Resource;
pub use source::{RestSource, UserSource};
pub use token::TokenStore;
