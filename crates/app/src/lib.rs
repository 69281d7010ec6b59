//! # wattdesk-app
//!
//! Application layer — view models, the dashboard poller, per-page bindings
//! and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `RecordSource` — list / create / update / delete for one record type
//!   - `DashboardSource` — the combined energy snapshot + device summary query
//! - Provide the **generic record view model** driving every device page and
//!   the user administration page (list, sort, cards, form lifecycle)
//! - Provide the **dashboard poller**, a cancellable background refresh task
//! - Provide the declarative **page bindings** (schemas, formatters, validators)
//!
//! ## Dependency rule
//! Depends on `wattdesk-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod bindings;
pub mod dashboard;
pub mod form;
pub mod poller;
pub mod ports;
pub mod record;
pub mod schema;
pub mod view_model;
