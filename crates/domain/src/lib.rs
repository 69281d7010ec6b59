//! # wattdesk-domain
//!
//! Pure domain model for the wattdesk energy-device console.
//!
//! ## Responsibilities
//! - Foundational types: opaque record identifiers, error conventions, timestamps
//! - Define **Devices**: a shared base shape with one payload per variant
//!   (battery, electric vehicle, solar panel, generator, air conditioner, heater)
//! - Define **Users** and the write [`Access`](user::Access) they carry
//! - Define the dashboard **energy snapshot** and polymorphic device summaries
//! - Unit-aware display formatting shared by every page
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod energy;
pub mod format;
pub mod stats;
pub mod status;
pub mod user;
