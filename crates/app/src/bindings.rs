//! Page bindings — one [`PageSchema`](crate::schema::PageSchema) per record
//! type.
//!
//! Bindings are pure configuration. Wiring a binding to a source and an
//! access level is the caller's job.

pub mod batteries;
pub mod climate;
pub mod common;
pub mod electric_vehicles;
pub mod generators;
pub mod solar_panels;
pub mod users;

use wattdesk_domain::device::DeviceKind;

use crate::schema::PageSchema;

/// The page schema of a device kind.
#[must_use]
pub fn for_kind(kind: DeviceKind) -> PageSchema {
    match kind {
        DeviceKind::Battery => batteries::schema(),
        DeviceKind::ElectricVehicle => electric_vehicles::schema(),
        DeviceKind::SolarPanel => solar_panels::schema(),
        DeviceKind::Generator => generators::schema(),
        DeviceKind::AirConditioner => climate::air_conditioners(),
        DeviceKind::Heater => climate::heaters(),
    }
}
