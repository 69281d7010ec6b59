//! Device — a home-energy appliance owned by a user.
//!
//! Every device variant shares the same base fields; the variant-specific
//! payload is the `S` parameter of [`Device`] and is flattened on the wire.
//! The six concrete variants are exposed as type aliases so callers write
//! `Battery`, `Heater`, … instead of spelling out the payload.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::status::{DeviceStatus, EvMode};
use crate::time::Timestamp;

/// A device record: shared base fields plus a variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device<S> {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub status: DeviceStatus,
    /// Primary key of the owning user.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<RecordId>,
    /// Username of the owning user.
    #[serde(rename = "user_username", default)]
    pub owner_username: Option<String>,
    /// Variant name as reported by the server (e.g. `"Battery"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub spec: S,
}

/// The six concrete device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Battery,
    ElectricVehicle,
    SolarPanel,
    Generator,
    AirConditioner,
    Heater,
}

impl DeviceKind {
    /// Every kind, in navigation order.
    pub const ALL: [Self; 6] = [
        Self::SolarPanel,
        Self::Generator,
        Self::Battery,
        Self::ElectricVehicle,
        Self::AirConditioner,
        Self::Heater,
    ];

    /// Human-readable singular label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Battery => "Battery",
            Self::ElectricVehicle => "Electric Vehicle",
            Self::SolarPanel => "Solar Panel",
            Self::Generator => "Generator",
            Self::AirConditioner => "Air Conditioner",
            Self::Heater => "Heater",
        }
    }
}

/// Stationary battery payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    pub capacity_kwh: f64,
    pub current_charge_kwh: f64,
    /// Server-computed charge level in percent (0–100). Read-only.
    #[serde(default)]
    pub charge_percentage: f64,
    pub max_charge_rate_kw: f64,
    pub max_discharge_rate_kw: f64,
}

/// Electric vehicle payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricVehicleSpec {
    pub capacity_kwh: f64,
    pub current_charge_kwh: f64,
    /// Server-computed charge level in percent (0–100). Read-only.
    #[serde(default)]
    pub charge_percentage: f64,
    pub max_charge_rate_kw: f64,
    pub max_discharge_rate_kw: f64,
    #[serde(default)]
    pub mode: EvMode,
    #[serde(default)]
    pub last_seen_at: Option<Timestamp>,
    pub driving_efficiency_kwh_per_hour: f64,
}

/// Solar panel payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPanelSpec {
    pub panel_area_m2: f64,
    /// Conversion efficiency as a 0–1 fraction.
    pub efficiency: f64,
    pub max_capacity_w: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Generator payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    pub rated_output_w: f64,
}

/// Power envelope shared by air conditioners and heaters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateLoadSpec {
    pub rated_power_w: f64,
    pub min_power_w: f64,
    pub max_power_w: f64,
}

/// Any extra fields of a record read from the generic device list.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

pub type Battery = Device<BatterySpec>;
pub type ElectricVehicle = Device<ElectricVehicleSpec>;
pub type SolarPanel = Device<SolarPanelSpec>;
pub type Generator = Device<GeneratorSpec>;
pub type AirConditioner = Device<ClimateLoadSpec>;
pub type Heater = Device<ClimateLoadSpec>;
/// A device read from the base `devices` endpoint, variant fields kept open.
pub type GenericDevice = Device<ExtraFields>;
