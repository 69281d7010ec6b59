//! Energy snapshot and device summaries read by the dashboard.
//!
//! Both come from a single GraphQL query whose fields are camelCase on the
//! wire. Device summaries are polymorphic and discriminated by the
//! `__typename` tag.

use serde::{Deserialize, Deserializer, Serialize};

use crate::device::DeviceKind;
use crate::id::RecordId;
use crate::status::{DeviceStatus, EvMode};

/// Point-in-time aggregate energy reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySnapshot {
    /// Watts being produced.
    #[serde(rename = "currentProduction")]
    pub current_production_w: f64,
    /// Watts being consumed.
    #[serde(rename = "currentConsumption")]
    pub current_consumption_w: f64,
    pub current_storage: StorageLevel,
    /// Watts into (+) or out of (−) storage.
    #[serde(rename = "currentStorageFlow")]
    pub current_storage_flow_w: f64,
    /// Watts imported from (+) or exported to (−) the grid.
    #[serde(rename = "netGridFlow")]
    pub net_grid_flow_w: f64,
}

/// Aggregate storage level across batteries and vehicles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLevel {
    pub total_capacity_wh: f64,
    pub current_level_wh: f64,
    /// Already expressed out of 100.
    pub percentage: f64,
}

/// Dashboard summary of a solar panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPanelSummary {
    pub id: RecordId,
    pub name: String,
    pub status: DeviceStatus,
    pub panel_area_m2: f64,
    pub efficiency: f64,
    pub max_capacity_w: f64,
}

/// Dashboard summary of a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSummary {
    pub id: RecordId,
    pub name: String,
    pub status: DeviceStatus,
    pub rated_output_w: f64,
}

/// Dashboard summary of a battery or an electric vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    pub id: RecordId,
    pub name: String,
    pub status: DeviceStatus,
    pub capacity_kwh: f64,
    pub current_charge_kwh: f64,
    pub max_charge_rate_kw: f64,
    pub max_discharge_rate_kw: f64,
    pub charge_percentage: f64,
    /// Only electric vehicles report a mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<EvMode>,
}

/// Dashboard summary of an air conditioner or a heater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateLoadSummary {
    pub id: RecordId,
    pub name: String,
    pub status: DeviceStatus,
    pub rated_power_w: f64,
    pub min_power_w: f64,
    pub max_power_w: f64,
}

/// A polymorphic device summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum DeviceSummary {
    #[serde(rename = "SolarPanelType")]
    SolarPanel(SolarPanelSummary),
    #[serde(rename = "GeneratorType")]
    Generator(GeneratorSummary),
    #[serde(rename = "BatteryType")]
    Battery(StorageSummary),
    #[serde(rename = "ElectricVehicleType")]
    ElectricVehicle(StorageSummary),
    #[serde(rename = "AirConditionerType")]
    AirConditioner(ClimateLoadSummary),
    #[serde(rename = "HeaterType")]
    Heater(ClimateLoadSummary),
    /// A type tag this client does not know.
    #[serde(other)]
    Unknown,
}

impl DeviceSummary {
    /// The device kind, when the tag is known.
    #[must_use]
    pub fn kind(&self) -> Option<DeviceKind> {
        match self {
            Self::SolarPanel(_) => Some(DeviceKind::SolarPanel),
            Self::Generator(_) => Some(DeviceKind::Generator),
            Self::Battery(_) => Some(DeviceKind::Battery),
            Self::ElectricVehicle(_) => Some(DeviceKind::ElectricVehicle),
            Self::AirConditioner(_) => Some(DeviceKind::AirConditioner),
            Self::Heater(_) => Some(DeviceKind::Heater),
            Self::Unknown => None,
        }
    }

    /// Identifier, when the tag is known.
    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::SolarPanel(s) => Some(&s.id),
            Self::Generator(s) => Some(&s.id),
            Self::Battery(s) | Self::ElectricVehicle(s) => Some(&s.id),
            Self::AirConditioner(s) | Self::Heater(s) => Some(&s.id),
            Self::Unknown => None,
        }
    }

    /// Display name (empty for unknown summaries).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::SolarPanel(s) => &s.name,
            Self::Generator(s) => &s.name,
            Self::Battery(s) | Self::ElectricVehicle(s) => &s.name,
            Self::AirConditioner(s) | Self::Heater(s) => &s.name,
            Self::Unknown => "",
        }
    }

    /// Reported status, when the tag is known.
    #[must_use]
    pub fn status(&self) -> Option<&DeviceStatus> {
        match self {
            Self::SolarPanel(s) => Some(&s.status),
            Self::Generator(s) => Some(&s.status),
            Self::Battery(s) | Self::ElectricVehicle(s) => Some(&s.status),
            Self::AirConditioner(s) | Self::Heater(s) => Some(&s.status),
            Self::Unknown => None,
        }
    }
}

/// Result of the combined dashboard query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(rename = "energyStats")]
    pub snapshot: EnergySnapshot,
    #[serde(rename = "allDevices", default, deserialize_with = "null_as_empty")]
    pub devices: Vec<DeviceSummary>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DeviceSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DeviceSummary>>::deserialize(deserializer)?.unwrap_or_default())
}
