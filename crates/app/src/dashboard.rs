//! Dashboard presentation: overview tiles, the per-kind flow breakdown and
//! device summary cards.
//!
//! The per-kind breakdown is **not measured**. The snapshot only carries
//! totals; the breakdown splits them with fixed ratios and exists for display
//! only. Nothing should compute on it.

use wattdesk_domain::energy::{DeviceSummary, EnergySnapshot, StorageSummary};
use wattdesk_domain::format;
use wattdesk_domain::status::{DeviceStatus, EvMode};

/// Share of production attributed to solar panels.
pub const SOLAR_SHARE_OF_PRODUCTION: f64 = 0.7;
/// Share of production attributed to generators.
pub const GENERATOR_SHARE_OF_PRODUCTION: f64 = 0.3;
/// Share of consumption attributed to air conditioners and heaters.
pub const HVAC_SHARE_OF_CONSUMPTION: f64 = 0.6;
/// Share of storage flow attributed to batteries.
pub const BATTERY_SHARE_OF_STORAGE_FLOW: f64 = 0.6;
/// Share of storage flow attributed to electric vehicles.
pub const EV_SHARE_OF_STORAGE_FLOW: f64 = 0.4;
/// Net grid flow within this many watts of zero reads as balanced.
pub const GRID_BALANCE_THRESHOLD_W: f64 = 100.0;

/// Direction of the net grid flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridDirection {
    Importing,
    Exporting,
    Balanced,
}

impl GridDirection {
    /// Classify a net grid flow in watts.
    #[must_use]
    pub fn of(net_grid_flow_w: f64) -> Self {
        if net_grid_flow_w > GRID_BALANCE_THRESHOLD_W {
            Self::Importing
        } else if net_grid_flow_w < -GRID_BALANCE_THRESHOLD_W {
            Self::Exporting
        } else {
            Self::Balanced
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Importing => "Drawing from Grid",
            Self::Exporting => "Sending to Grid",
            Self::Balanced => "Balanced",
        }
    }
}

/// Estimated per-kind flows, in whole watts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowBreakdown {
    pub solar_w: f64,
    pub generator_w: f64,
    pub hvac_w: f64,
    pub battery_w: f64,
    pub ev_w: f64,
    pub net_grid_w: f64,
    pub grid: GridDirection,
}

impl FlowBreakdown {
    /// Split the snapshot totals with the fixed display ratios.
    #[must_use]
    pub fn heuristic(snapshot: &EnergySnapshot) -> Self {
        Self {
            solar_w: (snapshot.current_production_w * SOLAR_SHARE_OF_PRODUCTION).round(),
            generator_w: (snapshot.current_production_w * GENERATOR_SHARE_OF_PRODUCTION).round(),
            hvac_w: (snapshot.current_consumption_w * HVAC_SHARE_OF_CONSUMPTION).round(),
            battery_w: (snapshot.current_storage_flow_w * BATTERY_SHARE_OF_STORAGE_FLOW).round(),
            ev_w: (snapshot.current_storage_flow_w * EV_SHARE_OF_STORAGE_FLOW).round(),
            net_grid_w: snapshot.net_grid_flow_w.round(),
            grid: GridDirection::of(snapshot.net_grid_flow_w),
        }
    }

    /// Labelled rows in display order.
    #[must_use]
    pub fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("Solar Panels", self.solar_w),
            ("Generators", self.generator_w),
            ("HVAC Systems", self.hvac_w),
            ("Battery Storage", self.battery_w),
            ("Electric Vehicles", self.ev_w),
            ("Net Flow", self.net_grid_w),
        ]
    }
}

/// One headline figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewTile {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub subtitle: Option<String>,
}

/// The four headline tiles: production, consumption, storage and grid.
#[must_use]
pub fn overview_tiles(snapshot: &EnergySnapshot) -> Vec<OverviewTile> {
    let storage = &snapshot.current_storage;
    vec![
        OverviewTile {
            label: "Total Production",
            value: whole(snapshot.current_production_w),
            unit: "W",
            subtitle: None,
        },
        OverviewTile {
            label: "Total Consumption",
            value: whole(snapshot.current_consumption_w),
            unit: "W",
            subtitle: None,
        },
        OverviewTile {
            label: "Storage Level",
            value: format!("{:.1}", storage.percentage),
            unit: "%",
            subtitle: Some(format!(
                "{} / {}",
                format::watt_hours_as_kwh(storage.current_level_wh),
                format::watt_hours_as_kwh(storage.total_capacity_wh)
            )),
        },
        OverviewTile {
            label: "Net Grid Flow",
            value: whole(snapshot.net_grid_flow_w.abs()),
            unit: "W",
            subtitle: Some(GridDirection::of(snapshot.net_grid_flow_w).label().to_string()),
        },
    ]
}

fn whole(value: f64) -> String {
    let rounded = value.round();
    format!("{:.0}", if rounded == 0.0 { 0.0 } else { rounded })
}

/// One labelled spec of a summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub label: &'static str,
    pub value: String,
}

/// Render-ready card for one device summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub name: String,
    pub type_label: &'static str,
    pub status_label: &'static str,
    /// Whether the badge uses the "active" colour.
    pub active: bool,
    pub specs: Vec<SpecRow>,
    /// Storage fill in percent, for the gauge of storage devices.
    pub storage_fill: Option<f64>,
}

/// Build the card for `summary`. Summaries of unknown kinds have no card.
#[must_use]
pub fn summary_card(summary: &DeviceSummary) -> Option<SummaryCard> {
    let kind = summary.kind()?;
    let status = summary.status()?;
    let mode = match summary {
        DeviceSummary::ElectricVehicle(ev) => ev.mode.as_ref(),
        _ => None,
    };
    let (status_label, active) = status_presentation(status, mode);
    Some(SummaryCard {
        name: summary.name().to_string(),
        type_label: kind.label(),
        status_label,
        active,
        specs: spec_rows(summary),
        storage_fill: match summary {
            DeviceSummary::Battery(storage) | DeviceSummary::ElectricVehicle(storage) => {
                storage_fill(storage)
            }
            _ => None,
        },
    })
}

/// Cards for every summary of a known kind, in server order.
#[must_use]
pub fn summary_cards(summaries: &[DeviceSummary]) -> Vec<SummaryCard> {
    summaries.iter().filter_map(summary_card).collect()
}

/// Vehicles report their mode; everything else reports online/offline.
fn status_presentation(status: &DeviceStatus, mode: Option<&EvMode>) -> (&'static str, bool) {
    match mode {
        Some(EvMode::Charging) => ("Charging", true),
        Some(EvMode::Discharging) => ("Discharging", true),
        Some(_) => ("Disconnected", false),
        None if *status == DeviceStatus::Online => ("Online", true),
        None => ("Offline", false),
    }
}

fn spec_rows(summary: &DeviceSummary) -> Vec<SpecRow> {
    let row = |label, value| SpecRow { label, value };
    match summary {
        DeviceSummary::SolarPanel(panel) => vec![
            row("Max Output", format::watts(panel.max_capacity_w)),
            row("Efficiency", format::fraction_as_percent(panel.efficiency)),
        ],
        DeviceSummary::Generator(generator) => {
            vec![row("Rated Output", format::watts(generator.rated_output_w))]
        }
        DeviceSummary::AirConditioner(load) | DeviceSummary::Heater(load) => {
            vec![row("Rated Power", format::watts(load.rated_power_w))]
        }
        DeviceSummary::Battery(storage) | DeviceSummary::ElectricVehicle(storage) => vec![
            row("Capacity", format::kilowatt_hours(storage.capacity_kwh)),
            row("Current Charge", format::kilowatt_hours(storage.current_charge_kwh)),
            row("Charge Level", format::percent(storage.charge_percentage)),
        ],
        DeviceSummary::Unknown => Vec::new(),
    }
}

/// Display-only fill level. The server-reported `charge_percentage` stays
/// authoritative for the "Charge Level" figure.
fn storage_fill(storage: &StorageSummary) -> Option<f64> {
    (storage.capacity_kwh > 0.0)
        .then(|| (storage.current_charge_kwh / storage.capacity_kwh * 100.0).clamp(0.0, 100.0))
}
