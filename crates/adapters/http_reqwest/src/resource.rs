//! REST collections of the remote service.

use wattdesk_domain::device::DeviceKind;
use wattdesk_domain::id::RecordId;

/// One REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    /// Every device regardless of kind. Read and delete only.
    Devices,
    Batteries,
    ElectricVehicles,
    SolarPanels,
    Generators,
    AirConditioners,
    Heaters,
}

impl Resource {
    /// The collection of a device kind.
    #[must_use]
    pub fn for_kind(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Battery => Self::Batteries,
            DeviceKind::ElectricVehicle => Self::ElectricVehicles,
            DeviceKind::SolarPanel => Self::SolarPanels,
            DeviceKind::Generator => Self::Generators,
            DeviceKind::AirConditioner => Self::AirConditioners,
            DeviceKind::Heater => Self::Heaters,
        }
    }

    /// Path segment of the collection.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Devices => "devices",
            Self::Batteries => "batteries",
            Self::ElectricVehicles => "electric-vehicles",
            Self::SolarPanels => "solar-panels",
            Self::Generators => "generators",
            Self::AirConditioners => "air-conditioners",
            Self::Heaters => "heaters",
        }
    }

    /// Collection path, e.g. `batteries/`.
    #[must_use]
    pub fn collection_path(self) -> String {
        format!("{}/", self.segment())
    }

    /// Item path, e.g. `batteries/3/`.
    #[must_use]
    pub fn item_path(self, id: &RecordId) -> String {
        format!("{}/{id}/", self.segment())
    }
}
