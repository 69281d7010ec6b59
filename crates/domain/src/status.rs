//! Enumerated device states that tolerate unknown values.
//!
//! The remote service owns these vocabularies. A value the client does not
//! recognise is kept verbatim in an `Other` variant and rendered as-is.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! define_passthrough_enum {
    (
        $(#[doc = $doc:expr])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value outside the known vocabulary, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Parse a wire value, case-insensitively for known values.
            #[must_use]
            pub fn parse(raw: &str) -> Self {
                $(
                    if raw.eq_ignore_ascii_case($wire) {
                        return Self::$variant;
                    }
                )+
                Self::Other(raw.to_string())
            }

            /// The canonical lowercase wire value (or the raw passthrough).
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

define_passthrough_enum!(
    /// Operational status of a device.
    DeviceStatus {
        #[default]
        Online => "online",
        Offline => "offline",
        Error => "error",
    }
);

define_passthrough_enum!(
    /// Energy direction of an electric vehicle.
    EvMode {
        Charging => "charging",
        Discharging => "discharging",
        #[default]
        Offline => "offline",
    }
);

impl DeviceStatus {
    /// Upper-cased badge text shown on device cards.
    #[must_use]
    pub fn badge(&self) -> String {
        self.as_str().to_uppercase()
    }
}
