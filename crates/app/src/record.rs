//! The view of a record every list page relies on.

use serde::Serialize;
use serde_json::{Map, Value};

use wattdesk_domain::device::Device;
use wattdesk_domain::id::RecordId;
use wattdesk_domain::status::DeviceStatus;
use wattdesk_domain::time::Timestamp;
use wattdesk_domain::user::User;

/// A listable, editable record.
///
/// Pages read record fields by key (the same keys the server uses), so a
/// record must serialize to a JSON object.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Server identifier.
    fn id(&self) -> &RecordId;

    /// Card title and sort key.
    fn display_name(&self) -> &str;

    /// Owner line of the card, when the record has an owner.
    fn owner_label(&self) -> Option<String> {
        None
    }

    /// Status badge, when the record has a status.
    fn status(&self) -> Option<&DeviceStatus> {
        None
    }

    /// Last modification time, when known.
    fn updated_at(&self) -> Option<&Timestamp> {
        None
    }

    /// Every serialized field, keyed by wire name.
    fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl<S> Record for Device<S>
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn owner_label(&self) -> Option<String> {
        Some(
            self.owner_username
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        )
    }

    fn status(&self) -> Option<&DeviceStatus> {
        Some(&self.status)
    }

    fn updated_at(&self) -> Option<&Timestamp> {
        self.updated_at.as_ref()
    }
}

impl Record for User {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.username
    }
}
