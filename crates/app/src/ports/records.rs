//! Record port — list and mutate one kind of record on the remote service.

use std::future::Future;
use std::sync::Arc;

use wattdesk_domain::error::WattdeskError;
use wattdesk_domain::id::RecordId;

use crate::record::Record;

/// Write body sent on create and update: only the keys the form projects.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Operations a source offers beyond listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    /// List, create, update and delete.
    pub const ALL: Self = Self {
        create: true,
        update: true,
        delete: true,
    };

    /// List only.
    pub const READ_ONLY: Self = Self {
        create: false,
        update: false,
        delete: false,
    };
}

/// Access to one record collection.
///
/// Only `list` is mandatory. The mutating operations default to
/// [`WattdeskError::Unsupported`] and must be mirrored by
/// [`capabilities`](RecordSource::capabilities) so callers can hide the
/// matching actions.
pub trait RecordSource: Send + Sync {
    /// Record type returned by this source.
    type Record: Record;

    /// Operations this source implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::READ_ONLY
    }

    /// Fetch every record visible to the current session.
    fn list(&self) -> impl Future<Output = Result<Vec<Self::Record>, WattdeskError>> + Send;

    /// Create a record from a projected payload. Any success answer counts
    /// as saved; callers reload to see the stored record.
    fn create(&self, _payload: Payload) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        async { Err(WattdeskError::Unsupported("create")) }
    }

    /// Partially update a record. Same success rule as
    /// [`create`](RecordSource::create).
    fn update(
        &self,
        _id: &RecordId,
        _payload: Payload,
    ) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        async { Err(WattdeskError::Unsupported("update")) }
    }

    /// Delete a record.
    fn delete(&self, _id: &RecordId) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        async { Err(WattdeskError::Unsupported("delete")) }
    }
}

impl<T: RecordSource> RecordSource for Arc<T> {
    type Record = T::Record;

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Self::Record>, WattdeskError>> + Send {
        (**self).list()
    }

    fn create(&self, payload: Payload) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        (**self).create(payload)
    }

    fn update(
        &self,
        id: &RecordId,
        payload: Payload,
    ) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        (**self).update(id, payload)
    }

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        (**self).delete(id)
    }
}
