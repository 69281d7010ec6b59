//! [`RecordSource`] implementations over the REST API.

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use wattdesk_app::ports::{Capabilities, Payload, RecordSource};
use wattdesk_app::record::Record;
use wattdesk_domain::error::WattdeskError;
use wattdesk_domain::id::RecordId;
use wattdesk_domain::user::{Access, User};

use crate::client::ApiClient;
use crate::resource::Resource;

/// One REST collection decoded as `R`.
pub struct RestSource<R> {
    client: ApiClient,
    resource: Resource,
    record: PhantomData<fn() -> R>,
}

impl<R> RestSource<R> {
    #[must_use]
    pub fn new(client: ApiClient, resource: Resource) -> Self {
        Self {
            client,
            resource,
            record: PhantomData,
        }
    }
}

impl<R: Record + DeserializeOwned> RecordSource for RestSource<R> {
    type Record = R;

    fn capabilities(&self) -> Capabilities {
        match self.resource {
            Resource::Devices => Capabilities {
                delete: true,
                ..Capabilities::READ_ONLY
            },
            _ => Capabilities::ALL,
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<R>, WattdeskError>> + Send {
        let client = self.client.clone();
        let resource = self.resource;
        async move { client.list(resource).await.map_err(WattdeskError::from) }
    }

    fn create(&self, payload: Payload) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        let client = self.client.clone();
        let resource = self.resource;
        async move {
            client
                .create(resource, &payload)
                .await
                .map_err(WattdeskError::from)
        }
    }

    fn update(
        &self,
        id: &RecordId,
        payload: Payload,
    ) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        let client = self.client.clone();
        let resource = self.resource;
        let id = id.clone();
        async move {
            client
                .update(resource, &id, &payload)
                .await
                .map_err(WattdeskError::from)
        }
    }

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        let client = self.client.clone();
        let resource = self.resource;
        let id = id.clone();
        async move {
            client
                .delete(resource, &id)
                .await
                .map_err(WattdeskError::from)
        }
    }
}

/// The user collection, scoped by access: staff see every account, everyone
/// else sees only their own.
pub struct UserSource {
    users: RestSource<User>,
    access: Access,
}

impl UserSource {
    #[must_use]
    pub fn new(client: ApiClient, access: Access) -> Self {
        Self {
            users: RestSource::new(client, Resource::Users),
            access,
        }
    }
}

impl RecordSource for UserSource {
    type Record = User;

    fn capabilities(&self) -> Capabilities {
        if self.access.can_write() {
            Capabilities::ALL
        } else {
            Capabilities::READ_ONLY
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<User>, WattdeskError>> + Send {
        let client = self.users.client.clone();
        let staff = self.access.can_write();
        async move {
            let users = if staff {
                client.list(Resource::Users).await
            } else {
                client.me().await.map(|me| vec![me])
            };
            users.map_err(WattdeskError::from)
        }
    }

    fn create(&self, payload: Payload) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        self.users.create(payload)
    }

    fn update(
        &self,
        id: &RecordId,
        payload: Payload,
    ) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        self.users.update(id, payload)
    }

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), WattdeskError>> + Send {
        self.users.delete(id)
    }
}
