//! Generic record list view model.
//!
//! One [`RecordListViewModel`] drives one list page: it loads records from a
//! [`RecordSource`], keeps them sorted by name, renders cards through the
//! page's [`PageSchema`], and owns the create/edit form. Every failure is
//! turned into a single message in [`error`](RecordListViewModel::error);
//! nothing propagates out of the view model.
//!
//! Loads are numbered. When loads overlap, a response is applied only if no
//! newer load has already been applied, so a slow stale response can never
//! overwrite fresher data. After [`dispose`](RecordListViewModel::dispose)
//! responses still in flight are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use wattdesk_domain::error::WattdeskError;
use wattdesk_domain::format;
use wattdesk_domain::id::RecordId;
use wattdesk_domain::status::DeviceStatus;
use wattdesk_domain::user::Access;

use crate::form::{FormMode, FormState, build_payload};
use crate::ports::{Capabilities, RecordSource};
use crate::record::Record;
use crate::schema::PageSchema;

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    /// Whether the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// One labelled value of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub label: &'static str,
    pub value: String,
}

/// Render-ready card for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCard {
    pub id: RecordId,
    pub title: String,
    pub owner: Option<String>,
    /// Uppercase status, when the record has one.
    pub badge: Option<String>,
    pub rows: Vec<CardRow>,
    /// Local "updated" time or a dash.
    pub updated: String,
}

struct ListState<R> {
    records: Vec<R>,
    /// Indices into `records`, sorted by lowercase display name.
    order: Vec<usize>,
    in_flight: usize,
    applied_load: u64,
    error: Option<String>,
    form: Option<FormState>,
    submitting: bool,
    disposed: bool,
}

impl<R: Record> ListState<R> {
    fn replace(&mut self, records: Vec<R>) {
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by_cached_key(|&index| records[index].display_name().to_lowercase());
        self.records = records;
        self.order = order;
    }
}

/// Releases a pending-operation marker (an in-flight load, the submitting
/// flag) when the operation finishes or its future is dropped.
struct Pending<'a, R> {
    state: &'a Mutex<ListState<R>>,
    release: fn(&mut ListState<R>),
}

impl<R> Drop for Pending<'_, R> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        (self.release)(&mut state);
    }
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            order: Vec::new(),
            in_flight: 0,
            applied_load: 0,
            error: None,
            form: None,
            submitting: false,
            disposed: false,
        }
    }
}

/// State and actions of one list page.
pub struct RecordListViewModel<S: RecordSource> {
    source: S,
    schema: PageSchema,
    access: Access,
    next_load: AtomicU64,
    state: Mutex<ListState<S::Record>>,
}

impl<S: RecordSource> RecordListViewModel<S> {
    /// Create a view model. Nothing is fetched until [`load`](Self::load).
    pub fn new(source: S, schema: PageSchema, access: Access) -> Self {
        Self {
            source,
            schema,
            access,
            next_load: AtomicU64::new(0),
            state: Mutex::new(ListState::default()),
        }
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    pub fn access(&self) -> Access {
        self.access
    }

    fn pending(&self, release: fn(&mut ListState<S::Record>)) -> Pending<'_, S::Record> {
        Pending {
            state: &self.state,
            release,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<S::Record>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `apply` on the state unless the view model has been disposed.
    fn update<T>(&self, apply: impl FnOnce(&mut ListState<S::Record>) -> T) -> Option<T> {
        let mut state = self.lock();
        if state.disposed {
            return None;
        }
        Some(apply(&mut state))
    }

    /// Fetch the record list and replace the current one.
    ///
    /// Success clears the error; failure keeps the previous records and sets
    /// the error.
    #[tracing::instrument(skip(self), fields(page = self.schema.title))]
    pub async fn load(&self) {
        let seq = self.next_load.fetch_add(1, Ordering::Relaxed) + 1;
        if self.update(|state| state.in_flight += 1).is_none() {
            return;
        }
        let pending = self.pending(|state| state.in_flight -= 1);
        let result = self.source.list().await;
        drop(pending);
        self.update(|state| {
            if seq < state.applied_load {
                tracing::debug!(seq, applied = state.applied_load, "dropping stale list response");
                return;
            }
            state.applied_load = seq;
            match result {
                Ok(records) => {
                    tracing::debug!(count = records.len(), "records loaded");
                    state.replace(records);
                    state.error = None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load records");
                    state.error = Some(err.user_message());
                }
            }
        });
    }

    /// Whether any load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// The current error message, if any.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Records in the order the server returned them.
    pub fn records(&self) -> Vec<S::Record> {
        self.lock().records.clone()
    }

    /// Records sorted by case-insensitive name.
    pub fn sorted_records(&self) -> Vec<S::Record> {
        let state = self.lock();
        state
            .order
            .iter()
            .map(|&index| state.records[index].clone())
            .collect()
    }

    /// Cards for every record, in sorted order.
    pub fn cards(&self) -> Vec<RecordCard> {
        self.sorted_records()
            .iter()
            .map(|record| self.card(record))
            .collect()
    }

    fn card(&self, record: &S::Record) -> RecordCard {
        let fields = record.fields();
        RecordCard {
            id: record.id().clone(),
            title: record.display_name().to_string(),
            owner: record.owner_label(),
            badge: record.status().map(DeviceStatus::badge),
            rows: self
                .schema
                .display
                .iter()
                .map(|field| CardRow {
                    label: field.label,
                    value: field.render(&fields),
                })
                .collect(),
            updated: format::timestamp(record.updated_at()),
        }
    }

    fn capabilities(&self) -> Capabilities {
        self.source.capabilities()
    }

    /// Whether the "add" action is offered.
    pub fn can_create(&self) -> bool {
        self.access.can_write() && self.capabilities().create && !self.schema.form.is_empty()
    }

    /// Whether the "edit" action is offered.
    pub fn can_edit(&self) -> bool {
        self.access.can_write() && self.capabilities().update && !self.schema.form.is_empty()
    }

    /// Whether the "delete" action is offered.
    pub fn can_delete(&self) -> bool {
        self.access.can_write() && self.capabilities().delete
    }

    /// The open form, if any.
    pub fn form(&self) -> Option<FormState> {
        self.lock().form.clone()
    }

    /// Heading of the open form.
    pub fn form_title(&self) -> Option<String> {
        self.lock().form.as_ref().map(|form| form.title(&self.schema))
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Open a blank form seeded with field defaults. No-op unless
    /// [`can_create`](Self::can_create).
    pub fn open_create(&self) {
        if !self.can_create() {
            return;
        }
        let form = FormState::create(&self.schema);
        self.update(|state| state.form = Some(form));
    }

    /// Open a form pre-filled from `record`. No-op unless
    /// [`can_edit`](Self::can_edit).
    pub fn open_edit(&self, record: &S::Record) {
        if !self.can_edit() {
            return;
        }
        let form = FormState::edit(
            &self.schema,
            record.id().clone(),
            record.display_name().to_string(),
            &record.fields(),
        );
        self.update(|state| state.form = Some(form));
    }

    /// Set one input of the open form. No-op when no form is open.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownField`](wattdesk_domain::error::ValidationError::UnknownField)
    /// when `key` is not a field of this page's form.
    pub fn set_field(
        &self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), wattdesk_domain::error::ValidationError> {
        if self.schema.form_field(key).is_none() {
            return Err(wattdesk_domain::error::ValidationError::UnknownField {
                key: key.to_string(),
            });
        }
        let value = value.into();
        self.update(|state| {
            if let Some(form) = state.form.as_mut() {
                form.values.insert(key.to_string(), value);
            }
        });
        Ok(())
    }

    /// Discard the open form.
    pub fn close_form(&self) {
        self.update(|state| state.form = None);
    }

    /// Validate and send the open form, then reload on success.
    ///
    /// Returns whether the record was saved. Does nothing for read-only
    /// sessions, when no form is open, or while a submission is running.
    /// On failure the form stays open and the error is set.
    #[tracing::instrument(skip(self), fields(page = self.schema.title))]
    pub async fn submit(&self) -> bool {
        if !self.access.can_write() {
            tracing::debug!("ignoring submit from read-only session");
            return false;
        }
        let prepared = self.update(|state| {
            if state.submitting {
                return None;
            }
            let form = state.form.as_ref()?;
            match build_payload(&self.schema, &form.values, &form.mode) {
                Ok(payload) => {
                    let mode = form.mode.clone();
                    state.submitting = true;
                    Some((mode, payload))
                }
                Err(err) => {
                    state.error = Some(WattdeskError::from(err).user_message());
                    None
                }
            }
        });
        let Some((mode, payload)) = prepared.flatten() else {
            return false;
        };

        let pending = self.pending(|state| state.submitting = false);
        let result = match &mode {
            FormMode::Create => self.source.create(payload).await,
            FormMode::Edit { id, .. } => self.source.update(id, payload).await,
        };
        drop(pending);

        let saved = self
            .update(|state| match result {
                Ok(()) => {
                    state.form = None;
                    true
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to save record");
                    state.error = Some(err.user_message());
                    false
                }
            })
            .unwrap_or(false);
        if saved {
            self.load().await;
        }
        saved
    }

    /// Ask for confirmation, delete `record`, then reload.
    ///
    /// Returns whether the record was deleted. Declining the prompt makes no
    /// request.
    #[tracing::instrument(skip(self, record, confirm), fields(page = self.schema.title, id = %record.id()))]
    pub async fn request_delete(&self, record: &S::Record, confirm: &impl Confirm) -> bool {
        if !self.can_delete() {
            return false;
        }
        let prompt = format!(
            "Delete \"{}\"? This cannot be undone.",
            record.display_name()
        );
        if !confirm.confirm(&prompt) {
            return false;
        }
        match self.source.delete(record.id()).await {
            Ok(()) => {
                self.load().await;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to delete record");
                self.update(|state| state.error = Some(err.user_message()));
                false
            }
        }
    }

    /// Stop applying results. Responses still in flight are dropped.
    pub fn dispose(&self) {
        self.lock().disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }
}
