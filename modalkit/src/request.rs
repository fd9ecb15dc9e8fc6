//! Modal requests: identity, options and the pending close response.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::ResponseError;

/// Value a modal hands back when it closes. `None` is the empty response.
pub type Response = Option<Value>;

/// Unique identifier for an open modal request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ModalId(Uuid);

impl ModalId {
    /// Create a new unique modal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ModalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request behavior flags.
///
/// Unknown keys are kept in `extra` and forwarded to the component untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOptions {
    /// Close the modal when Escape is pressed while it is active.
    pub close_on_escape: bool,
    /// Close the modal when its overlay (not its content) is clicked.
    pub close_on_overlay_click: bool,
    /// Extension fields, unused by the stack itself.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_overlay_click: true,
            extra: Map::new(),
        }
    }
}

impl ModalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    pub fn close_on_overlay_click(mut self, enabled: bool) -> Self {
        self.close_on_overlay_click = enabled;
        self
    }

    /// Attach an extension field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// One entry of the modal stack.
///
/// Requests are immutable once created; only the stack flips `active`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRequest {
    id: ModalId,
    name: String,
    payload: Value,
    options: ModalOptions,
    active: bool,
}

impl ModalRequest {
    pub(crate) fn new(name: String, payload: Value, options: ModalOptions) -> Self {
        Self {
            id: ModalId::new(),
            name,
            payload,
            options,
            active: true,
        }
    }

    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Logical name used to resolve the component.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    /// True only for the topmost request.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Future resolving with the response of a modal once it is closed.
///
/// Resolves with `None` if the modal was dismissed without a response or
/// if the owning stack went away.
#[must_use = "the response is only observable through this future"]
pub struct PendingResponse {
    id: ModalId,
    rx: oneshot::Receiver<Response>,
}

impl PendingResponse {
    pub(crate) fn channel(id: ModalId) -> (oneshot::Sender<Response>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { id, rx })
    }

    /// The request this future belongs to.
    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Take the response if the modal is already closed.
    pub fn try_take(&mut self) -> Option<Response> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(None),
        }
    }

    /// Wait for the response and decode it into `T`.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<Option<T>, ResponseError> {
        match self.await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

impl Future for PendingResponse {
    type Output = Response;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.rx).poll(cx).map(|result| {
            result.unwrap_or_else(|_| {
                log::debug!("modal {id} dropped without a response");
                None
            })
        })
    }
}

impl fmt::Debug for PendingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResponse").field("id", &self.id).finish()
    }
}
