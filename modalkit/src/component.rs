//! Modal components and the context handed to them.

use std::sync::Arc;

use modaldom::{Element, Key, Modifiers};

use crate::modals::Modals;
use crate::request::{ModalId, ModalRequest, Response};

/// A loaded modal implementation.
///
/// One component serves every request opened under its name.
pub trait ModalComponent: Send + Sync {
    /// Render the content for a request. The render surface wraps the
    /// result in the request's overlay region.
    fn render(&self, request: &ModalRequest) -> Element;

    /// Handle a key the focus trap did not consume.
    ///
    /// Returns true if the key was handled.
    fn on_key(
        &self,
        request: &ModalRequest,
        focused: Option<&str>,
        key: Key,
        modifiers: Modifiers,
        mx: &ModalContext,
    ) -> bool {
        let _ = (request, focused, key, modifiers, mx);
        false
    }
}

/// Shared handle to a loaded component.
pub type ComponentHandle = Arc<dyn ModalComponent>;

/// Context passed to component handlers.
///
/// Provides the ability to close the modal and return a result.
#[derive(Clone)]
pub struct ModalContext {
    id: ModalId,
    modals: Modals,
}

impl ModalContext {
    pub(crate) fn new(id: ModalId, modals: Modals) -> Self {
        Self { id, modals }
    }

    /// The request this context belongs to.
    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Close the modal and return a result.
    ///
    /// Only the top of the stack can be closed; if another modal has been
    /// opened over this one the call is ignored.
    pub fn close(&self, response: Response) -> bool {
        self.modals.close_if_top(self.id, response)
    }

    /// Close the modal without a response.
    pub fn dismiss(&self) -> bool {
        self.close(None)
    }

    /// Check if the modal has been closed.
    pub fn is_closed(&self) -> bool {
        self.modals.get_by_id(self.id).is_none()
    }

    /// The handle owning the stack, for opening nested modals.
    pub fn modals(&self) -> &Modals {
        &self.modals
    }
}
