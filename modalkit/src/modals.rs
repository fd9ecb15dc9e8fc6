//! Shared handle owning the modal stack and the component registry.
//!
//! Create one `Modals` at application start and pass clones to whoever
//! needs to open or close dialogs. Every operation locks the stack for one
//! complete transition.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use modaldom::{Event, Key, Modifiers};
use serde_json::Value;

use crate::component::{ComponentHandle, ModalContext};
use crate::config::ModalConfig;
use crate::registry::ComponentRegistry;
use crate::request::{ModalId, ModalOptions, ModalRequest, PendingResponse, Response};
use crate::stack::ModalStack;
use crate::surface::RenderSurface;
use crate::trap::{FocusTrap, TrapOutcome};
use crate::wakeup::{WakeupSender, WakeupSlot};

/// Handle to the modal stack.
///
/// Cheap to clone; clones share the same stack and registry.
#[derive(Clone)]
pub struct Modals {
    stack: Arc<Mutex<ModalStack>>,
    registry: ComponentRegistry,
    config: Arc<ModalConfig>,
    wakeup: WakeupSlot,
    revision: Arc<AtomicU64>,
}

impl Modals {
    pub fn new(registry: ComponentRegistry, config: ModalConfig) -> Self {
        Self {
            stack: Arc::new(Mutex::new(ModalStack::new())),
            registry,
            config: Arc::new(config),
            wakeup: WakeupSlot::default(),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModalStack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the sender woken on every stack change and finished load.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.registry.install_wakeup(sender.clone());
        self.wakeup.install(sender);
    }

    fn changed(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.wakeup.notify();
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    /// Open a modal and get a future for its close response.
    ///
    /// Loading the component is started in the background; the future is
    /// about the close, not the load. A name without a component is still
    /// pushed (it renders nothing) and its future stays pending until
    /// something closes it.
    pub fn open_modal(
        &self,
        name: &str,
        payload: Value,
        options: Option<ModalOptions>,
    ) -> PendingResponse {
        self.registry.load_in_background(name);

        let options = options.unwrap_or_else(|| self.config.default_options.clone());
        let pending = self.lock().open(name, payload, options);
        self.changed();
        pending
    }

    /// Open a modal without payload, using the default options.
    pub fn open(&self, name: &str) -> PendingResponse {
        self.open_modal(name, Value::Null, None)
    }

    /// Close the top modal.
    ///
    /// With `send_response` false the caller receives an empty response.
    /// Closing an empty stack does nothing.
    pub fn close_modal(&self, response: Response, send_response: bool) -> Option<ModalRequest> {
        let closed = self.lock().close(response, send_response);
        if closed.is_some() {
            self.changed();
        }
        closed
    }

    /// Close the top modal with a response.
    pub fn close(&self, response: impl Into<Value>) -> Option<ModalRequest> {
        self.close_modal(Some(response.into()), true)
    }

    /// Close the top modal without a response.
    pub fn dismiss(&self) -> Option<ModalRequest> {
        self.close_modal(None, true)
    }

    /// Close the top modal only if it is `id`.
    pub fn close_if_top(&self, id: ModalId, response: Response) -> bool {
        let closed = {
            let mut stack = self.lock();
            if stack.active().map(ModalRequest::id) != Some(id) {
                log::warn!("modal {id} is not on top; close ignored");
                return false;
            }
            stack.close(response, true)
        };
        if closed.is_some() {
            self.changed();
        }
        closed.is_some()
    }

    /// Close every modal, each with an empty response.
    pub fn close_all(&self) -> usize {
        let closed = self.lock().close_all().len();
        if closed > 0 {
            self.changed();
        }
        closed
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Topmost request with the given name.
    pub fn get_modal(&self, name: &str) -> Option<ModalRequest> {
        self.lock().get(name).cloned()
    }

    pub fn get_by_id(&self, id: ModalId) -> Option<ModalRequest> {
        self.lock().get_by_id(id).cloned()
    }

    pub fn active(&self) -> Option<ModalRequest> {
        self.lock().active().cloned()
    }

    /// The stack, newest first.
    pub fn stack(&self) -> Vec<ModalRequest> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Components ready to render, by name.
    pub fn loaded_components(&self) -> HashMap<String, ComponentHandle> {
        self.registry.loaded_components()
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Counter bumped on every stack change.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Context for handlers of request `id`.
    pub fn context(&self, id: ModalId) -> ModalContext {
        ModalContext::new(id, self.clone())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route an event through the focus trap and the active component.
    ///
    /// Trap-requested closes are applied here. Keys the trap ignores go to
    /// the active component's `on_key`. The caller re-syncs the trap with
    /// the new stack afterwards.
    pub fn route_event<S>(&self, trap: &mut FocusTrap, surface: &S, event: &Event) -> TrapOutcome
    where
        S: RenderSurface + ?Sized,
    {
        let outcome = trap.handle_event(event, surface);

        match &outcome {
            TrapOutcome::Close { id } => {
                self.close_if_top(*id, None);
            }
            TrapOutcome::Ignored => {
                if let Event::Key { key, modifiers, .. } = event {
                    self.forward_key(trap.focused(), *key, *modifiers);
                }
            }
            TrapOutcome::Moved { .. } | TrapOutcome::Wrapped { .. } => {}
        }

        outcome
    }

    fn forward_key(&self, focused: Option<&str>, key: Key, modifiers: Modifiers) {
        let Some(request) = self.active() else {
            return;
        };
        let Some(component) = self.registry.component(request.name()) else {
            return;
        };
        let mx = self.context(request.id());
        if !component.on_key(&request, focused, key, modifiers, &mx) {
            log::trace!("[modals] {} ignored {key:?}", request.name());
        }
    }
}

impl std::fmt::Debug for Modals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modals")
            .field("depth", &self.len())
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}
