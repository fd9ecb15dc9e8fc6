//! The modal stack: open/close protocol and the single-active invariant.

use std::collections::VecDeque;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::request::{ModalId, ModalOptions, ModalRequest, PendingResponse, Response};

struct StackEntry {
    request: ModalRequest,
    responder: oneshot::Sender<Response>,
}

/// Ordered collection of open modal requests, newest first.
///
/// Index 0 is the top of the stack and the only active request. Every
/// transition is applied in full before the method returns.
#[derive(Default)]
pub struct ModalStack {
    entries: VecDeque<StackEntry>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new active request on top, deactivating the previous top.
    ///
    /// The returned future settles when the request is closed.
    pub fn open(
        &mut self,
        name: impl Into<String>,
        payload: Value,
        options: ModalOptions,
    ) -> PendingResponse {
        let request = ModalRequest::new(name.into(), payload, options);
        let (responder, pending) = PendingResponse::channel(request.id());

        for entry in &mut self.entries {
            entry.request.set_active(false);
        }

        log::debug!(
            "[stack] open {} ({}) depth={}",
            request.name(),
            request.id(),
            self.entries.len() + 1
        );
        self.entries.push_front(StackEntry { request, responder });
        pending
    }

    /// Remove the top request and settle its future.
    ///
    /// With `send_response` false the future settles with an empty value
    /// whatever `response` holds. Returns the removed request, or `None`
    /// when the stack was already empty.
    pub fn close(&mut self, response: Response, send_response: bool) -> Option<ModalRequest> {
        let StackEntry {
            mut request,
            responder,
        } = self.entries.pop_front()?;

        let response = if send_response { response } else { None };
        // Receiver may be gone if the caller abandoned the future.
        let _ = responder.send(response);
        request.set_active(false);

        if let Some(top) = self.entries.front_mut() {
            top.request.set_active(true);
        }

        log::debug!(
            "[stack] close {} ({}) depth={}",
            request.name(),
            request.id(),
            self.entries.len()
        );
        Some(request)
    }

    /// Close every request, top first, each with an empty response.
    pub fn close_all(&mut self) -> Vec<ModalRequest> {
        let mut closed = Vec::with_capacity(self.entries.len());
        while let Some(request) = self.close(None, false) {
            closed.push(request);
        }
        closed
    }

    /// Topmost request with the given name.
    pub fn get(&self, name: &str) -> Option<&ModalRequest> {
        self.iter().find(|request| request.name() == name)
    }

    pub fn get_by_id(&self, id: ModalId) -> Option<&ModalRequest> {
        self.iter().find(|request| request.id() == id)
    }

    /// The active request, if any.
    pub fn active(&self) -> Option<&ModalRequest> {
        self.entries
            .front()
            .map(|entry| &entry.request)
            .filter(|request| request.is_active())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requests newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ModalRequest> {
        self.entries.iter().map(|entry| &entry.request)
    }

    /// Requests in paint order: oldest first, newest last.
    pub fn render_order(&self) -> impl Iterator<Item = &ModalRequest> {
        self.iter().rev()
    }

    /// Owned copy of the stack, newest first.
    pub fn snapshot(&self) -> Vec<ModalRequest> {
        self.iter().cloned().collect()
    }
}

impl Drop for ModalStack {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("[stack] dropped with {} open modal(s)", self.entries.len());
            self.close_all();
        }
    }
}
