//! Focus trap: keeps keyboard interaction inside the active modal.
//!
//! The trap is synced after every stack change. It owns the event
//! subscriptions of the active request (Escape and overlay click), a Tab
//! observer that only exists while modals are open, the background scroll
//! lock, and the focus of the modal layer.

use std::time::{Duration, Instant};

use modaldom::{collect_focusable, initial_focus, Event, FocusState, Key};

use crate::config::ModalConfig;
use crate::request::{ModalId, ModalRequest};
use crate::surface::RenderSurface;

/// What the trap did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Not handled; the host may process the event.
    Ignored,
    /// Focus advanced inside the active region.
    Moved { to: String },
    /// Focus wrapped around a boundary of the active region. The default
    /// tab advance must be suppressed.
    Wrapped { to: String },
    /// The active modal should close without a response.
    Close { id: ModalId },
}

/// Event subscription held for the active request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    id: ModalId,
    close_on_escape: bool,
    close_on_overlay_click: bool,
}

impl Subscription {
    fn for_request(request: &ModalRequest) -> Self {
        Self {
            id: request.id(),
            close_on_escape: request.options().close_on_escape,
            close_on_overlay_click: request.options().close_on_overlay_click,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingFocus {
    id: ModalId,
    due: Instant,
}

/// Focus containment for the modal stack.
#[derive(Debug)]
pub struct FocusTrap {
    settle_delay: Duration,
    lock_scroll: bool,
    focus: FocusState,
    subscription: Option<Subscription>,
    observing_keys: bool,
    pending: Option<PendingFocus>,
    scroll_locked: bool,
}

impl FocusTrap {
    pub fn new(config: &ModalConfig) -> Self {
        Self {
            settle_delay: config.settle_delay,
            lock_scroll: config.lock_background_scroll,
            focus: FocusState::new(),
            subscription: None,
            observing_keys: false,
            pending: None,
            scroll_locked: false,
        }
    }

    /// Reconcile with the stack after a mutation.
    ///
    /// `stack` is newest first. When the active request changed, the old
    /// subscription is dropped, the new one registered, and initial focus
    /// scheduled `settle_delay` after `now`.
    pub fn sync<S>(&mut self, stack: &[ModalRequest], surface: &mut S, now: Instant)
    where
        S: RenderSurface + ?Sized,
    {
        let open = !stack.is_empty();

        if self.lock_scroll && open != self.scroll_locked {
            surface.lock_background_scroll(open);
            self.scroll_locked = open;
        }

        if open != self.observing_keys {
            log::debug!("[trap] key observer {}", if open { "registered" } else { "removed" });
            self.observing_keys = open;
        }

        let active = stack.iter().find(|request| request.is_active());
        if self.subscription.map(|sub| sub.id) == active.map(|request| request.id()) {
            return;
        }

        if let Some(old) = self.subscription.take() {
            log::debug!("[trap] unsubscribed {}", old.id);
        }

        match active {
            Some(request) => {
                log::debug!("[trap] subscribed {} ({})", request.id(), request.name());
                self.subscription = Some(Subscription::for_request(request));
                self.pending = Some(PendingFocus {
                    id: request.id(),
                    due: now + self.settle_delay,
                });
            }
            None => {
                self.pending = None;
                self.focus.blur();
            }
        }
    }

    /// Apply scheduled initial focus once the delay has passed and the
    /// surface has materialized the active region.
    ///
    /// Returns the newly focused element ID. While the region is missing
    /// (component still loading) the focus stays scheduled.
    pub fn settle<S>(&mut self, surface: &S, now: Instant) -> Option<String>
    where
        S: RenderSurface + ?Sized,
    {
        let PendingFocus { id, due } = self.pending?;
        if now < due {
            return None;
        }
        let region = surface.region(id)?;

        let target = initial_focus(region).to_string();
        self.pending = None;
        self.focus.focus(&target);
        log::debug!("[trap] initial focus {target} in {id}");
        Some(target)
    }

    /// When the scheduled initial focus becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// Route an input event through the trap.
    pub fn handle_event<S>(&mut self, event: &Event, surface: &S) -> TrapOutcome
    where
        S: RenderSurface + ?Sized,
    {
        match event {
            Event::Key {
                key: Key::Escape, ..
            } => self.on_escape(),
            Event::Key {
                key: Key::Tab,
                modifiers,
                ..
            } => self.on_tab(surface, modifiers.shift),
            Event::Key {
                key: Key::BackTab, ..
            } => self.on_tab(surface, true),
            Event::Click {
                target: Some(target),
                ..
            } => self.on_click(target, surface),
            Event::Focus { target } => {
                self.focus.focus(target);
                TrapOutcome::Ignored
            }
            Event::Blur { target } => {
                if self.focus.focused() == Some(target.as_str()) {
                    self.focus.blur();
                }
                TrapOutcome::Ignored
            }
            _ => TrapOutcome::Ignored,
        }
    }

    fn on_escape(&self) -> TrapOutcome {
        match self.subscription {
            Some(sub) if sub.close_on_escape => TrapOutcome::Close { id: sub.id },
            _ => TrapOutcome::Ignored,
        }
    }

    fn on_tab<S>(&mut self, surface: &S, backwards: bool) -> TrapOutcome
    where
        S: RenderSurface + ?Sized,
    {
        if !self.observing_keys {
            return TrapOutcome::Ignored;
        }
        let Some(sub) = self.subscription else {
            return TrapOutcome::Ignored;
        };
        let Some(region) = surface.region(sub.id) else {
            return TrapOutcome::Ignored;
        };

        let focusable = collect_focusable(region);
        let (Some(first), Some(last)) = (focusable.first(), focusable.last()) else {
            // Nothing to trap.
            return TrapOutcome::Ignored;
        };

        let current = self.focus.focused();
        let wrap_to = if backwards && current == Some(first.as_str()) {
            Some(last)
        } else if !backwards && current == Some(last.as_str()) {
            Some(first)
        } else {
            None
        };

        if let Some(to) = wrap_to {
            let to = to.clone();
            self.focus.focus(&to);
            return TrapOutcome::Wrapped { to };
        }

        let moved = if backwards {
            self.focus.focus_prev(region)
        } else {
            self.focus.focus_next(region)
        };
        match moved {
            Some(to) => TrapOutcome::Moved { to },
            None => TrapOutcome::Ignored,
        }
    }

    fn on_click<S>(&self, target: &str, surface: &S) -> TrapOutcome
    where
        S: RenderSurface + ?Sized,
    {
        let Some(sub) = self.subscription else {
            return TrapOutcome::Ignored;
        };
        let on_overlay = surface
            .region(sub.id)
            .is_some_and(|region| region.id == target);

        if on_overlay && sub.close_on_overlay_click {
            TrapOutcome::Close { id: sub.id }
        } else {
            TrapOutcome::Ignored
        }
    }

    /// Drop every subscription and restore background scrolling.
    pub fn teardown<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        if self.scroll_locked {
            surface.lock_background_scroll(false);
            self.scroll_locked = false;
        }
        self.subscription = None;
        self.observing_keys = false;
        self.pending = None;
        self.focus.blur();
        log::debug!("[trap] torn down");
    }

    /// The focused element of the modal layer.
    pub fn focused(&self) -> Option<&str> {
        self.focus.focused()
    }

    /// The request whose Escape/overlay subscription is live.
    pub fn subscribed(&self) -> Option<ModalId> {
        self.subscription.map(|sub| sub.id)
    }

    /// Whether the global Tab observer is registered.
    pub fn is_observing_keys(&self) -> bool {
        self.observing_keys
    }

    /// Number of live listeners (Tab observer plus request subscription).
    pub fn listener_count(&self) -> usize {
        usize::from(self.observing_keys) + usize::from(self.subscription.is_some())
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}
