//! The render surface contract and a reference modal layer.
//!
//! The stack never draws anything itself. A render surface turns the stack
//! and the loaded components into regions; the focus trap only needs to
//! find the active region and toggle background scrolling.

use std::collections::HashMap;

use modaldom::{assign_path_ids, Element};

use crate::component::ComponentHandle;
use crate::modals::Modals;
use crate::request::{ModalId, ModalRequest};

/// What the focus trap needs from whatever renders the modals.
pub trait RenderSurface {
    /// The materialized region of a request, if it is currently rendered.
    ///
    /// The region's root element is the overlay; the component content
    /// sits below it.
    fn region(&self, id: ModalId) -> Option<&Element>;

    /// Suppress (`true`) or restore (`false`) scrolling of the host content.
    fn lock_background_scroll(&mut self, locked: bool);
}

/// Element ID of the overlay wrapping a request's content.
pub fn overlay_id(id: ModalId) -> String {
    format!("modal-{id}")
}

/// One rendered modal.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: ModalId,
    pub name: String,
    pub active: bool,
    pub element: Element,
}

/// Reference render surface: one overlay region per renderable request.
#[derive(Debug, Default)]
pub struct ModalLayer {
    /// Paint order: oldest first, newest last.
    regions: Vec<Region>,
    scroll_locked: bool,
}

impl ModalLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the regions from a newest-first stack snapshot.
    ///
    /// Requests whose component is not loaded produce no region. Content
    /// without explicit IDs gets IDs derived from its position under the
    /// overlay, stable from one render to the next.
    pub fn materialize(
        &mut self,
        stack: &[ModalRequest],
        components: &HashMap<String, ComponentHandle>,
    ) {
        self.regions = stack
            .iter()
            .rev()
            .filter_map(|request| {
                let Some(component) = components.get(request.name()) else {
                    log::trace!("[layer] {} has no loaded component", request.name());
                    return None;
                };
                let state = if request.is_active() { "active" } else { "inactive" };
                let mut element = Element::box_()
                    .id(overlay_id(request.id()))
                    .data("modal", request.name())
                    .data("state", state)
                    .child(component.render(request));
                assign_path_ids(&mut element);
                Some(Region {
                    id: request.id(),
                    name: request.name().to_string(),
                    active: request.is_active(),
                    element,
                })
            })
            .collect();
    }

    /// Rebuild from the current state of `modals`.
    pub fn render(&mut self, modals: &Modals) {
        self.materialize(&modals.stack(), &modals.loaded_components());
    }

    /// Rendered regions in paint order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn active_region(&self) -> Option<&Region> {
        self.regions.iter().find(|region| region.active)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl RenderSurface for ModalLayer {
    fn region(&self, id: ModalId) -> Option<&Element> {
        self.regions
            .iter()
            .find(|region| region.id == id)
            .map(|region| &region.element)
    }

    fn lock_background_scroll(&mut self, locked: bool) {
        if self.scroll_locked != locked {
            log::debug!("[layer] background scroll locked={locked}");
        }
        self.scroll_locked = locked;
    }
}
