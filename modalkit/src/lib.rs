//! Stacked modal dialogs for terminal applications.
//!
//! - [`Modals`] owns the stack: `open_modal` pushes a request and returns a
//!   future for its close response, `close_modal` pops the top.
//! - [`ComponentRegistry`] resolves modal names to components and loads
//!   each one once.
//! - [`FocusTrap`] keeps Tab, Escape and overlay clicks scoped to the
//!   active modal.
//! - [`RenderSurface`] is the seam to whatever draws the regions;
//!   [`ModalLayer`] is a ready-made implementation.

pub mod component;
pub mod config;
pub mod error;
pub mod modals;
pub mod registration;
pub mod registry;
pub mod request;
pub mod stack;
pub mod surface;
pub mod trap;
pub mod wakeup;

#[doc(hidden)]
pub use inventory;

pub use component::{ComponentHandle, ModalComponent, ModalContext};
pub use config::ModalConfig;
pub use error::{LoadError, RegistryError, ResponseError};
pub use modals::Modals;
pub use registration::ModalRegistration;
pub use registry::{ComponentRegistry, LoadFuture, LoadStatus, ModalSource, SourceKind};
pub use request::{ModalId, ModalOptions, ModalRequest, PendingResponse, Response};
pub use stack::ModalStack;
pub use surface::{overlay_id, ModalLayer, RenderSurface};
pub use trap::{FocusTrap, TrapOutcome};

pub mod prelude {
    pub use crate::component::{ComponentHandle, ModalComponent, ModalContext};
    pub use crate::config::ModalConfig;
    pub use crate::error::{LoadError, RegistryError};
    pub use crate::modals::Modals;
    pub use crate::registry::{ComponentRegistry, LoadFuture, ModalSource};
    pub use crate::request::{ModalId, ModalOptions, ModalRequest, PendingResponse, Response};
    pub use crate::surface::{ModalLayer, RenderSurface};
    pub use crate::trap::{FocusTrap, TrapOutcome};
    pub use crate::register_modal;

    pub use modaldom::{Element, Event, Key, Modifiers};
}
