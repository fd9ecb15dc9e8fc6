//! Registration types for inventory-based modal discovery.

use crate::error::RegistryError;
use crate::registry::{LoadFuture, ModalSource};

/// Modal registration entry for inventory.
pub struct ModalRegistration {
    /// Source location, e.g. `dialogs/Confirm.mdl.rs`. Must carry a marker.
    pub path: &'static str,
    /// Loader producing the component.
    pub loader: fn() -> LoadFuture,
}

impl ModalRegistration {
    /// Create a new modal registration.
    pub const fn new(path: &'static str, loader: fn() -> LoadFuture) -> Self {
        Self { path, loader }
    }

    /// Turn the registration into a registry source.
    pub fn source(&self) -> Result<ModalSource, RegistryError> {
        ModalSource::from_path(self.path, self.loader)
    }
}

inventory::collect!(ModalRegistration);

/// Get all registered modals.
pub fn registered_modals() -> impl Iterator<Item = &'static ModalRegistration> {
    inventory::iter::<ModalRegistration>()
}

/// Register a modal source for [`RegistryBuilder::registered`].
///
/// ```ignore
/// fn load_about() -> LoadFuture {
///     Box::pin(async { Ok(Arc::new(About) as ComponentHandle) })
/// }
///
/// register_modal!("dialogs/About.amdl.rs", load_about);
/// ```
///
/// [`RegistryBuilder::registered`]: crate::registry::RegistryBuilder::registered
#[macro_export]
macro_rules! register_modal {
    ($path:expr, $loader:expr) => {
        $crate::inventory::submit! {
            $crate::registration::ModalRegistration::new($path, $loader)
        }
    };
}
