//! Tests for static registration with `register_modal!`.

use std::sync::Arc;

use futures::executor::block_on;
use modaldom::Element;
use modalkit::{
    ComponentHandle, ComponentRegistry, LoadError, LoadFuture, ModalComponent, ModalRequest,
    SourceKind, register_modal, registration::registered_modals,
};

struct About;

impl ModalComponent for About {
    fn render(&self, _request: &ModalRequest) -> Element {
        Element::text("modalkit")
    }
}

fn load_about() -> LoadFuture {
    Box::pin(async { Ok::<_, LoadError>(Arc::new(About) as ComponentHandle) })
}

register_modal!("dialogs/About.amdl.rs", load_about);

#[test]
fn test_registered_modal_is_collected() {
    let registration = registered_modals()
        .find(|registration| registration.path == "dialogs/About.amdl.rs")
        .expect("About should be registered");

    let source = registration.source().unwrap();
    assert_eq!(source.name(), "About");
    assert_eq!(source.kind(), SourceKind::Alternate);
}

#[test]
fn test_registry_includes_registered_modals() {
    let registry = ComponentRegistry::builder()
        .registered()
        .unwrap()
        .build()
        .unwrap();

    assert!(registry.contains("About"));
    assert!(block_on(registry.ensure_loaded("About")).is_ok());
    assert!(registry.component("About").is_some());
}
