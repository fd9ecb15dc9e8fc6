//! Tests for name resolution and component loading.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::block_on;
use futures::future;
use modaldom::Element;
use modalkit::registry::parse_source_path;
use modalkit::{
    ComponentHandle, ComponentRegistry, LoadError, LoadStatus, ModalComponent, ModalRequest,
    ModalSource, RegistryError, SourceKind,
};

struct Label(&'static str);

impl ModalComponent for Label {
    fn render(&self, _request: &ModalRequest) -> Element {
        Element::text(self.0)
    }
}

/// A source whose loader counts its invocations.
fn counted(path: &str, calls: &Arc<AtomicUsize>) -> ModalSource {
    let calls = Arc::clone(calls);
    ModalSource::from_path(path, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, LoadError>(Arc::new(Label("counted")) as ComponentHandle) }
    })
    .unwrap()
}

fn failing(path: &str, calls: &Arc<AtomicUsize>) -> ModalSource {
    let calls = Arc::clone(calls);
    ModalSource::from_path(path, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        future::ready(Err::<ComponentHandle, _>(LoadError::new("syntax error")))
    })
    .unwrap()
}

// =============================================================================
// Source paths
// =============================================================================

#[test]
fn test_parse_standard_and_alternate_markers() {
    assert_eq!(
        parse_source_path("modals/Confirm.mdl.rs"),
        Some(("Confirm".to_string(), SourceKind::Standard))
    );
    assert_eq!(
        parse_source_path("modals/nested/Prompt.amdl.rs"),
        Some(("Prompt".to_string(), SourceKind::Alternate))
    );
    assert_eq!(
        parse_source_path("Settings.mdl"),
        Some(("Settings".to_string(), SourceKind::Standard))
    );
}

#[test]
fn test_parse_name_stops_at_first_dot() {
    assert_eq!(
        parse_source_path("dialogs/Edit.user.amdl.rs"),
        Some(("Edit".to_string(), SourceKind::Alternate))
    );
}

#[test]
fn test_parse_rejects_unmarked_paths() {
    assert_eq!(parse_source_path("dialogs/Confirm.rs"), None);
    assert_eq!(parse_source_path("dialogs/Confirm"), None);
    assert_eq!(parse_source_path("dialogs/.mdl.rs"), None);
    assert_eq!(parse_source_path("mdl/Confirm.rs"), None);
}

#[test]
fn test_source_from_invalid_path_errors() {
    let err = ModalSource::from_path("dialogs/Confirm.rs", || async {
        Ok::<_, LoadError>(Arc::new(Label("x")) as ComponentHandle)
    })
    .unwrap_err();

    assert_eq!(
        err,
        RegistryError::InvalidSource {
            path: "dialogs/Confirm.rs".to_string()
        }
    );
}

#[test]
fn test_duplicate_names_rejected() {
    let calls = Arc::new(AtomicUsize::new(0));
    let err = ComponentRegistry::builder()
        .source(counted("a/Confirm.mdl.rs", &calls))
        .source(counted("b/Confirm.amdl.rs", &calls))
        .build()
        .unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateSource { ref name, .. } if name == "Confirm"));
}

#[test]
fn test_names_are_sorted() {
    let registry = ComponentRegistry::builder()
        .source(ModalSource::component("Zeta", Arc::new(Label("z"))))
        .source(ModalSource::component("Alpha", Arc::new(Label("a"))))
        .build()
        .unwrap();

    assert_eq!(registry.names(), vec!["Alpha", "Zeta"]);
    assert!(registry.contains("Alpha"));
    assert!(!registry.contains("Beta"));
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_transitions_to_loaded() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .build()
        .unwrap();

    assert_eq!(registry.status("Confirm"), LoadStatus::Unloaded);
    assert!(registry.component("Confirm").is_none());

    let load = registry.ensure_loaded("Confirm");
    assert_eq!(registry.status("Confirm"), LoadStatus::Loading);

    assert!(block_on(load).is_ok());
    assert_eq!(registry.status("Confirm"), LoadStatus::Loaded);
    assert!(registry.loaded_components().contains_key("Confirm"));
}

#[test]
fn test_concurrent_requests_share_one_load() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .build()
        .unwrap();

    let first = registry.ensure_loaded("Confirm");
    let second = registry.ensure_loaded("Confirm");
    let (first, second) = block_on(future::join(first, second));

    let first = first.unwrap();
    let second = second.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Cached afterwards.
    let third = block_on(registry.ensure_loaded("Confirm")).unwrap();
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_name_recorded_as_not_found() {
    let registry = ComponentRegistry::new();

    let err = block_on(registry.ensure_loaded("Missing")).err();
    assert_eq!(
        err,
        Some(RegistryError::NotFound {
            name: "Missing".to_string()
        })
    );
    assert_eq!(registry.status("Missing"), LoadStatus::NotFound);
    assert!(registry.loaded_components().is_empty());
}

#[test]
fn test_failed_load_is_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(failing("dialogs/Broken.mdl.rs", &calls))
        .build()
        .unwrap();

    let first = block_on(registry.ensure_loaded("Broken")).err();
    let second = block_on(registry.ensure_loaded("Broken")).err();

    assert!(matches!(first, Some(RegistryError::LoadFailed { ref name, .. }) if name == "Broken"));
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(registry.status("Broken"), LoadStatus::Failed(_)));
    assert!(registry.component("Broken").is_none());
}

#[test]
fn test_unpolled_load_released_with_registry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .build()
        .unwrap();

    drop(registry.ensure_loaded("Confirm"));
    assert_eq!(registry.status("Confirm"), LoadStatus::Loading);
    drop(registry);

    // Only the test's handle remains once the loader is freed.
    assert_eq!(Arc::strong_count(&calls), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_load_outliving_registry_still_resolves() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .build()
        .unwrap();

    let load = registry.ensure_loaded("Confirm");
    drop(registry);

    assert!(block_on(load).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_preload_all_loads_every_source() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .source(ModalSource::component("About", Arc::new(Label("about"))))
        .source(failing("dialogs/Broken.amdl.rs", &calls))
        .build()
        .unwrap();

    let results = block_on(registry.preload_all());

    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 2);
    let mut loaded: Vec<_> = registry.loaded_components().into_keys().collect();
    loaded.sort();
    assert_eq!(loaded, vec!["About", "Confirm"]);
}

#[tokio::test]
async fn test_background_load_runs_on_runtime() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = ComponentRegistry::builder()
        .source(counted("dialogs/Confirm.mdl.rs", &calls))
        .build()
        .unwrap();

    registry.load_in_background("Confirm");
    registry.load_in_background("Confirm");

    let component = registry.ensure_loaded("Confirm").await;
    assert!(component.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.status("Confirm"), LoadStatus::Loaded);
}
