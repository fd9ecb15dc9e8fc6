//! Tests for the modal stack state machine.

use modalkit::{ModalOptions, ModalStack};
use serde_json::{Value, json};

fn open(stack: &mut ModalStack, name: &str) -> modalkit::PendingResponse {
    stack.open(name, Value::Null, ModalOptions::default())
}

fn names(stack: &ModalStack) -> Vec<&str> {
    stack.iter().map(|request| request.name()).collect()
}

fn assert_single_active_on_top(stack: &ModalStack) {
    let active: Vec<_> = stack
        .iter()
        .enumerate()
        .filter(|(_, request)| request.is_active())
        .map(|(index, _)| index)
        .collect();
    if stack.is_empty() {
        assert!(active.is_empty());
    } else {
        assert_eq!(active, vec![0]);
    }
}

// =============================================================================
// Open
// =============================================================================

#[test]
fn test_open_pushes_newest_first() {
    let mut stack = ModalStack::new();
    let _a = open(&mut stack, "A");
    let _b = open(&mut stack, "B");

    assert_eq!(names(&stack), vec!["B", "A"]);
    assert!(stack.get("B").is_some_and(|request| request.is_active()));
    assert!(stack.get("A").is_some_and(|request| !request.is_active()));
}

#[test]
fn test_single_active_invariant_over_opens_and_closes() {
    let mut stack = ModalStack::new();
    let mut pending = Vec::new();

    for name in ["A", "B", "C", "D"] {
        pending.push(open(&mut stack, name));
        assert_single_active_on_top(&stack);
    }
    while stack.close(None, true).is_some() {
        assert_single_active_on_top(&stack);
    }
    assert!(stack.is_empty());
}

#[test]
fn test_ids_are_unique() {
    let mut stack = ModalStack::new();
    let pending: Vec<_> = (0..50).map(|_| open(&mut stack, "Same")).collect();

    let mut ids: Vec<_> = stack.iter().map(|request| request.id()).collect();
    ids.sort_by_key(|id| id.as_uuid());
    ids.dedup();
    assert_eq!(ids.len(), pending.len());
}

#[test]
fn test_pending_response_carries_request_id() {
    let mut stack = ModalStack::new();
    let pending = open(&mut stack, "A");
    assert_eq!(stack.active().map(|request| request.id()), Some(pending.id()));
}

// =============================================================================
// Close
// =============================================================================

#[test]
fn test_close_settles_top_and_reactivates_next() {
    let mut stack = ModalStack::new();
    let mut a = open(&mut stack, "A");
    let mut b = open(&mut stack, "B");

    let closed = stack.close(Some(json!("r")), true).expect("stack was not empty");
    assert_eq!(closed.name(), "B");

    assert_eq!(b.try_take(), Some(Some(json!("r"))));
    assert_eq!(a.try_take(), None);
    assert_eq!(names(&stack), vec!["A"]);
    assert!(stack.active().is_some_and(|request| request.name() == "A"));
}

#[test]
fn test_close_without_sending_response_settles_empty() {
    let mut stack = ModalStack::new();
    let mut a = open(&mut stack, "A");

    stack.close(Some(json!({"ignored": true})), false);
    assert_eq!(a.try_take(), Some(None));
}

#[test]
fn test_close_on_empty_stack_is_noop() {
    let mut stack = ModalStack::new();
    assert!(stack.close(Some(json!(1)), true).is_none());
    assert!(stack.is_empty());
}

#[test]
fn test_close_all_settles_every_request() {
    let mut stack = ModalStack::new();
    let mut a = open(&mut stack, "A");
    let mut b = open(&mut stack, "B");

    let closed: Vec<_> = stack.close_all().into_iter().map(|r| r.name().to_string()).collect();
    assert_eq!(closed, vec!["B", "A"]);
    assert_eq!(a.try_take(), Some(None));
    assert_eq!(b.try_take(), Some(None));
}

#[test]
fn test_dropping_stack_settles_pending() {
    let mut stack = ModalStack::new();
    let mut a = open(&mut stack, "A");
    drop(stack);
    assert_eq!(a.try_take(), Some(None));
}

#[tokio::test]
async fn test_round_trip_response() {
    let mut stack = ModalStack::new();
    let response = json!({"answer": [1, 2, 3], "nested": {"ok": true}, "text": "hi"});

    let pending = stack.open("Edit", json!({"msg": "ok?"}), ModalOptions::default());
    stack.close(Some(response.clone()), true);

    assert_eq!(pending.await, Some(response));
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_get_returns_topmost_match_without_mutation() {
    let mut stack = ModalStack::new();
    let _first = stack.open("Confirm", json!(1), ModalOptions::default());
    let _other = open(&mut stack, "Other");
    let _second = stack.open("Confirm", json!(2), ModalOptions::default());

    let before = stack.snapshot();
    let found = stack.get("Confirm").expect("Confirm is open");
    assert_eq!(found.payload(), &json!(2));
    assert!(stack.get("Missing").is_none());
    assert_eq!(stack.snapshot(), before);
}

#[test]
fn test_render_order_is_oldest_first() {
    let mut stack = ModalStack::new();
    let _a = open(&mut stack, "A");
    let _b = open(&mut stack, "B");
    let _c = open(&mut stack, "C");

    let order: Vec<_> = stack.render_order().map(|request| request.name()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_options_default_to_closing() {
    let options = ModalOptions::default();
    assert!(options.close_on_escape);
    assert!(options.close_on_overlay_click);
    assert!(options.extra.is_empty());
}

#[test]
fn test_options_deserialize_with_extension_fields() {
    let options: ModalOptions =
        serde_json::from_value(json!({"closeOnEscape": false, "size": "lg"})).unwrap();

    assert!(!options.close_on_escape);
    assert!(options.close_on_overlay_click);
    assert_eq!(options.get("size"), Some(&json!("lg")));
}

#[test]
fn test_options_builder() {
    let options = ModalOptions::new()
        .close_on_overlay_click(false)
        .with("width", 40);

    assert!(options.close_on_escape);
    assert!(!options.close_on_overlay_click);
    assert_eq!(options.get("width"), Some(&json!(40)));
}
