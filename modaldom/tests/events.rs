use crossterm::event::{
    Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use modaldom::{Event, Key, Modifiers, MouseButton};

fn press(code: KeyCode, modifiers: KeyModifiers) -> CtEvent {
    CtEvent::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    })
}

#[test]
fn test_translate_key_press() {
    let event = Event::from_crossterm(&press(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(event, Some(Event::key(Key::Escape)));
}

#[test]
fn test_translate_shift_tab() {
    let event = Event::from_crossterm(&press(KeyCode::BackTab, KeyModifiers::SHIFT));
    assert_eq!(event, Some(Event::key_with(Key::BackTab, Modifiers::shift())));
}

#[test]
fn test_key_release_is_dropped() {
    let raw = CtEvent::Key(KeyEvent {
        code: KeyCode::Tab,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    });
    assert_eq!(Event::from_crossterm(&raw), None);
}

#[test]
fn test_translate_resize() {
    assert_eq!(
        Event::from_crossterm(&CtEvent::Resize(80, 24)),
        Some(Event::Resize { width: 80, height: 24 })
    );
}

#[test]
fn test_modifiers_none() {
    assert!(Modifiers::new().none());
    assert!(!Modifiers::ctrl().none());
    let mods: Modifiers = (KeyModifiers::CONTROL | KeyModifiers::ALT).into();
    assert!(mods.ctrl && mods.alt && !mods.shift);
}

#[test]
fn test_unsupported_key_is_dropped() {
    let event = Event::from_crossterm(&press(KeyCode::F(5), KeyModifiers::NONE));
    assert_eq!(event, None);
}

#[test]
fn test_mouse_down_is_untargeted_click() {
    let raw = CtEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(crossterm::event::MouseButton::Right),
        column: 3,
        row: 4,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(
        Event::from_crossterm(&raw),
        Some(Event::Click {
            target: None,
            button: MouseButton::Right,
        })
    );
}

#[test]
fn test_mouse_move_is_dropped() {
    let raw = CtEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Moved,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(Event::from_crossterm(&raw), None);
}
