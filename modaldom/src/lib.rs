pub mod element;
pub mod event;
pub mod focus;

pub use element::{
    assign_path_ids, contains_descendant, find_element, Content, Element, ElementKind,
};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use focus::{collect_focusable, focusable_descendants, initial_focus, FocusState};
