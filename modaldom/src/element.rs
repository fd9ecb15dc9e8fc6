use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// What an element represents, as far as keyboard interaction is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    #[default]
    Container,
    Text,
    Button,
    Link,
    TextInput,
    TextArea,
    Select,
}

impl ElementKind {
    /// Interactive kinds take part in tab order without an explicit marker.
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::Container | Self::Text)
    }

    /// Controls that accept typed input. These win initial focus.
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::TextInput | Self::TextArea | Self::Select)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    None,
    Text(String),
    TextInput {
        value: String,
        placeholder: Option<String>,
    },
    Children(Vec<Element>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    pub kind: ElementKind,

    // Content
    pub content: Content,

    // Interaction
    /// Explicit tab order marker. `None` defers to the element kind,
    /// a negative value removes the element from tab order.
    pub tab_index: Option<i32>,
    /// Disabled elements never receive focus.
    pub disabled: bool,

    // Custom data storage (href, modal name, handler IDs, etc.)
    pub data: HashMap<String, String>,

    /// The ID came from the global counter rather than [`Element::id`].
    generated_id: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            kind: ElementKind::Container,
            content: Content::None,
            tab_index: None,
            disabled: false,
            data: HashMap::new(),
            generated_id: true,
        }
    }
}

impl Element {
    pub fn box_() -> Self {
        Self {
            id: generate_id("box"),
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            kind: ElementKind::Text,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self {
            id: generate_id("button"),
            kind: ElementKind::Button,
            content: Content::Text(label.into()),
            ..Default::default()
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: generate_id("link"),
            kind: ElementKind::Link,
            content: Content::Text(label.into()),
            ..Default::default()
        }
        .data("href", href)
    }

    /// Create a single-line text input element.
    pub fn text_input(value: impl Into<String>) -> Self {
        Self {
            id: generate_id("input"),
            kind: ElementKind::TextInput,
            content: Content::TextInput {
                value: value.into(),
                placeholder: None,
            },
            ..Default::default()
        }
    }

    /// Create a multi-line text input element.
    pub fn text_area(value: impl Into<String>) -> Self {
        Self {
            id: generate_id("textarea"),
            kind: ElementKind::TextArea,
            content: Content::TextInput {
                value: value.into(),
                placeholder: None,
            },
            ..Default::default()
        }
    }

    pub fn select() -> Self {
        Self {
            id: generate_id("select"),
            kind: ElementKind::Select,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.generated_id = false;
        self
    }

    // Interaction

    /// Mark the element focusable (tab index 0) or remove it from tab
    /// order (tab index -1), regardless of its kind.
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.tab_index = Some(if focusable { 0 } else { -1 });
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether Tab navigation may land on this element.
    pub fn is_focusable(&self) -> bool {
        if self.disabled {
            return false;
        }
        match self.tab_index {
            Some(index) => index >= 0,
            None => self.kind.is_interactive(),
        }
    }

    // Text input methods

    /// Set the placeholder text for a text input.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        if let Content::TextInput { placeholder, .. } = &mut self.content {
            *placeholder = Some(text.into());
        }
        self
    }

    /// Text shown for this element: label, text content or input value.
    pub fn label(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::TextInput { value, .. } => Some(value),
            _ => None,
        }
    }

    // Custom data
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }

    /// Direct children of this element (empty for leaves).
    pub fn child_elements(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Whether the ID was set explicitly with [`Element::id`].
    pub fn has_explicit_id(&self) -> bool {
        !self.generated_id
    }
}

/// Replace generated IDs below `root` with IDs derived from their position,
/// `<root id>/<child index>/...`.
///
/// Rendering the same tree twice then yields the same IDs, so focus held
/// by ID survives a re-render. Explicit IDs and `root` itself are kept.
pub fn assign_path_ids(root: &mut Element) {
    let prefix = root.id.clone();
    assign_below(root, &prefix);
}

fn assign_below(element: &mut Element, prefix: &str) {
    let Content::Children(children) = &mut element.content else {
        return;
    };
    for (index, child) in children.iter_mut().enumerate() {
        let path = format!("{prefix}/{index}");
        if child.generated_id {
            child.id.clone_from(&path);
        }
        assign_below(child, &path);
    }
}

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// True if `id` names a strict descendant of `root`.
pub fn contains_descendant(root: &Element, id: &str) -> bool {
    root.child_elements()
        .iter()
        .any(|child| find_element(child, id).is_some())
}
