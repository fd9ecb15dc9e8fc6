use crate::element::Element;

/// Tracks which element is currently focused.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<String>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element ID.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Programmatically focus an element by ID.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        if self.focused.as_deref() == Some(id) {
            return false;
        }
        self.focused = Some(id.to_string());
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Focus the next focusable descendant of `region` (Tab navigation),
    /// wrapping at the end. Focus outside the region moves to the first one.
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_next(&mut self, region: &Element) -> Option<String> {
        let focusable = collect_focusable(region);
        if focusable.is_empty() {
            return None;
        }

        let new_focus = match self.position_in(&focusable) {
            Some(i) => focusable[(i + 1) % focusable.len()].clone(),
            None => focusable[0].clone(),
        };

        self.move_to(new_focus)
    }

    /// Focus the previous focusable descendant of `region` (Shift+Tab),
    /// wrapping at the start. Focus outside the region moves to the last one.
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_prev(&mut self, region: &Element) -> Option<String> {
        let focusable = collect_focusable(region);
        if focusable.is_empty() {
            return None;
        }

        let last = focusable.len() - 1;
        let new_focus = match self.position_in(&focusable) {
            Some(0) | None => focusable[last].clone(),
            Some(i) => focusable[i - 1].clone(),
        };

        self.move_to(new_focus)
    }

    fn position_in(&self, focusable: &[String]) -> Option<usize> {
        let current = self.focused.as_ref()?;
        focusable.iter().position(|id| id == current)
    }

    fn move_to(&mut self, new_focus: String) -> Option<String> {
        if self.focused.as_ref() != Some(&new_focus) {
            log::trace!("[focus] {:?} -> {}", self.focused, new_focus);
            self.focused = Some(new_focus.clone());
            Some(new_focus)
        } else {
            None
        }
    }
}

/// Focusable descendants of `region` in tree order. The region itself is
/// never included.
pub fn focusable_descendants(region: &Element) -> Vec<&Element> {
    let mut result = Vec::new();
    for child in region.child_elements() {
        collect_recursive(child, &mut result);
    }
    result
}

fn collect_recursive<'a>(element: &'a Element, result: &mut Vec<&'a Element>) {
    if element.is_focusable() {
        result.push(element);
    }
    for child in element.child_elements() {
        collect_recursive(child, result);
    }
}

/// Collect focusable descendant IDs in tree order.
pub fn collect_focusable(region: &Element) -> Vec<String> {
    focusable_descendants(region)
        .into_iter()
        .map(|el| el.id.clone())
        .collect()
}

/// Where focus should land when `region` becomes interactive: the first
/// text-entry control, else the first focusable descendant, else the
/// region itself.
pub fn initial_focus(region: &Element) -> &str {
    let focusable = focusable_descendants(region);
    focusable
        .iter()
        .find(|el| el.kind.is_text_entry())
        .or_else(|| focusable.first())
        .map(|el| el.id.as_str())
        .unwrap_or(region.id.as_str())
}
