//! Modal components shown by the demo.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use modalkit::prelude::*;
use serde_json::{Value, json};

fn payload_str<'a>(request: &'a ModalRequest, key: &str, default: &'a str) -> &'a str {
    request.payload()[key].as_str().unwrap_or(default)
}

/// Build the registry of every dialog the demo can open.
pub fn registry() -> Result<ComponentRegistry, RegistryError> {
    let confirm = ModalSource::from_path("dialogs/Confirm.mdl.rs", || async {
        Ok::<_, LoadError>(Arc::new(Confirm) as ComponentHandle)
    })?;

    // Loads slowly so the region appears after the modal is pushed.
    let prompt = ModalSource::from_path("dialogs/Prompt.amdl.rs", || async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok::<_, LoadError>(Arc::new(Prompt::default()) as ComponentHandle)
    })?;

    ComponentRegistry::builder()
        .source(confirm)
        .source(prompt)
        .registered()?
        .build()
}

// =============================================================================
// Confirm
// =============================================================================

/// Yes/no question. Resolves to `true` or `false`.
///
/// Payload: `{"title": .., "message": ..}`.
pub struct Confirm;

impl ModalComponent for Confirm {
    fn render(&self, request: &ModalRequest) -> Element {
        Element::box_()
            .child(Element::text(payload_str(request, "title", "Confirm")))
            .child(Element::text(payload_str(request, "message", "Are you sure?")))
            .child(Element::text("p: ask for a name first"))
            .child(Element::button("Ok").id("confirm-ok"))
            .child(Element::button("Cancel").id("confirm-cancel"))
    }

    fn on_key(
        &self,
        _request: &ModalRequest,
        focused: Option<&str>,
        key: Key,
        modifiers: Modifiers,
        mx: &ModalContext,
    ) -> bool {
        if !modifiers.none() {
            return false;
        }
        match key {
            Key::Enter => mx.close(Some(json!(focused != Some("confirm-cancel")))),
            Key::Char('y') => mx.close(Some(json!(true))),
            Key::Char('n') => mx.close(Some(json!(false))),
            Key::Char('p') => {
                // Nested modal; the answer is only logged.
                let pending = mx.modals().open_modal(
                    "Prompt",
                    json!({"label": "Who is asking?"}),
                    None,
                );
                tokio::spawn(async move {
                    log::info!("nested prompt answered {:?}", pending.await);
                });
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Prompt
// =============================================================================

const PROMPT_INPUT: &str = "prompt-input";
const PROMPT_SUBMIT: &str = "prompt-submit";
const PROMPT_CANCEL: &str = "prompt-cancel";

/// Single-line text entry. Resolves to the entered string.
///
/// Payload: `{"label": .., "placeholder": ..}`.
#[derive(Default)]
pub struct Prompt {
    drafts: Mutex<HashMap<ModalId, String>>,
}

impl Prompt {
    fn draft(&self, id: ModalId) -> String {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    fn edit(&self, id: ModalId, f: impl FnOnce(&mut String)) {
        let mut drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        f(drafts.entry(id).or_default());
    }

    fn submit(&self, mx: &ModalContext) -> bool {
        let value = self
            .drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&mx.id())
            .unwrap_or_default();
        mx.close(Some(Value::String(value)))
    }

    /// Forget drafts of prompts that were dismissed.
    fn prune(&self, mx: &ModalContext) {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id, _| mx.modals().get_by_id(*id).is_some());
    }
}

impl ModalComponent for Prompt {
    fn render(&self, request: &ModalRequest) -> Element {
        let placeholder = payload_str(request, "placeholder", "type here");
        Element::box_()
            .child(Element::text(payload_str(request, "label", "Enter a value")))
            .child(
                Element::text_input(self.draft(request.id()))
                    .id(PROMPT_INPUT)
                    .placeholder(placeholder),
            )
            .child(Element::button("Submit").id(PROMPT_SUBMIT))
            .child(Element::button("Cancel").id(PROMPT_CANCEL))
    }

    fn on_key(
        &self,
        request: &ModalRequest,
        focused: Option<&str>,
        key: Key,
        modifiers: Modifiers,
        mx: &ModalContext,
    ) -> bool {
        self.prune(mx);

        match (focused, key) {
            (Some(PROMPT_CANCEL), Key::Enter) => mx.dismiss(),
            (_, Key::Enter) => self.submit(mx),
            (Some(PROMPT_INPUT), Key::Char(c)) if !modifiers.ctrl && !modifiers.alt => {
                self.edit(request.id(), |draft| draft.push(c));
                true
            }
            (Some(PROMPT_INPUT), Key::Backspace) => {
                self.edit(request.id(), |draft| {
                    draft.pop();
                });
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// About
// =============================================================================

/// Static information. Registered through `register_modal!`.
pub struct About;

impl ModalComponent for About {
    fn render(&self, _request: &ModalRequest) -> Element {
        Element::box_()
            .child(Element::text(concat!("modalkit demo ", env!("CARGO_PKG_VERSION"))))
            .child(Element::text("Tab cycles inside the top dialog."))
            .child(Element::text("Escape or a click outside closes it."))
            .child(Element::button("Close").id("about-close"))
    }

    fn on_key(
        &self,
        _request: &ModalRequest,
        _focused: Option<&str>,
        key: Key,
        _modifiers: Modifiers,
        mx: &ModalContext,
    ) -> bool {
        key == Key::Enter && mx.dismiss()
    }
}

fn load_about() -> LoadFuture {
    Box::pin(async { Ok::<_, LoadError>(Arc::new(About) as ComponentHandle) })
}

register_modal!("dialogs/About.amdl.rs", load_about);
