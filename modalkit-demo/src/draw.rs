//! Paints the host screen and the modal layer with crossterm.
//!
//! Each region is drawn as a framed box, one line per leaf element,
//! cascaded so stacked dialogs stay visible. Inactive regions are dimmed.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType},
};
use modaldom::{Content, Element, ElementKind};
use modalkit::ModalLayer;

/// One drawn line of a region.
struct Line {
    text: String,
    element: String,
}

/// Screen area of the active region, for resolving clicks.
#[derive(Debug, Default)]
pub struct HitMap {
    active: Option<ActiveBox>,
}

#[derive(Debug)]
struct ActiveBox {
    overlay: String,
    content: String,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    /// Element ID per content row.
    rows: Vec<String>,
}

impl HitMap {
    /// The element under the pointer, if a modal is open.
    ///
    /// Outside the active box the click lands on its overlay.
    pub fn target_at(&self, column: u16, row: u16) -> Option<String> {
        let active = self.active.as_ref()?;
        let inside = column >= active.x
            && column < active.x + active.width
            && row >= active.y
            && row < active.y + active.height;
        if !inside {
            return Some(active.overlay.clone());
        }

        let line = usize::from(row.saturating_sub(active.y + 1));
        Some(
            active
                .rows
                .get(line)
                .cloned()
                .unwrap_or_else(|| active.content.clone()),
        )
    }
}

fn flatten(element: &Element, focused: Option<&str>, lines: &mut Vec<Line>) {
    if let Content::Children(children) = &element.content {
        for child in children {
            flatten(child, focused, lines);
        }
        return;
    }
    let Some(label) = element.label() else {
        return;
    };

    let marker = if focused == Some(element.id.as_str()) { ">" } else { " " };
    let text = match element.kind {
        ElementKind::TextInput | ElementKind::TextArea if label.is_empty() => {
            let placeholder = match &element.content {
                Content::TextInput {
                    placeholder: Some(placeholder),
                    ..
                } => placeholder.as_str(),
                _ => "",
            };
            format!("{marker} [{placeholder}]")
        }
        ElementKind::TextInput | ElementKind::TextArea => format!("{marker} [{label}_]"),
        ElementKind::Button | ElementKind::Link => format!("{marker} < {label} >"),
        _ => format!("  {label}"),
    };
    lines.push(Line {
        text,
        element: element.id.clone(),
    });
}

/// Draw the whole frame and return the hit map for the active region.
pub fn draw(
    out: &mut impl Write,
    layer: &ModalLayer,
    focused: Option<&str>,
    host: &[String],
) -> io::Result<HitMap> {
    let (cols, rows) = terminal::size()?;
    queue!(out, Clear(ClearType::All))?;

    for (row, line) in host.iter().enumerate().take(usize::from(rows)) {
        queue!(out, MoveTo(1, row as u16), Print(line))?;
    }

    let mut hits = HitMap::default();
    for (depth, region) in layer.regions().iter().enumerate() {
        let mut lines = Vec::new();
        flatten(&region.element, focused.filter(|_| region.active), &mut lines);

        let inner = lines
            .iter()
            .map(|line| line.text.chars().count())
            .max()
            .unwrap_or(0)
            .max(region.name.len() + 2);
        let width = (inner as u16 + 4).min(cols);
        let height = (lines.len() as u16 + 2).min(rows);
        let offset = depth as u16 * 2;
        let x = (cols.saturating_sub(width) / 2).saturating_add(offset).min(cols.saturating_sub(width));
        let y = (rows.saturating_sub(height) / 2).saturating_add(offset).min(rows.saturating_sub(height));

        if !region.active {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }

        let bar = "-".repeat(usize::from(width.saturating_sub(2)));
        let title = format!("+ {} ", region.name);
        queue!(out, MoveTo(x, y), Print(format!("+{bar}+")), MoveTo(x, y), Print(&title))?;
        for (index, line) in lines.iter().enumerate() {
            let pad = usize::from(width.saturating_sub(3));
            queue!(
                out,
                MoveTo(x, y + 1 + index as u16),
                Print(format!("| {:<pad$}|", line.text))
            )?;
        }
        queue!(out, MoveTo(x, y + height.saturating_sub(1)), Print(format!("+{bar}+")))?;
        queue!(out, SetAttribute(Attribute::Reset))?;

        if region.active {
            let content = region
                .element
                .child_elements()
                .first()
                .map_or_else(|| region.element.id.clone(), |child| child.id.clone());
            hits.active = Some(ActiveBox {
                overlay: region.element.id.clone(),
                content,
                x,
                y,
                width,
                height,
                rows: lines.into_iter().map(|line| line.element).collect(),
            });
        }
    }

    out.flush()?;
    Ok(hits)
}
