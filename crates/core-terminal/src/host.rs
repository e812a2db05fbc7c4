//! Collection host that lays sections out as terminal lines.
//!
//! One layout unit is one terminal column. Rows self-size vertically: each
//! text run of a cell becomes one line, with the accessory right-aligned on
//! the first line. Layout is pull-only ([`TerminalHost::layout`] queries the
//! data source from scratch), so applying updates just marks the host dirty.

use anyhow::Result;
use core_adapter::{CollectionDataSource, CollectionHost, Insets, LayoutInspector, Registration};
use core_events::{CommitWaiter, HostUpdate, UpdateBatch, commit_channel};
use core_model::{Accessory, CellContent, IndexPath, SECTION_FOOTER_KIND, SECTION_HEADER_KIND, Tone};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};
use std::cell::{Cell, RefCell};
use std::io::Write;
use tracing::{debug, trace, warn};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns reserved on each side of every section.
pub const SECTION_GUTTER: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Header,
    Item,
    Footer,
    Spacer,
}

/// One laid-out terminal line. `text` is already padded/truncated to `width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub role: LineRole,
    pub index_path: Option<IndexPath>,
    pub indent: u16,
    pub width: u16,
    pub text: String,
    pub tone: Tone,
    pub background: Tone,
    /// Background while selected; `None` paints the selection reversed.
    pub highlighted_background: Option<Tone>,
}

impl RenderedLine {
    fn spacer() -> Self {
        Self {
            role: LineRole::Spacer,
            index_path: None,
            indent: 0,
            width: 0,
            text: String::new(),
            tone: Tone::Default,
            background: Tone::Default,
            highlighted_background: None,
        }
    }

    pub fn is_item(&self) -> bool {
        self.role == LineRole::Item
    }
}

#[derive(Debug)]
pub struct TerminalHost {
    columns: Cell<u16>,
    insets: Insets,
    kinds: RefCell<Vec<&'static str>>,
    registration: Cell<Option<Registration>>,
    dirty: Cell<bool>,
    updates_applied: Cell<usize>,
    reloads: Cell<usize>,
}

impl TerminalHost {
    pub fn new(columns: u16) -> Self {
        let gutter = f32::from(SECTION_GUTTER);
        Self {
            columns: Cell::new(columns),
            insets: Insets::new(0.0, gutter, 0.0, gutter),
            kinds: RefCell::new(Vec::new()),
            registration: Cell::new(None),
            dirty: Cell::new(true),
            updates_applied: Cell::new(0),
            reloads: Cell::new(0),
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns.get()
    }

    pub fn resize(&self, columns: u16) {
        if self.columns.replace(columns) != columns {
            debug!(target: "terminal", columns, "host_resized");
            self.dirty.set(true);
        }
    }

    pub fn needs_repaint(&self) -> bool {
        self.dirty.get()
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub fn updates_applied(&self) -> usize {
        self.updates_applied.get()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }

    fn is_registered(&self, kind: &str) -> bool {
        self.kinds.borrow().iter().any(|k| *k == kind)
    }

    fn uses_inspector(&self) -> bool {
        self.registration
            .get()
            .is_some_and(|r| r.layout_inspector)
    }

    /// Column width granted to cells when no inspector is attached.
    fn default_cell_width(&self) -> f32 {
        (f32::from(self.columns.get()) - self.insets.horizontal()).max(0.0)
    }

    fn cell_columns(&self, inspected: Option<f32>) -> u16 {
        let width = inspected.unwrap_or_else(|| self.default_cell_width());
        let max = self
            .columns
            .get()
            .saturating_sub(SECTION_GUTTER);
        // Width is an f32 layout value; anything non-finite clamps to the frame.
        if width.is_finite() {
            (width.max(0.0) as u16).min(max)
        } else {
            max
        }
    }

    /// Pull the whole collection from `source` and lay it out top to bottom.
    pub fn layout<D>(&self, source: &D) -> Vec<RenderedLine>
    where
        D: CollectionDataSource + LayoutInspector + ?Sized,
    {
        let inspect = self.uses_inspector();
        let indent = SECTION_GUTTER;
        let mut lines = Vec::new();

        for section in 0..source.section_count() {
            if section > 0 {
                lines.push(RenderedLine::spacer());
            }

            if let Some(content) = self.supplementary(source, SECTION_HEADER_KIND, section) {
                let ip = IndexPath::new(section, 0);
                let width = self.cell_columns(inspect.then(|| {
                    source
                        .constrained_size_for_supplementary(SECTION_HEADER_KIND, ip)
                        .max
                        .width
                }));
                push_cell(&mut lines, LineRole::Header, None, indent, width, &content);
            }

            for item in 0..source.item_count(section) {
                let ip = IndexPath::new(section, item);
                let width = self.cell_columns(
                    inspect.then(|| source.constrained_size_for_item(ip).max.width),
                );
                let content = (source.content_at(ip))();
                push_cell(&mut lines, LineRole::Item, Some(ip), indent, width, &content);
            }

            if let Some(content) = self.supplementary(source, SECTION_FOOTER_KIND, section) {
                let ip = IndexPath::new(section, 0);
                let width = self.cell_columns(inspect.then(|| {
                    source
                        .constrained_size_for_supplementary(SECTION_FOOTER_KIND, ip)
                        .max
                        .width
                }));
                push_cell(&mut lines, LineRole::Footer, None, indent, width, &content);
            }
        }

        trace!(target: "terminal", lines = lines.len(), "layout_complete");
        lines
    }

    fn supplementary<D>(
        &self,
        source: &D,
        kind: &'static str,
        section: usize,
    ) -> Option<CellContent>
    where
        D: CollectionDataSource + ?Sized,
    {
        if !self.is_registered(kind) || source.supplementary_count(kind, section) == 0 {
            return None;
        }
        let content = source.supplementary_content(kind, IndexPath::new(section, 0));
        (!content.is_empty()).then_some(content)
    }

    /// Paint `rows` lines starting at `top`, plus an optional status line at the bottom.
    pub fn paint<W: Write>(
        &self,
        out: &mut W,
        lines: &[RenderedLine],
        top: usize,
        rows: u16,
        selected: Option<IndexPath>,
        status: Option<&str>,
    ) -> Result<()> {
        let body_rows = rows.saturating_sub(1);
        queue!(out, Clear(ClearType::All))?;
        for y in 0..body_rows {
            queue!(out, MoveTo(0, y))?;
            let Some(line) = lines.get(top + usize::from(y)) else {
                continue;
            };
            if line.role == LineRole::Spacer {
                continue;
            }
            let is_selected = selected.is_some() && line.index_path == selected;
            let background = match line.highlighted_background {
                Some(tone) if is_selected => tone,
                _ => line.background,
            };
            let (fg, bg) = tone_colors(line.tone, background);
            queue!(
                out,
                MoveTo(line.indent, y),
                SetForegroundColor(fg),
                SetBackgroundColor(bg)
            )?;
            if is_selected && line.highlighted_background.is_none() {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                out,
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        if let Some(status) = status {
            let columns = self.columns.get();
            queue!(
                out,
                MoveTo(0, body_rows),
                Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::DarkGrey),
                Print(fit(status, columns)),
                ResetColor
            )?;
        }
        out.flush()?;
        self.dirty.set(false);
        Ok(())
    }
}

impl CollectionHost for TerminalHost {
    fn register_supplementary_kind(&self, kind: &'static str) {
        let mut kinds = self.kinds.borrow_mut();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    fn attach(&self, registration: Registration) {
        if !registration.data_source {
            warn!(target: "terminal", "attached_without_data_source");
        }
        self.registration.set(Some(registration));
        self.dirty.set(true);
    }

    fn supports_layout_inspection(&self) -> bool {
        true
    }

    fn frame_width(&self) -> f32 {
        f32::from(self.columns.get())
    }

    fn section_insets(&self) -> Option<Insets> {
        Some(self.insets)
    }

    fn apply(&self, batch: UpdateBatch) {
        for update in batch.updates() {
            match update {
                HostUpdate::InsertSections(range) => {
                    trace!(
                        target: "terminal",
                        start = range.start,
                        end = range.end,
                        "insert_sections"
                    );
                }
                HostUpdate::InsertItems(paths) => {
                    trace!(target: "terminal", count = paths.len(), "insert_items");
                }
                HostUpdate::DeleteItems(paths) => {
                    trace!(target: "terminal", count = paths.len(), "delete_items");
                }
                HostUpdate::ReloadData => {
                    trace!(target: "terminal", "reload_in_batch");
                }
            }
        }
        self.updates_applied
            .set(self.updates_applied.get() + batch.len());
        self.dirty.set(true);
    }

    fn reload_data(&self) -> CommitWaiter {
        // Layout is recomputed from the data source on every frame, so the
        // reload is complete as soon as the next paint is scheduled.
        self.reloads.set(self.reloads.get() + 1);
        self.dirty.set(true);
        let (signal, waiter) = commit_channel();
        signal.commit();
        waiter
    }
}

/// Topmost line keeping `selected` within a window of `rows` lines.
pub fn viewport_top(
    lines: &[RenderedLine],
    selected: Option<IndexPath>,
    top: usize,
    rows: usize,
) -> usize {
    let Some(selected) = selected else {
        return top;
    };
    let Some(first) = lines.iter().position(|l| l.index_path == Some(selected)) else {
        return top;
    };
    let last = lines
        .iter()
        .rposition(|l| l.index_path == Some(selected))
        .unwrap_or(first);
    if rows == 0 {
        first
    } else if first < top {
        first
    } else if last >= top + rows {
        last + 1 - rows
    } else {
        top
    }
}

/// Plain-text rendering without escape sequences.
pub fn dump(lines: &[RenderedLine]) -> String {
    let mut out = String::new();
    for line in lines {
        if line.role != LineRole::Spacer {
            out.extend(std::iter::repeat_n(' ', usize::from(line.indent)));
            out.push_str(line.text.trim_end());
        }
        out.push('\n');
    }
    out
}

fn push_cell(
    lines: &mut Vec<RenderedLine>,
    role: LineRole,
    index_path: Option<IndexPath>,
    indent: u16,
    width: u16,
    content: &CellContent,
) {
    let accessory = accessory_label(&content.accessory);
    let mut runs = content.lines.iter();
    let first = runs.next();
    let title = first.map(|r| r.text.as_str()).unwrap_or("");
    let tone = first.map(|r| r.tone).unwrap_or_default();

    lines.push(RenderedLine {
        role,
        index_path,
        indent,
        width,
        text: compose(title, accessory.as_deref(), width),
        tone,
        background: content.background,
        highlighted_background: content.highlighted_background,
    });
    for run in runs {
        lines.push(RenderedLine {
            role,
            index_path,
            indent,
            width,
            text: fit(&run.text, width),
            tone: run.tone,
            background: content.background,
            highlighted_background: content.highlighted_background,
        });
    }
}

fn accessory_label(accessory: &Accessory) -> Option<String> {
    match accessory {
        Accessory::None => None,
        Accessory::Disclosure => Some(">".to_string()),
        Accessory::DetailIndicator => Some("(i)".to_string()),
        Accessory::Switch(true) => Some("[on]".to_string()),
        Accessory::Switch(false) => Some("[off]".to_string()),
        Accessory::Value(v) => Some(format!("{v} >")),
    }
}

/// Left-aligned title with the accessory flush right, exactly `width` columns.
fn compose(title: &str, accessory: Option<&str>, width: u16) -> String {
    let Some(accessory) = accessory else {
        return fit(title, width);
    };
    let acc_w = UnicodeWidthStr::width(accessory);
    let width = usize::from(width);
    if acc_w + 1 > width {
        return fit(title, width as u16);
    }
    let mut s = fit(title, (width - acc_w - 1) as u16);
    s.push(' ');
    s.push_str(accessory);
    s
}

/// Truncate (with an ellipsis) or pad `text` to exactly `width` columns.
fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0;
    if UnicodeWidthStr::width(text) <= width {
        out.push_str(text);
        used = UnicodeWidthStr::width(text);
    } else if width > 0 {
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

fn tone_colors(tone: Tone, background: Tone) -> (Color, Color) {
    let fg = match tone {
        Tone::Default => Color::Reset,
        Tone::Muted => Color::DarkGrey,
        Tone::Accent => Color::Cyan,
        Tone::Danger => Color::Red,
        Tone::Inverse => Color::Black,
    };
    let bg = match background {
        Tone::Inverse => Color::White,
        Tone::Danger => Color::DarkRed,
        Tone::Accent => Color::DarkCyan,
        Tone::Muted => Color::DarkGrey,
        Tone::Default => Color::Reset,
    };
    (fg, bg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("", 0), "");
        // Wide glyphs count two columns.
        assert_eq!(UnicodeWidthStr::width(fit("日本語テキスト", 6).as_str()), 6);
    }

    #[test]
    fn accessory_is_flush_right() {
        let s = compose("About", Some("(i)"), 12);
        assert_eq!(s, "About    (i)");
        assert_eq!(UnicodeWidthStr::width(s.as_str()), 12);
    }

    #[test]
    fn accessory_dropped_when_too_narrow() {
        assert_eq!(compose("About", Some("[off]"), 4), "Abo…");
    }

    #[test]
    fn reload_commits_immediately() {
        let host = TerminalHost::new(40);
        let waiter = host.reload_data();
        assert!(waiter.wait().is_ok());
        assert_eq!(host.reload_count(), 1);
        assert!(host.needs_repaint());
    }

    #[test]
    fn kinds_register_once() {
        let host = TerminalHost::new(40);
        host.register_supplementary_kind(SECTION_HEADER_KIND);
        host.register_supplementary_kind(SECTION_HEADER_KIND);
        assert!(host.is_registered(SECTION_HEADER_KIND));
        assert!(!host.is_registered(SECTION_FOOTER_KIND));
        assert_eq!(host.kinds.borrow().len(), 1);
    }

    fn item_line(ip: IndexPath) -> RenderedLine {
        RenderedLine {
            role: LineRole::Item,
            index_path: Some(ip),
            indent: 0,
            width: 0,
            text: String::new(),
            tone: Tone::Default,
            background: Tone::Default,
            highlighted_background: None,
        }
    }

    #[test]
    fn viewport_follows_selection() {
        let lines: Vec<_> = (0..10).map(|i| item_line(IndexPath::new(0, i))).collect();
        assert_eq!(viewport_top(&lines, Some(IndexPath::new(0, 2)), 0, 4), 0);
        assert_eq!(viewport_top(&lines, Some(IndexPath::new(0, 7)), 0, 4), 4);
        assert_eq!(viewport_top(&lines, Some(IndexPath::new(0, 1)), 4, 4), 1);
        assert_eq!(viewport_top(&lines, None, 3, 4), 3);
        assert_eq!(viewport_top(&lines, Some(IndexPath::new(5, 0)), 3, 4), 3);
    }
}
