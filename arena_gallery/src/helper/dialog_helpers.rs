use crate::helper::render_helpers::{self, MediaView, SiteLinks, Surface};
use crate::helper::sanitization_helpers;
use crate::models::block::Block;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// Body class that suppresses page scrolling while the dialog is open.
pub const MODAL_OPEN_CLASS: &str = "modal-open";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Closed,
    Open,
}

/// Ways the dialog can be dismissed. All of them run the same cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    /// Dismissed by the browser itself, e.g. the Escape key.
    NativeDismiss,
}

/// Where a click inside the dialog element landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetaValue {
    Text { text: String },
    Link { href: String, text: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetaRow {
    pub label: &'static str,
    pub value: MetaValue,
}

/// Everything the dialog shows for its current occupant.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DialogFields {
    pub block_id: Option<String>,
    pub title: String,
    pub badge: String,
    pub description_html: Option<String>,
    pub media: Option<MediaView>,
    pub arena_link: String,
    pub source_link: Option<String>,
    pub meta_rows: Vec<MetaRow>,
}

/// The single detail dialog of a gallery page.
#[derive(Debug, Clone, Serialize)]
pub struct DetailDialog {
    state: DialogState,
    fields: DialogFields,
    scroll_top: u32,
    scroll_locked: bool,
}

impl Default for DetailDialog {
    fn default() -> Self {
        DetailDialog {
            state: DialogState::Closed,
            fields: DialogFields::default(),
            scroll_top: 0,
            scroll_locked: false,
        }
    }
}

/// Formats an API timestamp as e.g. "Jan 1, 2025". Accepts RFC 3339 or a bare date.
pub fn format_added_date(raw: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%b %-d, %Y").to_string())
}

fn meta_rows(block: &Block, links: &SiteLinks) -> Vec<MetaRow> {
    let mut rows = Vec::new();
    let common = block.common();

    if let Some(url) = block.source_url() {
        rows.push(MetaRow {
            label: "SOURCE",
            value: MetaValue::Link { href: url.to_string(), text: sanitization_helpers::display_source_url(url) },
        });
    }
    if let Some(date) = common.created_at.as_deref().and_then(format_added_date) {
        rows.push(MetaRow { label: "ADDED", value: MetaValue::Text { text: date } });
    }
    rows.push(MetaRow { label: "TYPE", value: MetaValue::Text { text: block.kind().label().to_uppercase() } });
    if let Some(user) = common.user.as_ref() {
        if let (Some(name), Some(slug)) = (user.display_name(), user.profile_slug()) {
            rows.push(MetaRow {
                label: "ADDED BY",
                value: MetaValue::Link { href: links.profile(slug), text: name.to_string() },
            });
        }
    }
    rows
}

impl DetailDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn fields(&self) -> &DialogFields {
        &self.fields
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Classes for the page body.
    pub fn body_class(&self) -> &'static str {
        if self.scroll_locked {
            MODAL_OPEN_CLASS
        } else {
            ""
        }
    }

    /// Clears the previous occupant, shows `block`, and locks page scroll.
    pub fn open(&mut self, block: &Block, links: &SiteLinks) {
        self.fields = DialogFields::default();

        let common = block.common();
        self.fields.block_id = Some(common.id.clone());
        self.fields.title = render_helpers::block_title(block);
        self.fields.badge = block.kind().label().to_uppercase();
        self.fields.description_html = common
            .description
            .as_ref()
            .and_then(|d| d.html())
            .map(sanitization_helpers::sanitize_rich_html);
        self.fields.media = Some(render_helpers::media(block, Surface::Dialog));
        self.fields.arena_link = links.block(&common.id);
        self.fields.source_link = block.source_url().map(str::to_string);
        self.fields.meta_rows = meta_rows(block, links);

        self.scroll_top = 0;
        self.scroll_locked = true;
        self.state = DialogState::Open;
        log::debug!("Dialog opened for block {}", common.id);
    }

    /// Closes the dialog. Returns false when it was already closed.
    /// On the page every trigger is a link to `close_href`, which renders a fresh closed dialog.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        // Every path releases the body lock, even when the dialog is already closed.
        self.scroll_locked = false;
        if self.state == DialogState::Closed {
            return false;
        }
        self.state = DialogState::Closed;
        log::debug!("Dialog closed via {:?}", trigger);
        true
    }

    /// Clicks inside the dialog element only close it when they land on the backdrop.
    pub fn click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop => self.close(CloseTrigger::Backdrop),
            ClickTarget::Content => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::render_helpers::fixtures::*;
    use serde_json::json;

    fn links() -> SiteLinks {
        SiteLinks::new("https://www.are.na")
    }

    fn labels(dialog: &DetailDialog) -> Vec<&'static str> {
        dialog.fields().meta_rows.iter().map(|r| r.label).collect()
    }

    #[test]
    fn starts_closed_and_unlocked() {
        let dialog = DetailDialog::new();
        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(dialog.body_class(), "");
    }

    #[test]
    fn opening_populates_every_field_of_a_link() {
        let mut dialog = DetailDialog::new();
        dialog.open(&link(), &links());
        let fields = dialog.fields();

        assert!(dialog.is_open());
        assert_eq!(dialog.body_class(), MODAL_OPEN_CLASS);
        assert_eq!(dialog.scroll_top(), 0);
        assert_eq!(fields.title, "Blown glass studio");
        assert_eq!(fields.badge, "LINK");
        assert_eq!(fields.arena_link, "https://www.are.na/block/11");
        assert_eq!(
            fields.source_link.as_deref(),
            Some("https://www.example.com/articles/2024/glass-and-light-in-the-studio")
        );
        assert_eq!(fields.media, Some(MediaView::Image { src: "https://img/l.jpg".into(), alt: "a vase".into() }));
        assert!(fields.description_html.as_deref().unwrap().contains("<em>walk</em>"));
        assert_eq!(labels(&dialog), vec!["SOURCE", "ADDED", "TYPE", "ADDED BY"]);
        assert_eq!(
            fields.meta_rows[1].value,
            MetaValue::Text { text: "Jan 1, 2025".into() }
        );
        assert_eq!(
            fields.meta_rows[3].value,
            MetaValue::Link { href: "https://www.are.na/katie-lu".into(), text: "Katie Lu".into() }
        );
    }

    #[test]
    fn untitled_fallback_and_badge_for_bare_text() {
        let mut dialog = DetailDialog::new();
        dialog.open(&text(), &links());
        assert_eq!(dialog.fields().title, "Untitled");
        assert_eq!(dialog.fields().badge, "TEXT");
        assert_eq!(dialog.fields().source_link, None);
        assert_eq!(labels(&dialog), vec!["TYPE"]);
    }

    #[test]
    fn second_open_replaces_all_fields() {
        let mut dialog = DetailDialog::new();
        dialog.open(&link(), &links());
        dialog.open(&image(), &links());
        let fields = dialog.fields();

        assert_eq!(fields.block_id.as_deref(), Some("12"));
        assert_eq!(fields.badge, "IMAGE");
        assert_eq!(fields.source_link, None);
        assert_eq!(fields.description_html, None);
        assert_eq!(labels(&dialog), vec!["TYPE"]);
    }

    #[test]
    fn every_close_path_releases_the_scroll_lock() {
        for trigger in [CloseTrigger::CloseButton, CloseTrigger::Backdrop, CloseTrigger::NativeDismiss] {
            let mut dialog = DetailDialog::new();
            dialog.open(&embed(), &links());
            assert!(dialog.close(trigger));
            assert_eq!(dialog.state(), DialogState::Closed);
            assert!(!dialog.is_scroll_locked());
            assert_eq!(dialog.body_class(), "");
        }
    }

    #[test]
    fn clicks_on_content_do_not_close() {
        let mut dialog = DetailDialog::new();
        dialog.open(&image(), &links());
        assert!(!dialog.click(ClickTarget::Content));
        assert!(dialog.is_open());
        assert!(dialog.click(ClickTarget::Backdrop));
        assert!(!dialog.is_open());
    }

    #[test]
    fn native_dismiss_after_button_close_is_harmless() {
        let mut dialog = DetailDialog::new();
        dialog.open(&image(), &links());
        assert!(dialog.close(CloseTrigger::CloseButton));
        assert!(!dialog.close(CloseTrigger::NativeDismiss));
        assert_eq!(dialog.body_class(), "");
    }

    #[test]
    fn user_row_needs_a_name() {
        let block = block(json!({ "type": "Image", "id": 5, "user": { "id": 3, "slug": "anon" } }));
        let mut dialog = DetailDialog::new();
        dialog.open(&block, &links());
        assert_eq!(labels(&dialog), vec!["TYPE"]);
    }

    #[test]
    fn unparseable_dates_are_omitted() {
        assert_eq!(format_added_date("2025-03-09T08:15:00.000Z").as_deref(), Some("Mar 9, 2025"));
        assert_eq!(format_added_date("2024-12-31").as_deref(), Some("Dec 31, 2024"));
        assert_eq!(format_added_date("yesterday"), None);
    }
}
