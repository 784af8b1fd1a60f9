use crate::helper::filter_helpers::{Category, Filter, Filterable};
use crate::helper::sanitization_helpers;
use crate::models::block::{Attachment, Block, BlockImage, TextContent};
use serde::Serialize;

pub const UNTITLED: &str = "Untitled";

/// Percent-encodes `value` for use as one path segment.
fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Builds links into the public site.
#[derive(Debug, Clone)]
pub struct SiteLinks {
    base: String,
}

impl SiteLinks {
    pub fn new(site_url: &str) -> Self {
        SiteLinks { base: site_url.trim_end_matches('/').to_string() }
    }

    pub fn block(&self, id: &str) -> String {
        format!("{}/block/{}", self.base, path_segment(id))
    }

    pub fn channel(&self, slug: &str) -> String {
        format!("{}/channel/{}", self.base, slug)
    }

    pub fn profile(&self, slug: &str) -> String {
        format!("{}/{}", self.base, slug)
    }
}

/// What a media region shows. Every block maps to exactly one of these.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaView {
    /// Responsive image with breakpoints at 500px and 1000px.
    Picture { small: String, medium: String, large: String, alt: String, caption: String },
    Image { src: String, alt: String },
    Text { plain: String },
    Video { src: String },
    Audio { src: String },
    Pdf { src: String, height: u32 },
    /// An attachment the page cannot play inline.
    File { src: String, filename: String },
    /// Provider markup, emitted verbatim.
    Embed { html: String },
    Placeholder { label: String },
}

/// Which surface the media is rendered for. The dialog prefers larger images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Grid,
    Dialog,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockView {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub class_name: &'static str,
    pub media: MediaView,
    /// Activation target that opens the detail dialog.
    pub href: String,
    pub visible: bool,
}

impl Filterable for BlockView {
    fn category(&self) -> Category {
        self.category
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn attachment_kind(attachment: Option<&Attachment>) -> &str {
    attachment.and_then(|a| a.content_type.as_deref()).unwrap_or_default()
}

pub fn category(block: &Block) -> Category {
    match block {
        Block::Link(_) | Block::Image(_) => Category::Image,
        Block::Text(_) => Category::Text,
        Block::Attachment(b) if attachment_kind(b.attachment.as_ref()).contains("audio") => Category::Audio,
        Block::Attachment(_) | Block::Embed(_) => Category::Attachment,
    }
}

pub fn block_title(block: &Block) -> String {
    block
        .common()
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Plain text of a text block: plain, then markdown, then html with tags stripped.
pub fn text_plain(content: Option<&TextContent>) -> String {
    match content {
        None => String::new(),
        Some(TextContent::Plain(text)) => text.clone(),
        Some(TextContent::Rich(rich)) => rich
            .plain
            .clone()
            .or_else(|| rich.markdown.clone())
            .or_else(|| rich.html.as_deref().map(sanitization_helpers::html_to_text))
            .unwrap_or_default(),
    }
}

fn alt_text(image: Option<&BlockImage>) -> String {
    or_empty(image.and_then(|i| i.alt_text.as_deref()))
}

fn attachment_media(attachment: Option<&Attachment>, surface: Surface, title: &str) -> MediaView {
    let src = or_empty(attachment.and_then(|a| a.url.as_deref()));
    let content_type = attachment_kind(attachment);

    if content_type.contains("video") {
        MediaView::Video { src }
    } else if content_type.contains("pdf") {
        let height = match surface {
            Surface::Grid => 500,
            Surface::Dialog => 360,
        };
        MediaView::Pdf { src, height }
    } else if content_type.contains("audio") {
        MediaView::Audio { src }
    } else {
        let filename = attachment
            .and_then(|a| a.filename.as_deref())
            .filter(|f| !f.is_empty())
            .unwrap_or(title)
            .to_string();
        MediaView::File { src, filename }
    }
}

pub fn media(block: &Block, surface: Surface) -> MediaView {
    let title = block_title(block);
    match block {
        Block::Link(link) => {
            let image = link.image.as_ref();
            let large = image.and_then(|i| i.large_2x().or_else(|| i.medium_2x()));
            match surface {
                Surface::Grid => MediaView::Picture {
                    small: or_empty(image.and_then(BlockImage::small_2x)),
                    medium: or_empty(image.and_then(BlockImage::medium_2x)),
                    large: or_empty(large),
                    alt: alt_text(image),
                    caption: title,
                },
                Surface::Dialog => MediaView::Image { src: or_empty(large), alt: alt_text(image) },
            }
        }
        Block::Image(img) => {
            let image = img.image.as_ref();
            let src = match surface {
                Surface::Grid => image.and_then(|i| i.src.as_deref()),
                Surface::Dialog => image.and_then(|i| i.large_2x().or(i.src.as_deref())),
            };
            MediaView::Image { src: or_empty(src), alt: alt_text(image) }
        }
        Block::Text(text) => MediaView::Text { plain: text_plain(text.content.as_ref()) },
        Block::Attachment(attachment) => attachment_media(attachment.attachment.as_ref(), surface, &title),
        Block::Embed(embed) => match embed.embed.as_ref().and_then(|e| e.html.as_deref()) {
            Some(html) if !html.trim().is_empty() => MediaView::Embed { html: html.to_string() },
            _ => MediaView::Placeholder { label: title },
        },
    }
}

fn class_name(block: &Block, media: &MediaView) -> &'static str {
    match (block, media) {
        (Block::Link(_), _) => "link-block",
        (Block::Image(_), _) => "img-block",
        (Block::Text(_), _) => "text-block",
        (Block::Attachment(_), MediaView::Pdf { .. }) => "pdf-block",
        (Block::Attachment(_), _) => "attachment-block",
        (Block::Embed(_), _) => "embed-block",
    }
}

/// Path that opens the dialog for `id`, keeping the active filter.
pub fn block_href(id: &str, filter: Filter) -> String {
    format!("/blocks/{}{}", path_segment(id), filter.query_suffix())
}

/// One grid item for `block`.
pub fn render_block(block: &Block, filter: Filter) -> BlockView {
    let media = media(block, Surface::Grid);
    BlockView {
        id: block.id().to_string(),
        title: block_title(block),
        category: category(block),
        class_name: class_name(block, &media),
        media,
        href: block_href(block.id(), filter),
        visible: true,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn every_variant_renders_with_its_category() {
        let cases = vec![
            (link(), Category::Image, "link-block"),
            (image(), Category::Image, "img-block"),
            (text(), Category::Text, "text-block"),
            (attachment("video/mp4"), Category::Attachment, "attachment-block"),
            (attachment("audio/mpeg"), Category::Audio, "attachment-block"),
            (attachment("application/pdf"), Category::Attachment, "pdf-block"),
            (embed(), Category::Attachment, "embed-block"),
        ];

        for (block, expected_category, expected_class) in cases {
            let view = render_block(&block, Filter::All);
            assert_eq!(view.category, expected_category, "category for {}", block.kind());
            assert_eq!(view.class_name, expected_class, "class for {}", block.kind());
            assert!(view.visible);
        }
    }

    #[test]
    fn link_renders_three_breakpoints_and_caption() {
        let view = render_block(&link(), Filter::All);
        assert_eq!(
            view.media,
            MediaView::Picture {
                small: "https://img/s.jpg".into(),
                medium: "https://img/m.jpg".into(),
                large: "https://img/l.jpg".into(),
                alt: "a vase".into(),
                caption: "Blown glass studio".into(),
            }
        );
    }

    #[test]
    fn link_without_large_image_falls_back_to_medium() {
        let block = block(json!({ "type": "Link", "id": 1, "image": { "medium": { "src_2x": "https://img/m.jpg" } } }));
        match render_block(&block, Filter::All).media {
            MediaView::Picture { small, large, caption, .. } => {
                assert_eq!(small, "");
                assert_eq!(large, "https://img/m.jpg");
                assert_eq!(caption, UNTITLED);
            }
            other => panic!("expected picture, got {:?}", other),
        }
    }

    #[test]
    fn attachment_dispatches_on_mime_substring() {
        assert!(matches!(media(&attachment("video/webm"), Surface::Grid), MediaView::Video { .. }));
        assert!(matches!(media(&attachment("audio/wav"), Surface::Grid), MediaView::Audio { .. }));
        assert_eq!(
            media(&attachment("application/pdf"), Surface::Grid),
            MediaView::Pdf { src: "https://files/14".into(), height: 500 }
        );
        assert_eq!(
            media(&attachment("application/pdf"), Surface::Dialog),
            MediaView::Pdf { src: "https://files/14".into(), height: 360 }
        );
    }

    #[test]
    fn unplayable_attachment_still_renders_a_link() {
        assert_eq!(
            media(&attachment("application/zip"), Surface::Grid),
            MediaView::File { src: "https://files/14".into(), filename: "kiln.bin".into() }
        );
    }

    #[test]
    fn embed_without_markup_renders_placeholder() {
        let block = block(json!({ "type": "Embed", "id": 2, "title": "Kiln video" }));
        assert_eq!(media(&block, Surface::Grid), MediaView::Placeholder { label: "Kiln video".into() });
    }

    #[test]
    fn embed_markup_is_passed_through() {
        assert_eq!(
            media(&embed(), Surface::Grid),
            MediaView::Embed { html: "<iframe src=\"https://player/1\"></iframe>".into() }
        );
    }

    #[test]
    fn missing_image_fields_degrade_to_empty_strings() {
        let block = block(json!({ "type": "Image", "id": 3 }));
        assert_eq!(media(&block, Surface::Grid), MediaView::Image { src: String::new(), alt: String::new() });
    }

    #[test]
    fn text_falls_back_through_renderings() {
        let from_string = block(json!({ "type": "Text", "id": 1, "content": "bare" }));
        let from_html = block(json!({ "type": "Text", "id": 2, "content": { "html": "<p>tagged</p>" } }));
        let empty = block(json!({ "type": "Text", "id": 3 }));
        assert_eq!(media(&from_string, Surface::Grid), MediaView::Text { plain: "bare".into() });
        assert_eq!(media(&from_html, Surface::Grid), MediaView::Text { plain: "tagged".into() });
        assert_eq!(media(&empty, Surface::Grid), MediaView::Text { plain: String::new() });
    }

    #[test]
    fn activation_link_keeps_active_filter() {
        let view = render_block(&text(), Filter::Only(Category::Text));
        assert_eq!(view.href, "/blocks/13?filter=Text");
        assert_eq!(render_block(&text(), Filter::All).href, "/blocks/13");
    }

    #[test]
    fn html_only_text_is_decoded_before_rendering() {
        let block = block(json!({ "type": "Text", "id": 4, "content": { "html": "<p>Fish &amp; chips</p>" } }));
        assert_eq!(media(&block, Surface::Grid), MediaView::Text { plain: "Fish & chips".into() });
    }

    #[test]
    fn string_ids_are_encoded_in_links() {
        assert_eq!(block_href("a/b?c d", Filter::All), "/blocks/a%2Fb%3Fc%20d");
        assert_eq!(block_href("a/b", Filter::Only(Category::Text)), "/blocks/a%2Fb?filter=Text");
        assert_eq!(SiteLinks::new("https://www.are.na").block("x/y"), "https://www.are.na/block/x%2Fy");
    }

    #[test]
    fn site_links_ignore_trailing_slash() {
        let links = SiteLinks::new("https://www.are.na/");
        assert_eq!(links.block("42"), "https://www.are.na/block/42");
        assert_eq!(links.channel("glassware"), "https://www.are.na/channel/glassware");
        assert_eq!(links.profile("katie-lu"), "https://www.are.na/katie-lu");
    }
}
