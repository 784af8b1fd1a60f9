use super::{deserialize_id, RichText, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImageVersion {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub src_2x: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BlockImage {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub small: Option<ImageVersion>,
    #[serde(default)]
    pub medium: Option<ImageVersion>,
    #[serde(default)]
    pub large: Option<ImageVersion>,
}

impl BlockImage {
    pub fn small_2x(&self) -> Option<&str> {
        self.small.as_ref().and_then(|v| v.src_2x.as_deref())
    }

    pub fn medium_2x(&self) -> Option<&str> {
        self.medium.as_ref().and_then(|v| v.src_2x.as_deref())
    }

    pub fn large_2x(&self) -> Option<&str> {
        self.large.as_ref().and_then(|v| v.src_2x.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Source {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Attachment {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Text blocks carry either a bare string or a rich-text object.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextContent {
    Plain(String),
    Rich(RichText),
}

/// Fields shared by every block variant.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BlockCommon {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<RichText>,
    /// Kept as the raw timestamp; parsed when rendered.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinkBlock {
    #[serde(flatten)]
    pub common: BlockCommon,
    #[serde(default)]
    pub image: Option<BlockImage>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageBlock {
    #[serde(flatten)]
    pub common: BlockCommon,
    #[serde(default)]
    pub image: Option<BlockImage>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TextBlock {
    #[serde(flatten)]
    pub common: BlockCommon,
    #[serde(default)]
    pub content: Option<TextContent>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttachmentBlock {
    #[serde(flatten)]
    pub common: BlockCommon,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedBlock {
    #[serde(flatten)]
    pub common: BlockCommon,
    #[serde(default)]
    pub embed: Option<Embed>,
    #[serde(default)]
    pub source: Option<Source>,
}

/// One entry of a channel, discriminated by the API's `type` label.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Block {
    Link(LinkBlock),
    Image(ImageBlock),
    Text(TextBlock),
    Attachment(AttachmentBlock),
    Embed(EmbedBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Link,
    Image,
    Text,
    Attachment,
    Embed,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Link,
        BlockKind::Image,
        BlockKind::Text,
        BlockKind::Attachment,
        BlockKind::Embed,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            BlockKind::Link => "Link",
            BlockKind::Image => "Image",
            BlockKind::Text => "Text",
            BlockKind::Attachment => "Attachment",
            BlockKind::Embed => "Embed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a raw channel entry did not become a [`Block`].
#[derive(Debug, PartialEq)]
pub enum SkippedEntry {
    /// A `type` outside the five block variants, e.g. a nested channel.
    Unsupported(String),
    Malformed { kind: BlockKind, reason: String },
}

impl Block {
    pub fn common(&self) -> &BlockCommon {
        match self {
            Block::Link(b) => &b.common,
            Block::Image(b) => &b.common,
            Block::Text(b) => &b.common,
            Block::Attachment(b) => &b.common,
            Block::Embed(b) => &b.common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Link(_) => BlockKind::Link,
            Block::Image(_) => BlockKind::Image,
            Block::Text(_) => BlockKind::Text,
            Block::Attachment(_) => BlockKind::Attachment,
            Block::Embed(_) => BlockKind::Embed,
        }
    }

    /// The source link when the variant carries one and it is non-empty.
    pub fn source_url(&self) -> Option<&str> {
        let source = match self {
            Block::Link(b) => b.source.as_ref(),
            Block::Image(b) => b.source.as_ref(),
            Block::Embed(b) => b.source.as_ref(),
            Block::Text(_) | Block::Attachment(_) => None,
        };
        source
            .and_then(|s| s.url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn from_entry(entry: Value) -> Result<Block, SkippedEntry> {
        let label = entry
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let kind = BlockKind::from_label(&label).ok_or(SkippedEntry::Unsupported(label))?;
        serde_json::from_value(entry).map_err(|e| SkippedEntry::Malformed { kind, reason: e.to_string() })
    }
}

/// Decodes raw channel entries, logging and dropping the ones that are not blocks.
pub fn decode_entries(entries: Vec<Value>) -> Vec<Block> {
    entries
        .into_iter()
        .filter_map(|entry| match Block::from_entry(entry) {
            Ok(block) => Some(block),
            Err(SkippedEntry::Unsupported(label)) => {
                log::debug!("Skipping channel entry of unsupported type '{}'", label);
                None
            }
            Err(SkippedEntry::Malformed { kind, reason }) => {
                log::warn!("Skipping malformed {} block: {}", kind, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_variant_from_type_label() {
        let entries = vec![
            json!({ "type": "Link", "id": 1, "source": { "url": "https://example.com" } }),
            json!({ "type": "Image", "id": 2, "image": { "src": "https://img/2.png" } }),
            json!({ "type": "Text", "id": 3, "content": "plain words" }),
            json!({ "type": "Attachment", "id": 4, "attachment": { "url": "https://f/4.mp3", "content_type": "audio/mpeg" } }),
            json!({ "type": "Embed", "id": 5, "embed": { "html": "<iframe></iframe>" } }),
        ];
        let kinds: Vec<BlockKind> = decode_entries(entries).iter().map(Block::kind).collect();
        assert_eq!(kinds, BlockKind::ALL.to_vec());
    }

    #[test]
    fn text_content_accepts_rich_object() {
        let block = Block::from_entry(json!({
            "type": "Text",
            "id": "abc",
            "content": { "plain": "hello", "html": "<p>hello</p>" }
        }))
        .unwrap();
        match block {
            Block::Text(text) => assert_eq!(
                text.content,
                Some(TextContent::Rich(RichText {
                    plain: Some("hello".into()),
                    html: Some("<p>hello</p>".into()),
                    markdown: None
                }))
            ),
            other => panic!("expected text block, got {:?}", other.kind()),
        }
    }

    #[test]
    fn nested_channels_are_skipped_as_unsupported() {
        let result = Block::from_entry(json!({ "type": "Channel", "id": 9 }));
        assert_eq!(result, Err(SkippedEntry::Unsupported("Channel".into())));
    }

    #[test]
    fn known_type_without_id_is_malformed() {
        let result = Block::from_entry(json!({ "type": "Image", "title": "no id" }));
        assert!(matches!(result, Err(SkippedEntry::Malformed { kind: BlockKind::Image, .. })));
    }

    #[test]
    fn blank_source_url_is_ignored() {
        let block = Block::from_entry(json!({ "type": "Link", "id": 1, "source": { "url": " " } })).unwrap();
        assert_eq!(block.source_url(), None);
    }
}
