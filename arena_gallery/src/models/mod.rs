use crate::helper::arena_client::GalleryError;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl From<NumberOrString> for String {
    fn from(id: NumberOrString) -> Self {
        match id {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s,
        }
    }
}

/// Accepts identifiers sent either as JSON numbers or strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(NumberOrString::deserialize(deserializer)?.into())
}

/// Like [`deserialize_id`], but `null` becomes an empty id.
pub(crate) fn deserialize_nullable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.map(String::from).unwrap_or_default())
}

/// Reads an explicit `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rich text as the API delivers it. Any of the renderings may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RichText {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub plain: Option<String>,
}

impl RichText {
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.trim().is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct User {
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Full name, then handle. `None` when the record carries neither.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.full_name.as_deref()).or_else(|| non_empty(self.username.as_deref()))
    }

    /// Slug used in profile URLs; older records only carry a username.
    pub fn profile_slug(&self) -> Option<&str> {
        non_empty(self.slug.as_deref()).or_else(|| non_empty(self.username.as_deref()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Counts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Channel {
    #[serde(deserialize_with = "deserialize_nullable_id")]
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<RichText>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub counts: Counts,
    #[serde(default)]
    pub owner: Option<User>,
}

/// Outcome of one independent fetch chain.
#[derive(Debug, Clone)]
pub enum Region<T> {
    Loading,
    Ready(T),
    Failed(GalleryError),
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Region::Loading
    }
}

impl<T> Region<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Region::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Stores a fetch outcome. A failed refresh keeps the last good value.
    pub fn store(&mut self, outcome: Result<T, GalleryError>) {
        match outcome {
            Ok(value) => *self = Region::Ready(value),
            Err(e) if matches!(self, Region::Ready(_)) => {
                log::warn!("Refresh failed, keeping previously loaded data: {}", e);
            }
            Err(e) => *self = Region::Failed(e),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub mod block;
