use crate::config::Config;
use crate::models::block::{decode_entries, Block};
use crate::models::{null_as_default, Channel, User};
use actix_web::http::header;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Largest response body accepted from the API.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalleryError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        GalleryError::MalformedResponse(e.to_string())
    }
}

/// Anything that can answer a GET with a JSON document.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
    async fn get_json(&self, url: &Url) -> Result<Value, GalleryError>;
}

/// The awc-backed client. Not `Send`; create it on the task that uses it.
pub struct ArenaClient {
    client: awc::Client,
}

impl ArenaClient {
    pub fn new(config: &Config) -> Self {
        let client = awc::Client::builder()
            .timeout(config.request_timeout())
            .add_default_header((header::USER_AGENT, concat!("arena_gallery/", env!("CARGO_PKG_VERSION"))))
            .add_default_header((header::ACCEPT, "application/json"))
            .finish();
        ArenaClient { client }
    }
}

impl JsonSource for ArenaClient {
    async fn get_json(&self, url: &Url) -> Result<Value, GalleryError> {
        log::debug!("GET {}", url);
        let mut response = self
            .client
            .get(url.as_str())
            // Always ask for fresh data.
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .send()
            .await
            .map_err(|e| GalleryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GalleryError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Value>()
            .limit(MAX_BODY_BYTES)
            .await
            .map_err(|e| GalleryError::MalformedResponse(e.to_string()))
    }
}

/// URL builders for the three endpoints the gallery reads.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    per_page: u32,
    sort: String,
}

impl Endpoints {
    pub fn from_config(config: &Config) -> Result<Self, GalleryError> {
        let mut base = Url::parse(&config.api.base_url)?;
        // `Url::join` drops the last segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Endpoints { base, per_page: config.api.per_page, sort: config.api.sort.clone() })
    }

    pub fn channel(&self, slug: &str) -> Result<Url, GalleryError> {
        Ok(self.base.join(&format!("channels/{}", slug))?)
    }

    pub fn user(&self, username: &str) -> Result<Url, GalleryError> {
        Ok(self.base.join(&format!("users/{}", username))?)
    }

    pub fn contents(&self, slug: &str) -> Result<Url, GalleryError> {
        let mut url = self.base.join(&format!("channels/{}/contents", slug))?;
        url.query_pairs_mut()
            .append_pair("per", &self.per_page.to_string())
            .append_pair("sort", &self.sort);
        Ok(url)
    }
}

#[derive(Deserialize, Default)]
struct PageMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    has_more_pages: bool,
}

/// One page of a paginated response. Only lives inside [`fetch_all`].
#[derive(Deserialize)]
struct RawPage {
    #[serde(default, deserialize_with = "null_as_default")]
    data: Vec<Value>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

impl RawPage {
    fn has_more_pages(&self) -> bool {
        self.meta.as_ref().map(|m| m.has_more_pages).unwrap_or(false)
    }
}

/// Returns `url` with its `page` parameter set to `page`, replacing any existing one.
pub fn with_page(url: &Url, page: usize) -> Url {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    next
}

/// Follows `meta.has_more_pages` one page at a time and returns every page's
/// `data` entries concatenated in fetch order.
pub async fn fetch_all<S: JsonSource>(source: &S, url: &Url) -> Result<Vec<Value>, GalleryError> {
    let mut pages: Vec<RawPage> = Vec::new();
    let mut next = url.clone();

    loop {
        let page: RawPage = serde_json::from_value(source.get_json(&next).await?)?;
        let more = page.has_more_pages();
        pages.push(page);

        if !more {
            break;
        }
        next = with_page(url, pages.len() + 1);
    }

    log::debug!("Fetched {} page(s) from {}", pages.len(), url);
    Ok(pages.into_iter().flat_map(|page| page.data).collect())
}

pub async fn fetch_channel<S: JsonSource>(source: &S, endpoints: &Endpoints, slug: &str) -> Result<Channel, GalleryError> {
    let value = source.get_json(&endpoints.channel(slug)?).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn fetch_user<S: JsonSource>(source: &S, endpoints: &Endpoints, username: &str) -> Result<User, GalleryError> {
    let value = source.get_json(&endpoints.user(username)?).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn fetch_blocks<S: JsonSource>(source: &S, endpoints: &Endpoints, slug: &str) -> Result<Vec<Block>, GalleryError> {
    let entries = fetch_all(source, &endpoints.contents(slug)?).await?;
    let total = entries.len();
    let blocks = decode_entries(entries);
    if blocks.len() != total {
        log::info!("Kept {} of {} channel entries as blocks", blocks.len(), total);
    }
    Ok(blocks)
}
