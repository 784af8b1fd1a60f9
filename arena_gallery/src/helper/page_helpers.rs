use crate::config::Config;
use crate::helper::dialog_helpers::{DetailDialog, DialogFields};
use crate::helper::filter_helpers::{Filter, FilterBar, FilterButton};
use crate::helper::render_helpers::{self, BlockView, SiteLinks};
use crate::helper::sanitization_helpers;
use crate::models::{Channel, Region, User};
use crate::AppState;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    Loading,
    Ready,
    Error,
}

/// A page region as the template sees it: data when ready, otherwise an inline message.
#[derive(Debug, Serialize)]
pub struct RegionView<T> {
    pub status: RegionStatus,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> RegionView<T> {
    pub fn from_region<U>(region: &Region<U>, what: &str, build: impl FnOnce(&U) -> T) -> Self {
        match region {
            Region::Loading => RegionView {
                status: RegionStatus::Loading,
                data: None,
                message: Some(format!("Loading {}…", what)),
            },
            Region::Ready(value) => RegionView { status: RegionStatus::Ready, data: Some(build(value)), message: None },
            Region::Failed(e) => RegionView {
                status: RegionStatus::Error,
                data: None,
                message: Some(format!("Could not load {}: {}", what, e)),
            },
        }
    }
}

impl<T> RegionView<Option<T>> {
    /// Drops a ready region whose value is absent; loading and error slots stay.
    pub fn flatten(self) -> Option<RegionView<T>> {
        match (self.status, self.data) {
            (RegionStatus::Ready, Some(None)) | (RegionStatus::Ready, None) => None,
            (status, data) => Some(RegionView { status, data: data.flatten(), message: self.message }),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HeaderView {
    pub title: String,
    pub description_html: String,
    pub count: u64,
    pub channel_url: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ContributorView {
    pub name: String,
    pub profile_url: Option<String>,
}

pub fn header_view(channel: &Channel, links: &SiteLinks, slug: &str) -> HeaderView {
    HeaderView {
        title: channel.title.clone(),
        description_html: channel
            .description
            .as_ref()
            .and_then(|d| d.html())
            .map(sanitization_helpers::sanitize_rich_html)
            .unwrap_or_default(),
        count: channel.counts.blocks,
        channel_url: links.channel(channel.slug.as_deref().unwrap_or(slug)),
    }
}

/// Full name, then handle, then the configured placeholder.
pub fn contributor_view(user: &User, links: &SiteLinks, fallback_name: &str) -> ContributorView {
    ContributorView {
        name: user.display_name().unwrap_or(fallback_name).to_string(),
        profile_url: user.profile_slug().map(|slug| links.profile(slug)),
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryPage {
    pub header: RegionView<HeaderView>,
    /// Channel owner first, then the local profile.
    pub contributors: Vec<RegionView<ContributorView>>,
    pub blocks: RegionView<Vec<BlockView>>,
    pub visible_count: usize,
    pub nav: Vec<FilterButton>,
    pub active_filter: &'static str,
    pub dialog_open: bool,
    pub dialog: DialogFields,
    pub dialog_scroll_top: u32,
    pub body_class: &'static str,
    /// Where the close button and backdrop lead.
    pub close_href: String,
    /// Set when the requested block is not part of the channel.
    pub missing_block: Option<String>,
}

/// Composes the whole page from the three regions; `open_block` activates one item.
pub fn build_gallery_page(state: &AppState, config: &Config, filter: Filter, open_block: Option<&str>) -> GalleryPage {
    let links = SiteLinks::new(&config.api.site_url);
    let mut bar = FilterBar::default();
    bar.select(filter);
    let filter = bar.active();

    let channel = state.channel();
    let header = RegionView::from_region(&*channel, "channel", |c| header_view(c, &links, &config.channel_slug));

    let owner = RegionView::from_region(&*channel, "channel owner", |c| {
        c.owner.as_ref().map(|owner| contributor_view(owner, &links, &config.fallback_display_name))
    });
    drop(channel);

    let mut contributors = Vec::with_capacity(2);
    contributors.extend(owner.flatten());
    contributors.push(RegionView::from_region(&*state.profile(), "profile", |u| {
        contributor_view(u, &links, &config.fallback_display_name)
    }));

    let mut dialog = DetailDialog::new();
    let mut missing_block = None;

    let blocks_region = state.blocks();
    let blocks = RegionView::from_region(&*blocks_region, "blocks", |blocks| {
        let mut views: Vec<BlockView> = blocks.iter().map(|b| render_helpers::render_block(b, filter)).collect();
        bar.apply(&mut views);
        views
    });

    if let Some(id) = open_block {
        match blocks_region.ready().and_then(|blocks| blocks.iter().find(|b| b.id() == id)) {
            Some(block) => dialog.open(block, &links),
            None => {
                log::info!("Requested block {} is not in channel {}", id, config.channel_slug);
                missing_block = Some(id.to_string());
            }
        }
    }
    drop(blocks_region);

    let visible_count = blocks.data.as_ref().map(|v| v.iter().filter(|b| b.visible).count()).unwrap_or(0);

    GalleryPage {
        header,
        contributors,
        blocks,
        visible_count,
        nav: bar.buttons(),
        active_filter: filter.as_str(),
        dialog_open: dialog.is_open(),
        dialog_scroll_top: dialog.scroll_top(),
        body_class: dialog.body_class(),
        dialog: dialog.fields().clone(),
        close_href: format!("/{}", filter.query_suffix()),
        missing_block,
    }
}
