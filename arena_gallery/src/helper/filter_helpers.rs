use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Value of an item's `data-type` attribute. Link previews count as images
/// and audio attachments get a category of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Image,
    Text,
    Attachment,
    #[serde(rename = "audio")]
    Audio,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "Image",
            Category::Text => "Text",
            Category::Attachment => "Attachment",
            Category::Audio => "audio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown filter '{0}'")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Filter::All),
            "image" => Ok(Filter::Only(Category::Image)),
            "text" => Ok(Filter::Only(Category::Text)),
            "attachment" => Ok(Filter::Only(Category::Attachment)),
            "audio" => Ok(Filter::Only(Category::Audio)),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

impl Filter {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(category) => category.as_str(),
        }
    }

    /// Parses a query value, treating anything unrecognised as `All`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::parse::<Filter>) {
            None => Filter::All,
            Some(Ok(filter)) => filter,
            Some(Err(e)) => {
                log::debug!("Ignoring {}, showing everything", e);
                Filter::All
            }
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => *wanted == category,
        }
    }

    /// Query string that keeps this filter on links, empty for `All`.
    pub fn query_suffix(&self) -> String {
        match self {
            Filter::All => String::new(),
            Filter::Only(category) => format!("?filter={}", category.as_str()),
        }
    }
}

pub trait Filterable {
    fn category(&self) -> Category;
    fn set_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilterButton {
    pub label: &'static str,
    pub filter: &'static str,
    pub href: String,
    pub active: bool,
}

/// The navigation bar. Exactly one button is active at a time.
#[derive(Debug, Clone)]
pub struct FilterBar {
    buttons: Vec<(Filter, &'static str)>,
    active: Filter,
}

impl Default for FilterBar {
    fn default() -> Self {
        FilterBar {
            buttons: vec![
                (Filter::All, "All"),
                (Filter::Only(Category::Image), "Images"),
                (Filter::Only(Category::Text), "Text"),
                (Filter::Only(Category::Attachment), "Media"),
                (Filter::Only(Category::Audio), "Audio"),
            ],
            active: Filter::All,
        }
    }
}

impl FilterBar {
    pub fn active(&self) -> Filter {
        self.active
    }

    /// Activates the button for `filter`; a filter without a button falls back to `All`.
    pub fn select(&mut self, filter: Filter) {
        self.active = if self.buttons.iter().any(|(f, _)| *f == filter) {
            filter
        } else {
            Filter::All
        };
    }

    pub fn is_visible(&self, category: Category) -> bool {
        self.active.matches(category)
    }

    pub fn apply<T: Filterable>(&self, items: &mut [T]) {
        for item in items.iter_mut() {
            let visible = self.is_visible(item.category());
            item.set_visible(visible);
        }
    }

    pub fn buttons(&self) -> Vec<FilterButton> {
        self.buttons
            .iter()
            .map(|(filter, label)| FilterButton {
                label: *label,
                filter: filter.as_str(),
                href: format!("/{}", filter.query_suffix()),
                active: *filter == self.active,
            })
            .collect()
    }
}
