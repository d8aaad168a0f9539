//! Sitemap entry model.

use std::fmt;

use chrono::{DateTime, Utc};

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Protocol token for this frequency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }

    /// Parse a protocol token, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Sitemap priority expressed in tenths.
///
/// The protocol wants a decimal between 0.0 and 1.0; storing tenths as an
/// integer keeps comparisons exact and the rendered text stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    /// Build a priority from an integer 1..=10 scale, clamping out-of-range
    /// input into the valid band.
    #[must_use]
    pub fn from_scale(value: i64) -> Self {
        Self(value.clamp(1, 10) as u8)
    }

    /// Tenths value, 1..=10.
    #[must_use]
    pub fn tenths(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 10 {
            write!(f, "1.0")
        } else {
            write!(f, "0.{}", self.0)
        }
    }
}

/// A single URL entry destined for a url-set sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Change frequency.
    pub changefreq: Option<ChangeFreq>,

    /// Priority.
    pub priority: Option<Priority>,
}

/// A media-bearing entry destined for image and video sitemaps.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    /// Absolute URL of the hosting page.
    pub loc: String,

    /// Page title.
    pub title: String,

    /// Plain-text summary of the page.
    pub summary: String,

    /// Thumbnail image URL, if the page has one.
    pub thumbnail: Option<String>,

    /// Video URLs attached to the page.
    pub videos: Vec<String>,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,
}
