/// Data model for stashed tabs and tab groups.
///
/// Field names on the wire follow the browser extension's record layout
/// (`favIconUrl`, `groupName`, `tabGroups`), so records written by earlier
/// revisions keep loading.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single stashed tab. Identity is by URL; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fav_icon_url: String,
    /// Host part of `url`. Only some records carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Tab {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builds a tab whose `domain` is derived from the URL host.
    ///
    /// URLs without a host (e.g. `about:blank`) leave `domain` empty.
    pub fn from_url(
        url: impl Into<String>,
        title: impl Into<String>,
        fav_icon_url: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let domain = domain_of(&url);
        Self {
            url,
            title: title.into(),
            fav_icon_url: fav_icon_url.into(),
            domain,
        }
    }
}

/// Extracts the host of `url`, if it parses and has one.
pub fn domain_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Closed palette of tab group colors.
///
/// Serialized as the `#RRGGBB` value the popup renders. Deserialization also
/// accepts the lowercase color name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TabGroupColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
}

impl TabGroupColor {
    pub const ALL: [TabGroupColor; 8] = [
        Self::Grey,
        Self::Blue,
        Self::Red,
        Self::Yellow,
        Self::Green,
        Self::Pink,
        Self::Purple,
        Self::Cyan,
    ];

    pub fn to_hex(self) -> &'static str {
        match self {
            Self::Grey => "#BDC1C5",
            Self::Blue => "#8AB4F5",
            Self::Red => "#F28B83",
            Self::Yellow => "#FED56B",
            Self::Green => "#80C998",
            Self::Pink => "#FF8BC8",
            Self::Purple => "#BE9BDC",
            Self::Cyan => "#77D9EB",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
        }
    }

    /// Parses a hex value (any case) or a color name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.to_hex().eq_ignore_ascii_case(s) || c.name() == s)
    }
}

impl fmt::Display for TabGroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TabGroupColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TabGroupColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tab group color: {s}")))
    }
}

/// A named, colored group of tabs. Tab order matches browser order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub tabs: Vec<Tab>,
    pub group_name: String,
    pub color: TabGroupColor,
}

/// The persisted record: loose tabs plus tab groups in display order.
///
/// Always saved as a whole; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStorage {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroup>,
}

impl TabStorage {
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.tab_groups.is_empty()
    }
}
