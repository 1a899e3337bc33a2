/// Browser tab collaborator.
///
/// The shelf only needs four things from the browser: the active tab, tabs
/// matching a URL, opening a tab, and activating a tab by index. Hosts
/// implement `TabInventory` over their browser API.
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SessionError;
use crate::model::Tab;

/// A live tab in the current browser window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowserTab {
    /// Position in the window's tab strip.
    pub index: usize,
    pub url: String,
    pub title: String,
    pub fav_icon_url: String,
    pub active: bool,
}

impl BrowserTab {
    /// Converts to a stashable tab, deriving the domain from the URL.
    pub fn to_tab(&self) -> Tab {
        Tab::from_url(self.url.clone(), self.title.clone(), self.fav_icon_url.clone())
    }
}

/// Removes the fragment identifier (`#...`) from `url`.
pub fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

/// Access to the tabs of the current normal browser window.
#[async_trait]
pub trait TabInventory: Send + Sync {
    /// The active tab, if the window has one.
    async fn current_tab(&self) -> Result<Option<BrowserTab>, SessionError>;

    /// Tabs whose URL matches `url`, ignoring fragments on both sides.
    async fn find_by_url(&self, url: &str) -> Result<Vec<BrowserTab>, SessionError>;

    /// Opens a new tab at `url`.
    async fn create(&self, url: &str, active: bool) -> Result<BrowserTab, SessionError>;

    /// Activates the tab at `index`.
    async fn to_active(&self, index: usize) -> Result<(), SessionError>;
}

/// A browser window simulated in memory.
#[derive(Debug, Default)]
pub struct MemoryTabInventory {
    tabs: Mutex<Vec<BrowserTab>>,
}

impl MemoryTabInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a window with one tab per `(url, title)`; the first is active.
    pub fn with_tabs<'a>(tabs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let tabs = tabs
            .into_iter()
            .enumerate()
            .map(|(index, (url, title))| BrowserTab {
                index,
                url: url.to_string(),
                title: title.to_string(),
                fav_icon_url: String::new(),
                active: index == 0,
            })
            .collect();
        Self {
            tabs: Mutex::new(tabs),
        }
    }

    /// All tabs in strip order.
    pub fn tabs(&self) -> Vec<BrowserTab> {
        self.tabs.lock().clone()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tabs.lock().iter().position(|t| t.active)
    }
}

#[async_trait]
impl TabInventory for MemoryTabInventory {
    async fn current_tab(&self) -> Result<Option<BrowserTab>, SessionError> {
        Ok(self.tabs.lock().iter().find(|t| t.active).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Vec<BrowserTab>, SessionError> {
        let wanted = strip_fragment(url);
        Ok(self
            .tabs
            .lock()
            .iter()
            .filter(|t| strip_fragment(&t.url) == wanted)
            .cloned()
            .collect())
    }

    async fn create(&self, url: &str, active: bool) -> Result<BrowserTab, SessionError> {
        let mut tabs = self.tabs.lock();
        if active {
            tabs.iter_mut().for_each(|t| t.active = false);
        }
        let tab = BrowserTab {
            index: tabs.len(),
            url: url.to_string(),
            title: String::new(),
            fav_icon_url: String::new(),
            active,
        };
        tabs.push(tab.clone());
        Ok(tab)
    }

    async fn to_active(&self, index: usize) -> Result<(), SessionError> {
        let mut tabs = self.tabs.lock();
        if index >= tabs.len() {
            return Err(SessionError::Inventory(format!(
                "no tab at index {index} (window has {})",
                tabs.len()
            )));
        }
        for tab in tabs.iter_mut() {
            tab.active = tab.index == index;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        assert_eq!(strip_fragment("https://a.test/page#section"), "https://a.test/page");
        assert_eq!(strip_fragment("https://a.test/page"), "https://a.test/page");
        assert_eq!(strip_fragment("https://a.test/#a#b"), "https://a.test/");
    }

    #[test]
    fn test_to_tab_derives_domain() {
        let browser_tab = BrowserTab {
            url: "https://www.rust-lang.org/learn".to_string(),
            title: "Learn Rust".to_string(),
            ..Default::default()
        };
        let tab = browser_tab.to_tab();
        assert_eq!(tab.domain.as_deref(), Some("www.rust-lang.org"));
        assert_eq!(tab.title, "Learn Rust");
    }

    #[tokio::test]
    async fn test_current_tab_is_first_by_default() {
        let inv = MemoryTabInventory::with_tabs([("https://a.test", "A"), ("https://b.test", "B")]);
        let current = inv.current_tab().await.unwrap().expect("active tab");
        assert_eq!(current.url, "https://a.test");
        assert!(MemoryTabInventory::new().current_tab().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_url_ignores_fragment() {
        let inv = MemoryTabInventory::with_tabs([
            ("https://a.test/doc#intro", "A"),
            ("https://b.test", "B"),
        ]);
        let found = inv.find_by_url("https://a.test/doc#usage").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 0);
    }

    #[tokio::test]
    async fn test_create_active_moves_focus() {
        let inv = MemoryTabInventory::with_tabs([("https://a.test", "A")]);
        let created = inv.create("https://new.test", true).await.unwrap();
        assert_eq!(created.index, 1);
        assert_eq!(inv.active_index(), Some(1));

        inv.create("https://background.test", false).await.unwrap();
        assert_eq!(inv.active_index(), Some(1));
        assert_eq!(inv.tabs().len(), 3);
    }

    #[tokio::test]
    async fn test_to_active() {
        let inv = MemoryTabInventory::with_tabs([("https://a.test", "A"), ("https://b.test", "B")]);
        inv.to_active(1).await.unwrap();
        assert_eq!(inv.active_index(), Some(1));
        assert!(matches!(
            inv.to_active(5).await,
            Err(SessionError::Inventory(_))
        ));
    }
}
