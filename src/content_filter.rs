//! Post-fetch content policy applied at the catalog-client boundary.

use crate::api::ListItem;
use crate::config::ContentFilterSettings;
use std::collections::HashSet;

/// A stage that may drop items from every list response before it reaches
/// the list engine.
pub trait ContentFilter: Send + Sync + std::fmt::Debug {
    fn allows(&self, item: &ListItem) -> bool;

    fn apply(&self, items: Vec<ListItem>) -> Vec<ListItem> {
        items.into_iter().filter(|m| self.allows(m)).collect()
    }
}

/// Drops items tagged with an excluded genre, or whose title, original title
/// or overview mention a blocked keyword.
#[derive(Debug, Clone)]
pub struct KeywordGenreFilter {
    excluded_genres: HashSet<u32>,
    blocked_keywords: Vec<String>,
}

impl KeywordGenreFilter {
    pub fn new(excluded_genres: impl IntoIterator<Item = u32>, blocked_keywords: &[String]) -> Self {
        Self {
            excluded_genres: excluded_genres.into_iter().collect(),
            blocked_keywords: blocked_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// `None` when the policy is switched off in the config.
    pub fn from_settings(settings: &ContentFilterSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        Some(Self::new(settings.excluded_genres.iter().copied(), &settings.blocked_keywords))
    }
}

impl ContentFilter for KeywordGenreFilter {
    fn allows(&self, item: &ListItem) -> bool {
        if item.genre_ids.iter().any(|g| self.excluded_genres.contains(g)) {
            return false;
        }
        if self.blocked_keywords.is_empty() {
            return true;
        }
        let combined = format!(
            "{} {} {}",
            item.title,
            item.overview.as_deref().unwrap_or_default(),
            item.original_title.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        !self.blocked_keywords.iter().any(|k| combined.contains(k.as_str()))
    }
}
