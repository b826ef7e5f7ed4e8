use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BUNDLED_WATCHLIST: &str = include_str!("../assets/watchlist.json");

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
struct WatchlistFile {
    #[serde(default)]
    items: Vec<u64>,
}

/// Saved movie ids in insertion order, written through to disk on every
/// change.
#[derive(Debug, Clone)]
pub struct Watchlist {
    items: Vec<u64>,
    path: Option<PathBuf>,
}

impl Watchlist {
    pub fn in_memory(items: Vec<u64>) -> Self {
        let mut list = Self { items: Vec::new(), path: None };
        for id in items {
            if !list.items.contains(&id) {
                list.items.push(id);
            }
        }
        list
    }

    pub fn default_path() -> Option<PathBuf> {
        crate::config::project_dirs().map(|p| p.data_dir().join("watchlist.json"))
    }

    /// Opens the list stored at `path`. A missing or unparsable file is
    /// replaced by the bundled list.
    pub fn open(path: PathBuf) -> Result<Self, anyhow::Error> {
        let items = if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            match serde_json::from_str::<WatchlistFile>(&content) {
                Ok(file) => file.items,
                Err(e) => {
                    warn!(error = %e, "watchlist file unreadable, reseeding");
                    bundled_items()
                }
            }
        } else {
            bundled_items()
        };

        let mut list = Self::in_memory(items);
        list.path = Some(path);
        list.save()?;
        Ok(list)
    }

    pub fn ids(&self) -> &[u64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.contains(&id)
    }

    /// Returns false when the id was already present.
    pub fn add(&mut self, id: u64) -> Result<bool, anyhow::Error> {
        if self.contains(id) {
            return Ok(false);
        }
        self.items.push(id);
        debug!(id, "added to watchlist");
        self.save()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: u64) -> Result<bool, anyhow::Error> {
        let before = self.items.len();
        self.items.retain(|x| *x != id);
        if self.items.len() == before {
            return Ok(false);
        }
        debug!(id, "removed from watchlist");
        self.save()?;
        Ok(true)
    }

    /// Adds the id if absent, removes it otherwise. Returns whether it is
    /// now on the list.
    pub fn toggle(&mut self, id: u64) -> Result<bool, anyhow::Error> {
        if self.contains(id) {
            self.remove(id)?;
            Ok(false)
        } else {
            self.add(id)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<(), anyhow::Error> {
        self.items.clear();
        self.save()
    }

    pub fn to_json(&self) -> Result<String, anyhow::Error> {
        let file = WatchlistFile { items: self.items.clone() };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Writes the list to `path` in the same format it is stored in.
    pub fn export_to(&self, path: &Path) -> Result<(), anyhow::Error> {
        fs::write(path, self.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), count = self.items.len(), "exported watchlist");
        Ok(())
    }

    fn save(&self) -> Result<(), anyhow::Error> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn bundled_items() -> Vec<u64> {
    let seed: WatchlistFile = serde_json::from_str(BUNDLED_WATCHLIST).unwrap_or_default();
    info!(count = seed.items.len(), "seeding watchlist");
    seed.items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_dedups() {
        let list = Watchlist::in_memory(vec![5, 3, 5, 1]);
        assert_eq!(list.ids(), [5, 3, 1]);
    }

    #[test]
    fn test_add_remove_toggle() {
        let mut list = Watchlist::in_memory(vec![]);
        assert!(list.add(7).unwrap());
        assert!(!list.add(7).unwrap());
        assert!(list.contains(7));
        assert!(!list.toggle(7).unwrap());
        assert!(list.is_empty());
        assert!(!list.remove(7).unwrap());
    }

    #[test]
    fn test_bundled_seed_is_valid() {
        let seed: WatchlistFile = serde_json::from_str(BUNDLED_WATCHLIST).unwrap();
        assert!(!seed.items.is_empty());
    }
}
