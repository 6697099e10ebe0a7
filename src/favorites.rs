use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::Listing;

/// Listings the user has marked, keyed by listing id
pub struct Favorites {
    ids: BTreeSet<String>,
    cache_file: PathBuf,
}

impl Favorites {
    pub fn new(cache_file: impl AsRef<Path>) -> Self {
        let cache_file = cache_file.as_ref().to_path_buf();
        let ids = Self::load_from_file(&cache_file).unwrap_or_default();

        Self { ids, cache_file }
    }

    fn load_from_file(path: &Path) -> Result<BTreeSet<String>> {
        let content = fs::read_to_string(path)?;
        let ids: BTreeSet<String> = serde_json::from_str(&content)?;
        Ok(ids)
    }

    fn save_to_file(&self) -> Result<()> {
        if let Some(parent) = self.cache_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(&self.ids)?;
        fs::write(&self.cache_file, content)?;
        Ok(())
    }

    /// Flips the mark on a listing, returns whether it is now a favorite
    pub fn toggle(&mut self, listing_id: &str) -> bool {
        let now_favorite = if self.ids.remove(listing_id) {
            false
        } else {
            self.ids.insert(listing_id.to_string());
            true
        };

        if let Err(e) = self.save_to_file() {
            tracing::warn!("Failed to save favorites: {}", e);
        }

        now_favorite
    }

    pub fn contains(&self, listing_id: &str) -> bool {
        self.ids.contains(listing_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Favorite listings of a snapshot, in snapshot order
    pub fn select<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.contains(&l.id)).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
