use crate::constants::CART_STORAGE_KEY;
use crate::models::CartItem;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Key-value store of JSON documents, one file per key, under a data directory
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Storage { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Ensure data directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating {}", self.dir.display()))?;
        }
        Ok(())
    }

    /// Raw text stored under `key`, `None` if never written
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(content))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }

    /// Load the persisted cart. Missing or unreadable data gives an empty cart.
    pub fn load_cart(&self) -> Vec<CartItem> {
        let content = match self.get_item(CART_STORAGE_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored cart");
                return Vec::new();
            }
        };

        // JSON `null` is what an unset cart serializes to
        match serde_json::from_str::<Option<Vec<CartItem>>>(&content) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed stored cart");
                Vec::new()
            }
        }
    }

    pub fn save_cart(&self, cart: &[CartItem]) -> Result<()> {
        let content = serde_json::to_string(cart)?;
        self.set_item(CART_STORAGE_KEY, &content)
    }

    pub fn remove_cart(&self) -> Result<()> {
        self.remove_item(CART_STORAGE_KEY)
    }
}
