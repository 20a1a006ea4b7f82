//! Where rendered images live and how they are named.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// A freshly allocated image location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Filesystem path to write the PNG to.
    pub path: PathBuf,
    /// Public URL the page should reference.
    pub url: String,
}

/// Directory of rendered images, served publicly under `url_prefix`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a random `<prefix>_<32 hex>.png` name, creating the directory if needed.
    pub fn allocate(&self, prefix: &str) -> Result<StoredImage, AppError> {
        create_dir_all(&self.dir).map_err(|e| {
            AppError::Io(format!("Failed to create image dir '{}': {e}", self.dir.display()))
        })?;

        let name = format!("{prefix}_{:032x}.png", rand::random::<u128>());
        Ok(StoredImage {
            path: self.dir.join(&name),
            url: format!("{}/{name}", self.url_prefix),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_creates_dir_and_unique_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("static"), "/static/");

        let a = store.allocate("fit").unwrap();
        let b = store.allocate("fit").unwrap();

        assert!(store.dir().is_dir());
        assert_ne!(a.path, b.path);
        assert!(a.path.starts_with(store.dir()));
        assert!(a.url.starts_with("/static/fit_"));
        assert!(a.url.ends_with(".png"));
        // prefix + '_' + 32 hex + ".png"
        let name = a.path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), "fit_".len() + 32 + ".png".len());
    }
}
