//! Production asset delivery
//!
//! Serves the built frontend bundle from a pinned directory. Asset paths
//! resolve to files by exact path; everything else gets the entry document
//! with a 200 so client-side routing keeps working after a hard refresh.

use std::path::{Path, PathBuf};

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ConfigError;

/// Static bundle with SPA fallback.
///
/// The root is canonicalized and verified to contain `index.html` at
/// construction time, so a misconfigured deployment fails before the
/// listener exists instead of 404ing in production.
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
    index: PathBuf,
}

impl StaticSite {
    /// Validate the bundle directory and build the site.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AssetDir` when the directory cannot be
    /// resolved or does not contain an `index.html`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let resolved = std::fs::canonicalize(root).map_err(|e| ConfigError::AssetDir {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        let index = resolved.join("index.html");
        if !index.is_file() {
            return Err(ConfigError::AssetDir {
                path: resolved,
                reason: "index.html not found".to_string(),
            });
        }
        Ok(Self {
            root: resolved,
            index,
        })
    }

    /// Bundle directory after canonicalization.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Install the site as the router's catch-all.
    ///
    /// Uses the router fallback rather than a wildcard route so asset
    /// delivery only sees requests no registered route claimed.
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let service = ServeDir::new(&self.root).not_found_service(ServeFile::new(&self.index));
        router.fallback_service(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_with_index() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>xfchat</html>").unwrap();
        dir
    }

    #[test]
    fn test_valid_bundle_accepted() {
        let dir = bundle_with_index();
        let site = StaticSite::new(dir.path()).unwrap();
        assert!(site.root().is_absolute());
    }

    #[test]
    fn test_missing_directory_rejected() {
        let err = StaticSite::new("/nonexistent/xfchat-bundle").unwrap_err();
        assert!(matches!(err, ConfigError::AssetDir { .. }));
    }

    #[test]
    fn test_directory_without_index_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('xfchat')").unwrap();

        let err = StaticSite::new(dir.path()).unwrap_err();
        match err {
            ConfigError::AssetDir { reason, .. } => assert!(reason.contains("index.html")),
            other => panic!("Expected AssetDir, got {other:?}"),
        }
    }
}
