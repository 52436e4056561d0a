//! Asset loading.
//!
//! Assets are loaded once, before the session is built. The manifest is a
//! JSON document mapping texture names to files relative to the manifest:
//!
//! ```json
//! { "textures": { "ship": "ship.png", "bullet": "bullet.png" } }
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::scene::TextureId;

/// Texture drawn for every player ship.
pub const SHIP_TEXTURE: &str = "ship";

/// Texture drawn for every bullet.
pub const BULLET_TEXTURE: &str = "bullet";

/// Textures a session cannot start without.
pub const REQUIRED_TEXTURES: [&str; 2] = [SHIP_TEXTURE, BULLET_TEXTURE];

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    textures: BTreeMap<String, PathBuf>,
}

/// A texture that was found and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    pub id: TextureId,
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub bytes: usize,
}

/// Everything the loader produced, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    textures: BTreeMap<String, TextureAsset>,
}

impl AssetCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every required texture, with no backing files.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for name in REQUIRED_TEXTURES {
            catalog.insert(name, PathBuf::new(), 0);
        }
        catalog
    }

    /// Record a texture under `name`.
    pub fn insert(&mut self, name: &str, path: PathBuf, bytes: usize) {
        self.textures.insert(
            name.to_string(),
            TextureAsset {
                id: TextureId(name.to_string()),
                path,
                bytes,
            },
        );
    }

    /// Look up a texture by name.
    #[must_use]
    pub fn texture(&self, name: &str) -> Option<&TextureAsset> {
        self.textures.get(name)
    }

    /// Look up a texture that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingTexture`] if `name` was not loaded.
    pub fn require(&self, name: &str) -> Result<TextureId, LoadError> {
        self.texture(name)
            .map(|t| t.id.clone())
            .ok_or_else(|| LoadError::MissingTexture(name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// One-shot asset loading.
pub trait AssetLoader {
    /// Load every asset. There is no progress channel: the future resolves
    /// once, with everything or with the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if any asset is missing or unreadable.
    fn load(&self) -> impl Future<Output = Result<AssetCatalog, LoadError>> + Send;
}

/// Loads textures listed in a JSON manifest.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    manifest: PathBuf,
}

impl ManifestLoader {
    #[must_use]
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
        }
    }

    async fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl AssetLoader for ManifestLoader {
    async fn load(&self) -> Result<AssetCatalog, LoadError> {
        info!(manifest = %self.manifest.display(), "loading assets");
        let raw = Self::read(&self.manifest).await?;
        let manifest: Manifest =
            serde_json::from_slice(&raw).map_err(|source| LoadError::Manifest {
                path: self.manifest.clone(),
                source,
            })?;

        let base = self.manifest.parent().unwrap_or_else(|| Path::new("."));
        let mut catalog = AssetCatalog::new();
        for (name, relative) in manifest.textures {
            let path = base.join(&relative);
            let bytes = Self::read(&path).await?.len();
            debug!(texture = %name, path = %path.display(), bytes, "texture loaded");
            catalog.insert(&name, path, bytes);
        }

        for name in REQUIRED_TEXTURES {
            catalog.require(name)?;
        }

        info!(textures = catalog.len(), "assets loaded");
        Ok(catalog)
    }
}
