use blockstack_assets::{
    build_catalog, default_manifest, manifest_from_file, AssetManifest, BlockCatalog,
    ManifestProvider, MeshNode,
};
use blockstack_client::SessionConfig;
use blockstack_render::{DisplayMode, DisplayTransform};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/stack.toml";
pub const DEFAULT_BLOCKS_PATH: &str = "config/blocks.json";
pub const DEFAULT_STORE_DIR: &str = "saves";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the stack as if anchored in an immersive camera view.
    pub immersive: bool,
    /// Display-only shift applied in immersive mode.
    pub depth_offset: [f32; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let transform = DisplayTransform::default();
        Self {
            immersive: false,
            depth_offset: transform.depth_offset.to_array(),
        }
    }
}

impl DisplayConfig {
    pub fn transform(&self) -> DisplayTransform {
        DisplayTransform {
            mode: if self.immersive {
                DisplayMode::Immersive
            } else {
                DisplayMode::Orbit
            },
            depth_offset: Vec3::from_array(self.depth_offset),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }
}

/// Load the block catalog from a manifest file, falling back to the built-in palette.
pub fn load_catalog(path: &Path) -> BlockCatalog<MeshNode> {
    let manifest = match manifest_from_file(path) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(
                "Failed to load block manifest {}: {err}. Using built-in palette",
                path.display()
            );
            match default_manifest() {
                Ok(manifest) => manifest,
                Err(err) => {
                    warn!("Built-in palette is invalid: {err}");
                    return BlockCatalog::default();
                }
            }
        }
    };
    catalog_from_manifest(&manifest)
}

fn catalog_from_manifest(manifest: &AssetManifest) -> BlockCatalog<MeshNode> {
    let provider = match ManifestProvider::new(manifest) {
        Ok(provider) => provider,
        Err(err) => {
            warn!(%err, "Block manifest rejected; starting with an empty catalog");
            return BlockCatalog::default();
        }
    };
    let catalog = build_catalog(&provider, &manifest.asset_sources());
    info!(
        sources = provider.len(),
        entries = catalog.len(),
        "Built block catalog"
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_config_parses() {
        let config = AppConfig::load_from_path(Path::new(DEFAULT_CONFIG_PATH));
        assert_eq!(config.session, SessionConfig::default());
        assert!(!config.display.immersive);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [session]
            stack_factor = 1.0

            [display]
            immersive = true
            "#,
        )
        .expect("config parses");
        assert_eq!(config.session.stack_factor, 1.0);
        assert_eq!(config.session.debounce_ms, 300);
        assert_eq!(config.display.transform().mode, DisplayMode::Immersive);
        assert_eq!(config.display.depth_offset, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn missing_manifest_falls_back_to_builtin_palette() {
        let catalog = load_catalog(Path::new("does/not/exist.json"));
        assert_eq!(catalog.len(), 8);
        assert_eq!(
            catalog.names().next(),
            Some("8x2 Block - Part 1")
        );
    }

    #[test]
    fn unreadable_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("stack.toml");
        fs::write(&path, "session = 12").unwrap();
        let config = AppConfig::load_from_path(&path);
        assert_eq!(config.session, SessionConfig::default());
    }
}
