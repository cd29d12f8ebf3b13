use std::path::{Path, PathBuf};

use anyhow::Context;

/// Resolves asset paths against a base directory.
pub struct AssetLoader {
    base: PathBuf,
}
impl AssetLoader {
    pub fn new_local(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of `path` relative to the base directory.
    pub fn path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base.join(path)
    }

    pub fn get_asset(&self, path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
        let full_path = self.path(path);
        std::fs::read(&full_path).with_context(|| format!("Failure to load {}", full_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_against_the_base() {
        let loader = AssetLoader::new_local("resources");
        assert_eq!(
            loader.path("objects/rock/rock.obj"),
            Path::new("resources").join("objects/rock/rock.obj")
        );
    }

    #[test]
    fn missing_assets_name_the_path() {
        let loader = AssetLoader::new_local(std::env::temp_dir());
        let error = loader.get_asset("orrery-definitely-missing.png").unwrap_err();
        assert!(format!("{error}").contains("orrery-definitely-missing.png"));
    }
}
