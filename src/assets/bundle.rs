use std::{
    collections::HashMap,
    io::{Cursor, Read},
    path::Path,
};

use anyhow::Context;

use crate::foundation::error::{SkinampError, SkinampResult};

/// In-memory skin bundle: every file of a skin archive, indexed by lower-cased name.
///
/// Skins are tiny (a few dozen bitmaps), so the whole archive is read up front and
/// no file handle is kept open afterwards.
#[derive(Clone, Debug, Default)]
pub struct SkinBundle {
    files: HashMap<String, Vec<u8>>,
}

impl SkinBundle {
    /// Build a bundle from `(name, bytes)` pairs. Names are matched case-insensitively.
    pub fn from_entries<N, B>(entries: impl IntoIterator<Item = (N, B)>) -> Self
    where
        N: AsRef<str>,
        B: Into<Vec<u8>>,
    {
        let files = entries
            .into_iter()
            .map(|(name, bytes)| (normalize_name(name.as_ref()), bytes.into()))
            .collect();
        Self { files }
    }

    /// Read a zip skin (`.wsz`/`.zip`) from disk.
    #[tracing::instrument]
    pub fn from_zip_path(path: &Path) -> SkinampResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read skin archive '{}'", path.display()))?;
        Self::from_zip_bytes(&bytes)
    }

    /// Read a zip skin from memory. Directory entries are skipped.
    pub fn from_zip_bytes(bytes: &[u8]) -> SkinampResult<Self> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).context("open skin archive")?;

        let mut files = HashMap::with_capacity(archive.len());
        for idx in 0..archive.len() {
            let mut entry = archive
                .by_index(idx)
                .with_context(|| format!("read skin archive entry #{idx}"))?;
            if entry.is_dir() {
                continue;
            }
            let name = normalize_name(entry.name());
            let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("extract skin file '{name}'"))?;
            files.insert(name, data);
        }

        tracing::info!(files = files.len(), "loaded skin archive");
        Ok(Self { files })
    }

    /// Read an unpacked skin: every regular file directly inside `dir`.
    pub fn from_dir(dir: &Path) -> SkinampResult<Self> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("list skin directory '{}'", dir.display()))?;

        let mut files = HashMap::new();
        for entry in rd {
            let entry = entry.with_context(|| format!("list skin directory '{}'", dir.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            let data = std::fs::read(&path)
                .with_context(|| format!("read skin file '{}'", path.display()))?;
            files.insert(normalize_name(name), data);
        }

        tracing::info!(files = files.len(), dir = %dir.display(), "loaded skin directory");
        Ok(Self { files })
    }

    /// Open a file for reading. Fails with [`SkinampError::AssetNotFound`] when absent.
    pub fn open(&self, name: &str) -> SkinampResult<Cursor<&[u8]>> {
        self.bytes(name).map(Cursor::new)
    }

    /// Raw bytes of a file.
    pub fn bytes(&self, name: &str) -> SkinampResult<&[u8]> {
        self.files
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .ok_or_else(|| SkinampError::asset_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(&normalize_name(name))
    }

    /// Normalized names of every file, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.replace('\\', "/").to_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bundle.rs"]
mod tests;
