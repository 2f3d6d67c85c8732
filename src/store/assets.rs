//! Asset store: the rules document and the downloadable bundle folders.
//!
//! Bundles (mods, resourcepacks) are folders of arbitrary files managed as a
//! unit. Downloading packs the folder into a deterministic in-memory zip;
//! replacing extracts an uploaded zip into a staging directory and swaps it
//! in atomically, so a rejected or failed upload leaves the live folder
//! untouched.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{write_bytes_atomic, RULES_FILE};
use crate::errors::AppError;

/// The fixed set of downloadable bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Mods,
    Resourcepacks,
}

impl BundleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleKind::Mods => "mods",
            BundleKind::Resourcepacks => "resourcepacks",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mods" => Some(BundleKind::Mods),
            "resourcepacks" => Some(BundleKind::Resourcepacks),
            _ => None,
        }
    }
}

/// Store for the binary assets under the files directory.
pub struct AssetStore {
    files_dir: PathBuf,
}

impl AssetStore {
    pub fn new(files_dir: &Path) -> Self {
        Self {
            files_dir: files_dir.to_path_buf(),
        }
    }

    fn rules_path(&self) -> PathBuf {
        self.files_dir.join(RULES_FILE)
    }

    fn bundle_dir(&self, kind: BundleKind) -> PathBuf {
        self.files_dir.join(kind.as_str())
    }

    /// Read the stored rules document.
    pub async fn rules_document(&self) -> Result<Vec<u8>, AppError> {
        match tokio::fs::read(self.rules_path()).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                "No rules document has been uploaded yet".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the rules document unconditionally.
    pub async fn put_rules_document(&self, bytes: &[u8]) -> Result<(), AppError> {
        write_bytes_atomic(&self.rules_path(), bytes).await
    }

    /// Pack the named bundle folder into an in-memory zip archive.
    ///
    /// Entries are ordered by relative path, so repeated calls over the same
    /// folder produce identical archives.
    pub async fn bundle_archive(&self, kind: BundleKind) -> Result<Vec<u8>, AppError> {
        let dir = self.bundle_dir(kind);
        tokio::task::spawn_blocking(move || pack_folder(&dir, kind)).await?
    }

    /// Replace the bundle's contents from an uploaded zip archive.
    ///
    /// The archive is validated and extracted into a staging directory
    /// first; the live folder is only removed once extraction has fully
    /// succeeded, then the staging directory is renamed into place. Returns
    /// the number of extracted files.
    pub async fn replace_bundle(
        &self,
        kind: BundleKind,
        archive_bytes: Vec<u8>,
    ) -> Result<usize, AppError> {
        let live = self.bundle_dir(kind);
        let staging = self
            .files_dir
            .join(format!(".staging-{}-{}", kind.as_str(), uuid::Uuid::new_v4()));

        tokio::task::spawn_blocking(move || {
            let swap = || -> Result<usize, AppError> {
                let extracted = extract_archive(&archive_bytes, &staging)?;
                if live.exists() {
                    std::fs::remove_dir_all(&live)?;
                }
                std::fs::rename(&staging, &live)?;
                Ok(extracted)
            };

            let result = swap();
            if result.is_err() {
                std::fs::remove_dir_all(&staging).ok();
            }
            result
        })
        .await?
    }
}

/// Build a deterministic zip archive of every file under `dir`.
fn pack_folder(dir: &Path, kind: BundleKind) -> Result<Vec<u8>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Bundle {} has not been uploaded yet",
            kind.as_str()
        )));
    }

    let mut files = Vec::new();
    collect_files(dir, &mut files)?;

    let mut entries: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter_map(|path| {
            let rel = path.strip_prefix(dir).ok()?;
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some((name, path))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    if entries.is_empty() {
        return Err(AppError::BundleEmpty(format!(
            "Bundle {} contains no files",
            kind.as_str()
        )));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in entries {
        writer.start_file(name, options)?;
        let contents = std::fs::read(&path)?;
        writer.write_all(&contents)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Extract every archive entry into `staging`, rejecting entry names that
/// would resolve outside it.
fn extract_archive(archive_bytes: &[u8], staging: &Path) -> Result<usize, AppError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;

    // Validate all entry names before touching the filesystem.
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.enclosed_name().is_none() {
            return Err(AppError::Extraction(format!(
                "Archive entry {:?} escapes the bundle folder",
                entry.name()
            )));
        }
    }

    std::fs::create_dir_all(staging)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            return Err(AppError::Extraction(format!(
                "Archive entry {:?} escapes the bundle folder",
                entry.name()
            )));
        };
        let out = staging.join(rel);

        if entry.is_dir() {
            std::fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&out)?;
        std::io::copy(&mut entry, &mut file)?;
        extracted += 1;
    }

    Ok(extracted)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn archive_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_replace_then_pack_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());

        let upload = build_archive(&[("a.jar", b"alpha"), ("sub/b.jar", b"beta")]);
        let extracted = store
            .replace_bundle(BundleKind::Mods, upload)
            .await
            .unwrap();
        assert_eq!(extracted, 2);

        let packed = store.bundle_archive(BundleKind::Mods).await.unwrap();
        assert_eq!(archive_names(&packed), vec!["a.jar", "sub/b.jar"]);

        let mut archive = ZipArchive::new(Cursor::new(packed)).unwrap();
        let mut contents = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_index(0).unwrap(), &mut contents).unwrap();
        assert_eq!(contents, b"alpha");
    }

    #[tokio::test]
    async fn test_replace_drops_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());

        store
            .replace_bundle(BundleKind::Mods, build_archive(&[("old.jar", b"old")]))
            .await
            .unwrap();
        store
            .replace_bundle(BundleKind::Mods, build_archive(&[("new.jar", b"new")]))
            .await
            .unwrap();

        let packed = store.bundle_archive(BundleKind::Mods).await.unwrap();
        assert_eq!(archive_names(&packed), vec!["new.jar"]);
    }

    #[tokio::test]
    async fn test_traversal_entry_rejected_and_live_folder_kept() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());

        store
            .replace_bundle(BundleKind::Mods, build_archive(&[("keep.jar", b"keep")]))
            .await
            .unwrap();

        let evil = build_archive(&[("../evil.txt", b"boom")]);
        let err = store
            .replace_bundle(BundleKind::Mods, evil)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));

        // Live folder unchanged, nothing escaped the staging directory.
        let packed = store.bundle_archive(BundleKind::Mods).await.unwrap();
        assert_eq!(archive_names(&packed), vec!["keep.jar"]);
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[tokio::test]
    async fn test_archives_are_deterministic() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());

        let upload = build_archive(&[("z.jar", b"z"), ("a.jar", b"a"), ("m/x.jar", b"x")]);
        store
            .replace_bundle(BundleKind::Resourcepacks, upload)
            .await
            .unwrap();

        let first = store.bundle_archive(BundleKind::Resourcepacks).await.unwrap();
        let second = store.bundle_archive(BundleKind::Resourcepacks).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(archive_names(&first), vec!["a.jar", "m/x.jar", "z.jar"]);
    }

    #[tokio::test]
    async fn test_missing_and_empty_bundles_are_distinct() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());

        let err = store.bundle_archive(BundleKind::Mods).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        store
            .replace_bundle(BundleKind::Mods, build_archive(&[]))
            .await
            .unwrap();
        let err = store.bundle_archive(BundleKind::Mods).await.unwrap_err();
        assert!(matches!(err, AppError::BundleEmpty(_)));
    }
}
