use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use memmap2::{Mmap, MmapOptions};

/// Read-only view of one resource file, read to completion before any
/// decoding starts.
#[derive(Debug)]
pub struct ContentFile {
    path: PathBuf,
    // None for zero-length files, which cannot be mapped.
    mmap: Option<Mmap>,
}

impl ContentFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

/// The game's content directory, addressed with the relative paths the
/// configuration tables carry. Lookup is case-insensitive because shipped
/// data mixes upper- and lower-case names freely, and path separators may
/// be either slash since the tables were written on another platform.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }
        Ok(ContentDir { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path against the on-disk tree, matching each
    /// component case-insensitively.
    pub fn find_path(&self, rel: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for component in rel.split(['/', '\\']) {
            if component.is_empty() {
                continue;
            }
            let direct = path.join(component);
            if direct.exists() {
                path = direct;
                continue;
            }
            let matched = fs::read_dir(&path)
                .ok()?
                .filter_map(|entry| entry.ok())
                .find(|entry| {
                    entry
                        .file_name()
                        .to_string_lossy()
                        .eq_ignore_ascii_case(component)
                })?;
            path = matched.path();
        }
        path.exists().then_some(path)
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.find_path(rel).is_some()
    }

    /// Reads a file fully into memory.
    pub fn read(&self, rel: &str) -> Result<ContentFile> {
        let path = self
            .find_path(rel)
            .with_context(|| format!("{} not found under {}", rel, self.root.display()))?;
        let file =
            File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .len();
        let mmap = if len == 0 {
            None
        } else {
            Some(
                unsafe { MmapOptions::new().map(&file) }
                    .with_context(|| format!("memory-mapping {}", path.display()))?,
            )
        };
        Ok(ContentFile { path, mmap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn content_with(files: &[(&str, &[u8])]) -> (TempDir, ContentDir) {
        let dir = TempDir::new().unwrap();
        for (rel, bytes) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            let mut file = File::create(path).unwrap();
            file.write_all(bytes).unwrap();
        }
        let content = ContentDir::open(dir.path()).unwrap();
        (dir, content)
    }

    #[test]
    fn lookup_ignores_case_and_separator() {
        let (_dir, content) = content_with(&[("Part1/Script.Dat", b"data")]);
        assert!(content.exists("part1/script.dat"));
        assert!(content.exists("PART1\\SCRIPT.DAT"));
        assert!(!content.exists("part1/missing.dat"));

        let file = content.read("part1\\script.dat").unwrap();
        assert_eq!(file.bytes(), b"data");
    }

    #[test]
    fn empty_files_read_as_empty() {
        let (_dir, content) = content_with(&[("resource.qrc", b"")]);
        let file = content.read("resource.qrc").unwrap();
        assert!(file.bytes().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let (_dir, content) = content_with(&[]);
        assert!(content.read("script.dat").is_err());
    }

    #[test]
    fn open_rejects_non_directories() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("file");
        fs::write(&file_path, b"x").unwrap();
        assert!(ContentDir::open(&file_path).is_err());
    }
}
