use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::geometry::Size;
use crate::sort::FileSort;

/// Extensions of the image formats the page reader understands
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "avif"];

/// One page image with the metadata the ordering and layout code needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub path: PathBuf,
    pub name: String,
    pub bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub size: Size,
}

impl PageEntry {
    pub fn new(path: impl Into<PathBuf>, size: Size) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            bytes: 0,
            modified: None,
            size,
        }
    }

    /// Reads the pixel dimensions from the image header and the file
    /// metadata from disk.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let dimensions =
            imagesize::size(path).with_context(|| format!("Failed to read image size of {}", path.display()))?;
        let size = Size::new(
            u32::try_from(dimensions.width).unwrap_or(u32::MAX),
            u32::try_from(dimensions.height).unwrap_or(u32::MAX),
        );
        let metadata = std::fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        let mut entry = Self::new(path, size);
        entry.bytes = metadata.len();
        entry.modified = modified;
        Ok(entry)
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub recursive: bool,
    pub sort: FileSort,
}

/// Ordered list of the pages found in a directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageLibrary {
    root: Option<PathBuf>,
    pages: Vec<PageEntry>,
}

impl PageLibrary {
    pub fn scan(dir: &Path, options: ScanOptions) -> anyhow::Result<Self> {
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }

        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let mut pages = Vec::new();
        for entry in WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| match e {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {err}", dir.display());
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && is_supported_image(e.path()))
        {
            match PageEntry::from_path(entry.path()) {
                Ok(page) => {
                    debug!("Found page {} ({})", page.name, page.size);
                    pages.push(page);
                }
                Err(e) => warn!("{e:#}"),
            }
        }

        options.sort.sort(&mut pages);
        info!("Found {} page(s) in {}", pages.len(), dir.display());

        Ok(Self {
            root: Some(dir.to_path_buf()),
            pages,
        })
    }

    pub fn from_entries(mut pages: Vec<PageEntry>, sort: FileSort) -> Self {
        sort.sort(&mut pages);
        Self { root: None, pages }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageEntry> {
        self.pages.get(index)
    }

    pub fn sizes(&self) -> Vec<Size> {
        self.pages.iter().map(|p| p.size).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortKey, SortOrder};

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("a/b/page01.PNG")));
        assert!(is_supported_image(Path::new("cover.jpeg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("png")));
    }

    #[test]
    fn test_from_entries_orders_pages() {
        let entries = vec![
            PageEntry::new("p10.png", Size::new(1, 1)),
            PageEntry::new("p9.png", Size::new(2, 2)),
            PageEntry::new("p1.png", Size::new(3, 3)),
        ];
        let library = PageLibrary::from_entries(entries.clone(), FileSort::default());
        let names: Vec<&str> = library.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p1.png", "p9.png", "p10.png"]);
        assert_eq!(library.sizes()[0], Size::new(3, 3));

        let library = PageLibrary::from_entries(entries, FileSort::new(SortKey::NameLiteral, SortOrder::Descending));
        let names: Vec<&str> = library.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p9.png", "p10.png", "p1.png"]);
    }

    #[test]
    fn test_sort_by_size_breaks_ties_by_name() {
        let mut a = PageEntry::new("b.png", Size::default());
        a.bytes = 10;
        let mut b = PageEntry::new("a.png", Size::default());
        b.bytes = 10;
        let mut c = PageEntry::new("c.png", Size::default());
        c.bytes = 5;
        let library = PageLibrary::from_entries(vec![a, b, c], FileSort::new(SortKey::Size, SortOrder::Ascending));
        let names: Vec<&str> = library.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["c.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_scan_rejects_missing_directory() {
        assert!(PageLibrary::scan(Path::new("/definitely/not/here"), ScanOptions::default()).is_err());
    }
}
