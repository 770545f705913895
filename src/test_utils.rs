pub mod test_helpers {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use crate::geometry::Size;

    /// Smallest PNG header `imagesize` accepts: signature plus IHDR chunk
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        // bit depth, color type, compression, filter, interlace
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        // CRC is not checked
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    /// SOI followed by a baseline SOF0 segment
    pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.push(3);
        for component in 1..=3u8 {
            bytes.extend_from_slice(&[component, 0x11, 0x00]);
        }
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    /// GIF89a logical screen descriptor and trailer
    pub fn gif_bytes(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0x3B]);
        bytes
    }

    pub fn sizes(list: &[(u32, u32)]) -> Vec<Size> {
        list.iter().map(|&s| s.into()).collect()
    }

    /// Builder for page directories on disk
    pub struct TempLibraryBuilder {
        dir: TempDir,
    }

    impl Default for TempLibraryBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TempLibraryBuilder {
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().expect("Failed to create temp dir"),
            }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Write raw bytes, creating parent directories for nested names
        pub fn file(self, name: &str, bytes: &[u8]) -> Self {
            let path = self.dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create directory");
            }
            fs::write(&path, bytes).expect("Failed to write test file");
            self
        }

        pub fn png(self, name: &str, width: u32, height: u32) -> Self {
            self.file(name, &png_bytes(width, height))
        }

        pub fn jpeg(self, name: &str, width: u16, height: u16) -> Self {
            self.file(name, &jpeg_bytes(width, height))
        }

        pub fn gif(self, name: &str, width: u16, height: u16) -> Self {
            self.file(name, &gif_bytes(width, height))
        }

        pub fn file_path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        /// Hands out the directory; it is removed when dropped
        pub fn build(self) -> TempDir {
            self.dir
        }
    }
}
