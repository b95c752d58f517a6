//! Output file naming and writing for annotated pages

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// File name an annotated page is stored under
///
/// `/` becomes `index.html`; any other path has every `/` replaced with `_`
/// and `.html` appended, so `/guides/start` becomes `_guides_start.html`.
/// Paths that only differ in `/` versus `_` map to the same file.
pub fn output_file_name(page_path: &str) -> String {
    if page_path == "/" {
        "index.html".to_string()
    } else {
        format!("{}.html", page_path.replace('/', "_"))
    }
}

/// Directory that annotated pages are written into
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create the directory (and parents) if needed
    pub async fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root of the output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gets the storage path for a page path
    pub fn path_for(&self, page_path: &str) -> PathBuf {
        self.root.join(output_file_name(page_path))
    }

    /// Write a page in a single call, replacing any previous file
    pub async fn write_page(&self, page_path: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.path_for(page_path);
        fs::write(&path, content).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("/"), "index.html");
        assert_eq!(output_file_name("/guides/start"), "_guides_start.html");
        assert_eq!(output_file_name("/about"), "_about.html");
        assert_eq!(output_file_name("/docs/"), "_docs_.html");
    }

    #[test]
    fn test_colliding_paths_share_a_file() {
        assert_eq!(output_file_name("/a/b"), output_file_name("/a_b"));
    }

    #[tokio::test]
    async fn test_write_page_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("pages");

        let output = OutputDir::create(&root).await.unwrap();
        let written = output.write_page("/guides/start", "<html></html>").await.unwrap();

        assert_eq!(written, root.join("_guides_start.html"));
        assert_eq!(
            std::fs::read_to_string(&written).unwrap(),
            "<html></html>"
        );

        // second write replaces the first
        output.write_page("/guides/start", "v2").await.unwrap();
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "v2");
    }
}
