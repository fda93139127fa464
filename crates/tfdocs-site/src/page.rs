//! Page reading.
//!
//! [`DocsTree::read_page`] turns one markdown file into a [`Page`]. Nothing is
//! cached: each call re-reads the file from disk.

use serde::Serialize;

use crate::error::SiteError;
use crate::front_matter;
use crate::tree::{DocsTree, path_key};

/// Prefix stripped from provider names to form the short name.
const PROVIDER_NAME_PREFIX: &str = "terraform-provider-";

/// One markdown documentation file.
///
/// Serializes to the JSON shape consumed by the preview client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// File name up to its first `.`.
    pub name: String,
    pub provider_name: String,
    pub short_provider_name: String,
    /// `page_title` from front matter, empty when absent.
    pub title: String,
    /// Raw file content, front matter included.
    pub content: String,
    /// Cleaned path relative to the project directory; the addressing key
    /// the client sends back to request this page.
    pub path: String,
    /// `layout` from front matter. Only used to label the index page.
    #[serde(skip)]
    pub layout: Option<String>,
}

impl DocsTree {
    /// Read a page by its path relative to the project directory.
    ///
    /// The path is normalized and checked against the documentation root and
    /// the markdown extension before any file is opened.
    ///
    /// # Errors
    ///
    /// - [`SiteError::InvalidPath`] if the path escapes the root or is not markdown
    /// - [`SiteError::Io`] if the file cannot be read
    /// - [`SiteError::FrontMatter`] if a front-matter block is malformed
    pub fn read_page(&self, path: &str) -> Result<Page, SiteError> {
        let cleaned = self.resolve(path)?;
        let key = path_key(&cleaned);

        let file_path = self.project_dir().join(&cleaned);
        let bytes = std::fs::read(&file_path).map_err(|e| SiteError::io(&file_path, e))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        let meta = front_matter::parse(&content).map_err(|message| SiteError::FrontMatter {
            path: key.clone(),
            message,
        })?;

        let file_name = cleaned
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .split_once('.')
            .map_or(file_name.as_str(), |(stem, _)| stem)
            .to_owned();

        tracing::debug!(path = %key, "Read page");

        Ok(Page {
            name,
            provider_name: self.provider_name().to_owned(),
            short_provider_name: short_provider_name(self.provider_name()).to_owned(),
            title: meta.page_title().unwrap_or_default().to_owned(),
            content,
            path: key,
            layout: meta.layout().map(str::to_owned),
        })
    }
}

/// Provider name without the `terraform-provider-` prefix.
pub fn short_provider_name(provider_name: &str) -> &str {
    provider_name
        .strip_prefix(PROVIDER_NAME_PREFIX)
        .unwrap_or(provider_name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::error::InvalidPathReason;

    fn setup() -> (TempDir, DocsTree) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/resources")).unwrap();
        let tree = DocsTree::new(dir.path(), "docs", "docs/index.md")
            .with_provider_name("terraform-provider-acme");
        (dir, tree)
    }

    #[test]
    fn test_read_page_with_front_matter() {
        let (dir, tree) = setup();
        let content = "---\npage_title: \"acme_widget Resource\"\nlayout: \"acme\"\n---\n\n# acme_widget\n";
        fs::write(dir.path().join("docs/resources/widget.md"), content).unwrap();

        let page = tree.read_page("docs/resources/widget.md").unwrap();

        assert_eq!(
            page,
            Page {
                name: "widget".to_owned(),
                provider_name: "terraform-provider-acme".to_owned(),
                short_provider_name: "acme".to_owned(),
                title: "acme_widget Resource".to_owned(),
                content: content.to_owned(),
                path: "docs/resources/widget.md".to_owned(),
                layout: Some("acme".to_owned()),
            }
        );
    }

    #[test]
    fn test_read_page_without_front_matter() {
        let (dir, tree) = setup();
        fs::write(dir.path().join("docs/resources/plain.md"), "# Plain\n").unwrap();

        let page = tree.read_page("docs/resources/plain.md").unwrap();

        assert_eq!(page.name, "plain");
        assert_eq!(page.title, "");
        assert_eq!(page.layout, None);
        assert_eq!(page.content, "# Plain\n");
    }

    #[test]
    fn test_read_page_cleans_path() {
        let (dir, tree) = setup();
        fs::write(dir.path().join("docs/resources/widget.md"), "x").unwrap();

        let page = tree
            .read_page("./docs/guides/../resources/./widget.md")
            .unwrap();

        assert_eq!(page.path, "docs/resources/widget.md");
    }

    #[test]
    fn test_read_page_name_stops_at_first_dot() {
        let (dir, tree) = setup();
        fs::write(dir.path().join("docs/resources/widget.html.md"), "x").unwrap();

        let page = tree.read_page("docs/resources/widget.html.md").unwrap();

        assert_eq!(page.name, "widget");
    }

    #[test]
    fn test_read_page_rejects_traversal_without_opening() {
        let (dir, tree) = setup();
        fs::write(dir.path().join("secret.md"), "top secret").unwrap();

        let err = tree.read_page("docs/../secret.md").unwrap_err();

        assert_eq!(err.invalid_path_reason(), Some(InvalidPathReason::OutsideRoot));
    }

    #[test]
    fn test_read_page_rejects_non_markdown() {
        let (dir, tree) = setup();
        fs::write(dir.path().join("docs/resources/notes.txt"), "x").unwrap();

        let err = tree.read_page("docs/resources/notes.txt").unwrap_err();

        assert_eq!(err.invalid_path_reason(), Some(InvalidPathReason::NotMarkdown));
    }

    #[test]
    fn test_read_page_missing_file_is_io_error() {
        let (_dir, tree) = setup();

        let err = tree.read_page("docs/resources/missing.md").unwrap_err();

        match err {
            SiteError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_page_malformed_front_matter() {
        let (dir, tree) = setup();
        fs::write(
            dir.path().join("docs/resources/bad.md"),
            "---\nlayout: [oops\n---\n",
        )
        .unwrap();

        let err = tree.read_page("docs/resources/bad.md").unwrap_err();

        assert!(matches!(err, SiteError::FrontMatter { .. }));
    }

    #[test]
    fn test_page_json_shape() {
        let page = Page {
            name: "widget".to_owned(),
            provider_name: "terraform-provider-acme".to_owned(),
            short_provider_name: "acme".to_owned(),
            title: "Widget".to_owned(),
            content: "# Widget\n".to_owned(),
            path: "docs/resources/widget.md".to_owned(),
            layout: Some("acme".to_owned()),
        };

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["name"], "widget");
        assert_eq!(json["providerName"], "terraform-provider-acme");
        assert_eq!(json["shortProviderName"], "acme");
        assert_eq!(json["title"], "Widget");
        assert_eq!(json["content"], "# Widget\n");
        assert_eq!(json["path"], "docs/resources/widget.md");
        assert!(json.get("layout").is_none());
    }

    #[test]
    fn test_short_provider_name() {
        assert_eq!(short_provider_name("terraform-provider-acme"), "acme");
        assert_eq!(short_provider_name("acme"), "acme");
    }
}
