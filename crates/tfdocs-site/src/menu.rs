//! Navigation menu building.
//!
//! [`DocsTree::build_menu`] walks the documentation root and sorts every
//! markdown file into a [`Category`] by its path prefix. The walk happens on
//! every call, so the menu always reflects the files currently on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SiteError;
use crate::page::Page;
use crate::tree::{DocsTree, MARKDOWN_EXTENSION, clean};

/// Label used for the index page when its front matter has no `layout`.
pub const UNKNOWN_LAYOUT: &str = "unknown";

/// Subdirectory of the root holding guide pages.
const GUIDES_DIR: &str = "guides";
/// Subdirectory of the root holding resource pages.
const RESOURCES_DIR: &str = "resources";
/// Subdirectory of the root holding data source pages.
const DATA_SOURCES_DIR: &str = "data-sources";

/// Menu bucket a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Index,
    Guide,
    Resource,
    DataSource,
}

/// Navigation taxonomy for one snapshot of the documentation tree.
///
/// Pages within each bucket keep discovery order.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Landing page, `None` if the index file does not exist.
    pub index: Option<Page>,
    pub guides: Vec<Page>,
    pub resources: Vec<Page>,
    pub data_sources: Vec<Page>,
}

impl Menu {
    fn insert(&mut self, category: Category, page: Page) {
        match category {
            Category::Index => self.index = Some(page),
            Category::Guide => self.guides.push(page),
            Category::Resource => self.resources.push(page),
            Category::DataSource => self.data_sources.push(page),
        }
    }
}

impl DocsTree {
    /// Classify a path relative to the project directory.
    ///
    /// Checked in order: exact index match, then the `guides`, `resources`
    /// and `data-sources` prefixes. Returns `None` for anything else.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Option<Category> {
        let path = clean(path)?;
        let root = clean(self.root()).unwrap_or_default();

        if clean(self.index()).is_some_and(|index| index == path) {
            Some(Category::Index)
        } else if path.starts_with(root.join(GUIDES_DIR)) {
            Some(Category::Guide)
        } else if path.starts_with(root.join(RESOURCES_DIR)) {
            Some(Category::Resource)
        } else if path.starts_with(root.join(DATA_SOURCES_DIR)) {
            Some(Category::DataSource)
        } else {
            None
        }
    }

    /// Walk the documentation root and build the navigation menu.
    ///
    /// Every markdown file is read; the index page is labelled with its
    /// front-matter `layout`, or [`UNKNOWN_LAYOUT`] when there is none.
    ///
    /// # Errors
    ///
    /// Any directory or page read failure aborts the build and is returned
    /// as is; no partial menu is produced.
    pub fn build_menu(&self) -> Result<Menu, SiteError> {
        let mut files = Vec::new();
        self.collect_markdown(self.root(), &mut files)?;

        let mut menu = Menu::default();
        for relative in files {
            let key = relative.to_string_lossy();
            let mut page = self.read_page(&key)?;

            let Some(category) = self.classify(&relative) else {
                tracing::debug!(path = %page.path, "Skipping unclassified page");
                continue;
            };

            if category == Category::Index {
                page.name = page
                    .layout
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_LAYOUT.to_owned());
            }
            menu.insert(category, page);
        }

        tracing::debug!(
            guides = menu.guides.len(),
            resources = menu.resources.len(),
            data_sources = menu.data_sources.len(),
            has_index = menu.index.is_some(),
            "Built menu"
        );

        Ok(menu)
    }

    /// Recursively collect markdown files under `dir` (relative to the
    /// project directory), in file-name order per directory.
    fn collect_markdown(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SiteError> {
        let full = self.project_dir().join(dir);
        let mut entries = fs::read_dir(&full)
            .map_err(|e| SiteError::io(&full, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SiteError::io(&full, e))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let relative = dir.join(entry.file_name());
            let file_type = entry
                .file_type()
                .map_err(|e| SiteError::io(entry.path(), e))?;

            if file_type.is_dir() {
                self.collect_markdown(&relative, files)?;
            } else if relative
                .extension()
                .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
            {
                files.push(relative);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn tree(dir: &TempDir) -> DocsTree {
        DocsTree::new(dir.path(), "docs", "docs/index.md")
    }

    fn names(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_classify() {
        let tree = DocsTree::new("/project", "docs", "docs/index.md");

        assert_eq!(tree.classify(Path::new("docs/index.md")), Some(Category::Index));
        assert_eq!(
            tree.classify(Path::new("docs/guides/getting-started.md")),
            Some(Category::Guide)
        );
        assert_eq!(
            tree.classify(Path::new("docs/resources/widget.md")),
            Some(Category::Resource)
        );
        assert_eq!(
            tree.classify(Path::new("docs/data-sources/widget.md")),
            Some(Category::DataSource)
        );
        assert_eq!(tree.classify(Path::new("docs/CHANGELOG.md")), None);
        assert_eq!(tree.classify(Path::new("docs/resources-old/widget.md")), None);
        assert_eq!(tree.classify(Path::new("docs/functions/parse.md")), None);
    }

    #[test]
    fn test_classify_index_takes_priority() {
        let tree = DocsTree::new("/project", "docs", "docs/guides/index.md");

        assert_eq!(
            tree.classify(Path::new("docs/guides/index.md")),
            Some(Category::Index)
        );
        assert_eq!(
            tree.classify(Path::new("docs/guides/other.md")),
            Some(Category::Guide)
        );
    }

    #[test]
    fn test_build_menu_provider_scenario() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/index.md", "---\nlayout: \"provider\"\n---\n# Provider\n");
        write(&dir, "docs/resources/widget.md", "# Resource\n");
        write(&dir, "docs/data-sources/widget.md", "# Data source\n");

        let menu = tree(&dir).build_menu().unwrap();

        let index = menu.index.unwrap();
        assert_eq!(index.name, "provider");
        assert_eq!(index.path, "docs/index.md");
        assert_eq!(names(&menu.resources), vec!["widget"]);
        assert_eq!(menu.resources[0].path, "docs/resources/widget.md");
        assert_eq!(names(&menu.data_sources), vec!["widget"]);
        assert_eq!(menu.data_sources[0].path, "docs/data-sources/widget.md");
        assert!(menu.guides.is_empty());
    }

    #[test]
    fn test_build_menu_index_without_layout() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/index.md", "# Provider\n");

        let menu = tree(&dir).build_menu().unwrap();

        assert_eq!(menu.index.unwrap().name, UNKNOWN_LAYOUT);
    }

    #[test]
    fn test_build_menu_without_index() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/resources/widget.md", "# Resource\n");

        let menu = tree(&dir).build_menu().unwrap();

        assert!(menu.index.is_none());
        assert_eq!(names(&menu.resources), vec!["widget"]);
    }

    #[test]
    fn test_build_menu_skips_unclassified_and_non_markdown() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/guides/setup.md", "# Setup\n");
        write(&dir, "docs/guides/diagram.png", "binary");
        write(&dir, "docs/CONTRIBUTING.md", "# Contributing\n");
        write(&dir, "docs/functions/parse.md", "# parse\n");

        let menu = tree(&dir).build_menu().unwrap();

        assert_eq!(names(&menu.guides), vec!["setup"]);
        assert!(menu.resources.is_empty());
        assert!(menu.data_sources.is_empty());
    }

    #[test]
    fn test_build_menu_descends_nested_directories() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/resources/compute/instance.md", "# Instance\n");
        write(&dir, "docs/resources/network.md", "# Network\n");

        let menu = tree(&dir).build_menu().unwrap();

        assert_eq!(names(&menu.resources), vec!["instance", "network"]);
    }

    #[test]
    fn test_build_menu_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/index.md", "---\nlayout: acme\n---\n");
        write(&dir, "docs/resources/b.md", "b");
        write(&dir, "docs/resources/a.md", "a");
        write(&dir, "docs/guides/intro.md", "intro");

        let tree = tree(&dir);
        let first = tree.build_menu().unwrap();
        let second = tree.build_menu().unwrap();

        assert_eq!(names(&first.resources), names(&second.resources));
        assert_eq!(names(&first.guides), names(&second.guides));
        assert_eq!(first.index, second.index);
    }

    #[test]
    fn test_build_menu_reflects_disk_changes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/resources/widget.md", "# Widget\n");
        let tree = tree(&dir);

        assert_eq!(tree.build_menu().unwrap().resources.len(), 1);

        write(&dir, "docs/resources/gadget.md", "# Gadget\n");
        assert_eq!(tree.build_menu().unwrap().resources.len(), 2);
    }

    #[test]
    fn test_build_menu_read_failure_aborts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/resources/widget.md", "# Widget\n");
        write(&dir, "docs/resources/broken.md", "---\nlayout: [oops\n---\n");

        let err = tree(&dir).build_menu().unwrap_err();

        assert!(matches!(err, SiteError::FrontMatter { .. }));
    }

    #[test]
    fn test_build_menu_missing_root() {
        let dir = TempDir::new().unwrap();

        let err = tree(&dir).build_menu().unwrap_err();

        assert!(matches!(err, SiteError::Io { .. }));
    }

    #[test]
    fn test_menu_serialization() {
        let menu = Menu::default();
        let json = serde_json::to_value(&menu).unwrap();

        assert!(json["index"].is_null());
        assert!(json["dataSources"].as_array().unwrap().is_empty());
    }
}
