//! Documentation tree location and path containment.

use std::path::{Component, Path, PathBuf};

use crate::error::{InvalidPathReason, SiteError};

/// Markdown file extension accepted by the reader.
pub(crate) const MARKDOWN_EXTENSION: &str = "md";

/// Location of a provider's documentation tree.
///
/// Page paths are addressed relative to `project_dir`, e.g.
/// `docs/resources/widget.md`, and must stay under `root`.
#[derive(Debug, Clone)]
pub struct DocsTree {
    project_dir: PathBuf,
    root: PathBuf,
    index: PathBuf,
    provider_name: String,
}

impl DocsTree {
    /// Create a tree rooted at `project_dir/root` with the designated `index` page.
    ///
    /// `root` and `index` are relative to `project_dir`.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
        index: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            root: root.into(),
            index: index.into(),
            provider_name: String::new(),
        }
    }

    /// Set the provider name annotated on every page read from this tree.
    #[must_use]
    pub fn with_provider_name(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = provider_name.into();
        self
    }

    /// Directory page paths are resolved against.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Documentation root, relative to [`project_dir`](Self::project_dir).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Designated index page, relative to [`project_dir`](Self::project_dir).
    pub fn index(&self) -> &Path {
        &self.index
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Validate a requested page path and return its cleaned relative form.
    ///
    /// Runs before any filesystem access.
    pub(crate) fn resolve(&self, path: &str) -> Result<PathBuf, SiteError> {
        let invalid = |reason| SiteError::InvalidPath {
            path: path.to_owned(),
            reason,
        };

        let cleaned = clean(Path::new(path)).ok_or_else(|| invalid(InvalidPathReason::OutsideRoot))?;
        if !cleaned.starts_with(clean(&self.root).unwrap_or_default()) {
            return Err(invalid(InvalidPathReason::OutsideRoot));
        }
        if cleaned
            .extension()
            .is_none_or(|ext| ext != MARKDOWN_EXTENSION)
        {
            return Err(invalid(InvalidPathReason::NotMarkdown));
        }

        Ok(cleaned)
    }
}

/// Lexically normalize a relative path, resolving `.` and `..` segments.
///
/// Returns `None` for absolute paths and for paths whose `..` segments climb
/// above their starting point.
pub(crate) fn clean(path: &Path) -> Option<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(cleaned)
}

/// Client-facing key for a cleaned relative path (always `/`-separated).
pub(crate) fn path_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
