//! Documentation tree access for tfdocs.
//!
//! This crate provides:
//! - [`DocsTree::read_page`]: read one markdown file into a [`Page`]
//! - [`DocsTree::build_menu`]: classify the whole tree into a [`Menu`]
//!
//! Both operations go to disk on every call; nothing is cached.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tfdocs_site::DocsTree;
//!
//! let tree = DocsTree::new(".", "docs", "docs/index.md")
//!     .with_provider_name("terraform-provider-acme");
//!
//! let menu = tree.build_menu()?;
//! let page = tree.read_page("docs/resources/widget.md")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Layout
//!
//! ```text
//! docs/
//! ├── index.md            -> Menu::index
//! ├── guides/*.md         -> Menu::guides
//! ├── resources/*.md      -> Menu::resources
//! └── data-sources/*.md   -> Menu::data_sources
//! ```

mod error;
pub mod front_matter;
mod menu;
mod page;
mod tree;

pub use error::{InvalidPathReason, SiteError};
pub use front_matter::FrontMatter;
pub use menu::{Category, Menu, UNKNOWN_LAYOUT};
pub use page::{Page, short_provider_name};
pub use tree::DocsTree;
