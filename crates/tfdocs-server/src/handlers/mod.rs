//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod menu;
pub(crate) mod shell;
