//! Preview shell augmentation.
//!
//! The remote shell page is parsed with a browser-grade HTML5 parser, the
//! preview script is appended as the last child of the first `<body>`
//! element, and the tree is serialized back to bytes.

use std::io;

use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, TreeSink};
use html5ever::{LocalName, ParseOpts, QualName, local_name, namespace_url, ns, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::ServerError;

/// Client behavior script appended to the shell page.
pub(crate) const PREVIEW_SCRIPT: &str = include_str!("../assets/preview.js");

/// Result of augmenting a shell page.
#[derive(Debug)]
pub(crate) struct Augmented {
    /// Serialized document.
    pub(crate) html: Vec<u8>,
    /// Whether a `<body>` was found and the script appended.
    pub(crate) injected: bool,
}

/// Fetch the remote shell page and append the preview script to it.
///
/// One attempt, no retry. Redirects are followed. The body is augmented
/// whatever the upstream status; only transport and read failures are errors.
pub(crate) async fn fetch_augmented_shell(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, ServerError> {
    tracing::debug!(url, "Fetching preview shell");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;
    if !response.status().is_success() {
        tracing::warn!(
            url,
            status = %response.status(),
            "Preview shell returned non-success status"
        );
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;

    let augmented = tokio::task::spawn_blocking(move || inject_script(&body, PREVIEW_SCRIPT))
        .await?
        .map_err(|e| ServerError::Upstream(e.to_string()))?;

    if !augmented.injected {
        tracing::warn!(url, "Preview shell has no <body>; serving it without the preview script");
    }

    Ok(augmented.html)
}

/// Parse `html`, append a `<script>` holding `script` to the first `<body>`,
/// and serialize the result.
///
/// A document without a `<body>` element is serialized unchanged.
pub(crate) fn inject_script(html: &[u8], script: &str) -> io::Result<Augmented> {
    let mut dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut &html[..])?;

    let injected = match find_first_element(&dom.document, &local_name!("body")) {
        Some(body) => {
            let element = dom.create_element(
                QualName::new(None, ns!(html), local_name!("script")),
                Vec::new(),
                ElementFlags::default(),
            );
            dom.append(&element, NodeOrText::AppendText(StrTendril::from(script)));
            dom.append(&body, NodeOrText::AppendNode(element));
            true
        }
        None => false,
    };

    let mut out = Vec::with_capacity(html.len() + script.len() + 32);
    let document: SerializableHandle = Handle::clone(&dom.document).into();
    serialize(&mut out, &document, SerializeOpts::default())?;

    Ok(Augmented {
        html: out,
        injected,
    })
}

/// Depth-first search for the first HTML element named `tag`.
pub(crate) fn find_first_element(node: &Handle, tag: &LocalName) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = node.data
        && name.ns == ns!(html)
        && name.local == *tag
    {
        return Some(Handle::clone(node));
    }

    node.children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "console.log(\"preview\");";

    fn parse(html: &[u8]) -> RcDom {
        parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut &html[..])
            .unwrap()
    }

    fn count_elements(node: &Handle, tag: &LocalName) -> usize {
        let own = usize::from(matches!(
            node.data,
            NodeData::Element { ref name, .. } if name.local == *tag
        ));
        own + node
            .children
            .borrow()
            .iter()
            .map(|child| count_elements(child, tag))
            .sum::<usize>()
    }

    fn text_of(node: &Handle) -> String {
        node.children
            .borrow()
            .iter()
            .filter_map(|child| match child.data {
                NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_script_is_last_child_of_body() {
        let html = b"<!DOCTYPE html><html><head><title>Preview</title></head><body><div id=\"app\"></div><p>footer</p></body></html>";

        let augmented = inject_script(html, SCRIPT).unwrap();
        assert!(augmented.injected);

        let dom = parse(&augmented.html);
        let body = find_first_element(&dom.document, &local_name!("body")).unwrap();
        let children = body.children.borrow();
        let last = children.last().unwrap();
        match last.data {
            NodeData::Element { ref name, .. } => assert_eq!(name.local, local_name!("script")),
            _ => panic!("last child of body is not an element"),
        }
        assert_eq!(text_of(last), SCRIPT);
    }

    #[test]
    fn test_exactly_one_script_added() {
        let html = b"<html><head><script src=\"/app.js\"></script></head><body><script>window.x = 1;</script><main></main></body></html>";
        let before = count_elements(&parse(html).document, &local_name!("script"));

        let augmented = inject_script(html, SCRIPT).unwrap();
        let after = count_elements(&parse(&augmented.html).document, &local_name!("script"));

        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_rest_of_document_unchanged() {
        let html = b"<!DOCTYPE html><html><head><title>Preview</title></head><body><div id=\"app\"></div></body></html>";
        let plain = inject_script(html, "").unwrap();
        let augmented = inject_script(html, SCRIPT).unwrap();

        let plain = String::from_utf8(plain.html).unwrap();
        let augmented = String::from_utf8(augmented.html).unwrap();

        assert_eq!(
            augmented,
            plain.replace("<script></script>", &format!("<script>{SCRIPT}</script>"))
        );
        assert!(augmented.starts_with("<!DOCTYPE html><html><head><title>Preview</title></head><body><div id=\"app\"></div><script>"));
    }

    #[test]
    fn test_script_text_is_not_escaped() {
        let script = "if (a < b && c > d) { fetch(\"/markdown/menu\"); }";
        let augmented = inject_script(b"<body></body>", script).unwrap();

        let html = String::from_utf8(augmented.html).unwrap();
        assert!(html.contains(script));
    }

    #[test]
    fn test_malformed_markup_still_gets_script() {
        let html = b"<div><p>unclosed <b>tags<div>everywhere";

        let augmented = inject_script(html, SCRIPT).unwrap();

        assert!(augmented.injected);
        let html = String::from_utf8(augmented.html).unwrap();
        assert!(html.ends_with(&format!("<script>{SCRIPT}</script></body></html>")));
    }

    #[test]
    fn test_only_first_body_receives_script() {
        let html = b"<html><body><p>one</p></body><body><p>two</p></body></html>";

        let augmented = inject_script(html, SCRIPT).unwrap();

        let dom = parse(&augmented.html);
        assert_eq!(count_elements(&dom.document, &local_name!("script")), 1);
    }

    #[test]
    fn test_frameset_document_is_left_alone() {
        let html = b"<!DOCTYPE html><html><head></head><frameset><frame src=\"a.html\"></frameset></html>";

        let augmented = inject_script(html, SCRIPT).unwrap();

        assert!(!augmented.injected);
        let html = String::from_utf8(augmented.html).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("<frameset>"));
    }

    #[test]
    fn test_preview_script_is_embedded() {
        assert!(PREVIEW_SCRIPT.contains("fetchContent"));
        assert!(PREVIEW_SCRIPT.contains("map(encodeURIComponent)"));
        assert!(!PREVIEW_SCRIPT.contains("</script"));
    }
}
