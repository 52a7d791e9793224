//! Standalone HTML documents from the visual tree.

use std::collections::HashMap;

use inkdown_common::resources::{ResourceResolver, is_ephemeral};
use pulldown_cmark_escape::{FmtWriter, escape_html};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::tree::VisualNode;

/// Swap every `blob:` image source in `root` for a `data:` URL.
///
/// Handles are resolved one at a time and each distinct handle only once.
/// A handle that fails to resolve is logged and left pointing where it did.
/// Returns how many images were rewritten.
pub async fn inline_ephemeral_images<R: ResourceResolver>(
    root: &mut VisualNode,
    resolver: &R,
) -> usize {
    let mut handles = Vec::new();
    root.for_each_element(&mut |el| {
        let src = match el.attr("src") {
            Some(src) if el.tag == "img" && is_ephemeral(src) => src,
            _ => return,
        };
        if !handles.iter().any(|h| h == src) {
            handles.push(src.to_string());
        }
    });

    let mut resolved = HashMap::with_capacity(handles.len());
    for handle in handles {
        match resolver.resolve(&handle).await {
            Ok(resource) => {
                resolved.insert(handle, resource.to_data_url());
            }
            Err(err) => {
                tracing::warn!(%handle, error = %err, "could not inline image, keeping its source");
            }
        }
    }

    let mut rewritten = 0;
    root.for_each_element_mut(&mut |el| {
        if el.tag != "img" {
            return;
        }
        let Some(url) = el.attr("src").and_then(|src| resolved.get(src)) else {
            return;
        };
        let url = url.clone();
        el.set_attr("src", url);
        rewritten += 1;
    });
    rewritten
}

pub async fn write_document_head(
    writer: &mut (impl AsyncWrite + Unpin),
    title: &str,
    css: &str,
) -> std::io::Result<()> {
    let mut escaped_title = String::new();
    let _ = escape_html(FmtWriter(&mut escaped_title), title);

    writer.write_all(b"<!DOCTYPE html>\n").await?;
    writer.write_all(b"<html lang=\"en\">\n").await?;
    writer.write_all(b"<head>\n").await?;
    writer.write_all(b"  <meta charset=\"utf-8\">\n").await?;
    writer
        .write_all(b"  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n")
        .await?;
    writer.write_all(b"  <title>").await?;
    writer.write_all(escaped_title.as_bytes()).await?;
    writer.write_all(b"</title>\n").await?;
    writer.write_all(b"  <style>\n").await?;
    writer.write_all(css.as_bytes()).await?;
    writer.write_all(b"  </style>\n").await?;
    writer.write_all(b"</head>\n").await?;
    writer.write_all(b"<body>\n").await?;
    writer.write_all(b"<article class=\"markdown-body\">\n").await?;
    Ok(())
}

pub async fn write_document_footer(writer: &mut (impl AsyncWrite + Unpin)) -> std::io::Result<()> {
    writer.write_all(b"\n</article>\n").await?;
    writer.write_all(b"</body>\n").await?;
    writer.write_all(b"</html>\n").await?;
    Ok(())
}

/// Serialize a copy of `root` as a complete HTML document.
///
/// The preview's own tree is never modified.
pub async fn export_html<R: ResourceResolver>(
    root: &VisualNode,
    resolver: &R,
    title: &str,
    css: &str,
) -> std::io::Result<String> {
    let mut body = root.clone();
    let inlined = inline_ephemeral_images(&mut body, resolver).await;
    tracing::debug!(inlined, "prepared html body");

    let mut out = Vec::new();
    write_document_head(&mut out, title, css).await?;
    out.write_all(body.to_html().as_bytes()).await?;
    write_document_footer(&mut out).await?;

    String::from_utf8(out).map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
}
