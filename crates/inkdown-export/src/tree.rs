//! Visual tree handed over by the renderer.
//!
//! A deliberately small DOM: elements with ordered attributes and children,
//! plus text nodes. Cloning is a deep copy, which is what the exporters want:
//! they rewrite image sources on their own copy and never touch the tree the
//! preview is showing.

use pulldown_cmark_escape::{FmtWriter, StrWrite, escape_html, escape_html_body_text};
use smol_str::SmolStr;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: SmolStr,
    pub attributes: Vec<(SmolStr, String)>,
    pub children: Vec<VisualNode>,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<VisualNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(VisualNode::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

impl From<Element> for VisualNode {
    fn from(element: Element) -> Self {
        VisualNode::Element(element)
    }
}

impl VisualNode {
    pub fn text(text: impl Into<String>) -> Self {
        VisualNode::Text(text.into())
    }

    /// Depth-first visit of every element, parents before children.
    pub fn for_each_element(&self, f: &mut impl FnMut(&Element)) {
        if let VisualNode::Element(element) = self {
            f(element);
            for child in &element.children {
                child.for_each_element(f);
            }
        }
    }

    /// Mutable variant of [`VisualNode::for_each_element`].
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        if let VisualNode::Element(element) = self {
            f(element);
            for child in &mut element.children {
                child.for_each_element_mut(f);
            }
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VisualNode::Text(text) => out.push_str(text),
            VisualNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Serialize this subtree as HTML markup.
    pub fn write_html<W: StrWrite>(&self, w: &mut W) -> Result<(), W::Error> {
        match self {
            VisualNode::Text(text) => escape_html_body_text(&mut *w, text),
            VisualNode::Element(element) => {
                w.write_str("<")?;
                w.write_str(&element.tag)?;
                for (name, value) in &element.attributes {
                    w.write_str(" ")?;
                    w.write_str(name)?;
                    w.write_str("=\"")?;
                    escape_html(&mut *w, value)?;
                    w.write_str("\"")?;
                }
                w.write_str(">")?;
                if element.is_void() {
                    return Ok(());
                }
                for child in &element.children {
                    child.write_html(w)?;
                }
                w.write_str("</")?;
                w.write_str(&element.tag)?;
                w.write_str(">")
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut FmtWriter(&mut out));
        out
    }
}
