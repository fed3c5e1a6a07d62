// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rich-text markup handling.
//!
//! Block content arrives as the HTML subset produced by the browser editor. It is parsed into a
//! small tree so presentation transforms (currently the indentation pass) work on structure
//! instead of rewriting strings. The same parser reads the rendered document back for page
//! layout during export.

mod parse;
mod transform;


pub use parse::parse;
pub use transform::{apply_indentation, INDENT_EM_PER_LEVEL, MAX_INDENT_LEVEL};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "source", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "title"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },
    #[error("closing tag </{name}> at byte {offset} has no matching open element")]
    UnexpectedClosingTag { name: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_deref())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute {
                name: name.to_owned(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|attr| attr.name != name);
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    pub fn is_raw_text(&self) -> bool {
        is_raw_text_element(&self.name)
    }

    /// Left margin from an inline `margin-left: <n>em` declaration.
    pub fn margin_left_em(&self) -> Option<f32> {
        let style = self.attr("style")?;
        style.split(';').find_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            if !prop.trim().eq_ignore_ascii_case("margin-left") {
                return None;
            }
            value.trim().strip_suffix("em")?.trim().parse::<f32>().ok()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A parsed fragment or document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentTree {
    nodes: Vec<Node>,
}

impl ContentTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(&mut out, node);
        }
        out
    }

    /// Concatenated text, skipping `<script>`/`<style>` bodies.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    fn has_visible_content(&self) -> bool {
        fn visit(nodes: &[Node]) -> bool {
            nodes.iter().any(|node| match node {
                Node::Text(text) => !text.chars().all(char::is_whitespace),
                Node::Element(el) if el.name == "img" => true,
                Node::Element(el) if el.name == "script" || el.name == "style" => false,
                Node::Element(el) => visit(&el.children),
            })
        }
        visit(&self.nodes)
    }
}

/// True when the markup shows nothing: no non-whitespace text and no images.
pub fn is_blank(markup: &str) -> bool {
    match parse(markup) {
        Ok(tree) => !tree.has_visible_content(),
        Err(_) => markup.trim().is_empty(),
    }
}

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub(crate) fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name == "script" || el.name == "style" => {}
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_text_into(out, text),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for attr in &el.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                if let Some(value) = &attr.value {
                    out.push_str("=\"");
                    escape_attr_into(out, value);
                    out.push('"');
                }
            }
            out.push('>');

            if el.is_void() {
                return;
            }

            if el.is_raw_text() {
                for child in &el.children {
                    if let Node::Text(text) = child {
                        out.push_str(text);
                    }
                }
            } else {
                for child in &el.children {
                    write_node(out, child);
                }
            }

            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

pub(crate) fn escape_text_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes plain text for inclusion in markup.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text_into(&mut out, text);
    out
}
