// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{is_void_element, Attribute, ContentError, ContentTree, Element, Node};

/// Parses editor markup into a [`ContentTree`].
///
/// Unclosed elements are closed at end of input, and a closing tag closes every element opened
/// after its match. A `<` that opens a tag but never reaches `>` is an error, as is a closing
/// tag with no open element of that name.
pub fn parse(input: &str) -> Result<ContentTree, ContentError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        stack: Vec::new(),
        root: Vec::new(),
    };
    parser.run()?;
    Ok(ContentTree::new(parser.finish()))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<Element>,
    root: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<(), ContentError> {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            let Some(lt) = rest.find('<') else {
                self.push_text(decode_entities(rest));
                self.pos = self.src.len();
                break;
            };

            if lt > 0 {
                self.push_text(decode_entities(&rest[..lt]));
                self.pos += lt;
            }

            self.markup()?;
        }
        Ok(())
    }

    fn markup(&mut self) -> Result<(), ContentError> {
        let start = self.pos;
        let rest = &self.src[start..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment
                .find("-->")
                .ok_or(ContentError::UnterminatedTag { offset: start })?;
            self.pos = start + 4 + end + 3;
            return Ok(());
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = find_tag_end(rest).ok_or(ContentError::UnterminatedTag { offset: start })?;
            self.pos = start + end + 1;
            return Ok(());
        }

        if let Some(closing) = rest.strip_prefix("</") {
            let end = closing
                .find('>')
                .ok_or(ContentError::UnterminatedTag { offset: start })?;
            let name = closing[..end].trim().to_ascii_lowercase();
            self.pos = start + 2 + end + 1;
            return self.close(&name, start);
        }

        let opens_tag = rest[1..].chars().next().is_some_and(|ch| ch.is_ascii_alphabetic());
        if !opens_tag {
            self.push_text("<".to_owned());
            self.pos = start + 1;
            return Ok(());
        }

        let end = find_tag_end(rest).ok_or(ContentError::UnterminatedTag { offset: start })?;
        let (element, self_closing) = parse_open_tag(&rest[1..end]);
        self.pos = start + end + 1;

        if element.is_raw_text() {
            self.raw_text(element);
        } else if self_closing || is_void_element(&element.name) {
            self.attach(Node::Element(element));
        } else {
            self.stack.push(element);
        }
        Ok(())
    }

    fn raw_text(&mut self, mut element: Element) {
        let rest = &self.src[self.pos..];
        let needle = format!("</{}", element.name);
        let body_end = rest.to_ascii_lowercase().find(&needle).unwrap_or(rest.len());
        let body = &rest[..body_end];
        if !body.is_empty() {
            element.children.push(Node::Text(body.to_owned()));
        }

        let after_body = &rest[body_end..];
        let consumed = match after_body.find('>') {
            Some(gt) => body_end + gt + 1,
            None => rest.len(),
        };
        self.pos += consumed;
        self.attach(Node::Element(element));
    }

    fn close(&mut self, name: &str, offset: usize) -> Result<(), ContentError> {
        if is_void_element(name) {
            // `</br>` and friends carry no structure.
            return Ok(());
        }

        let Some(depth) = self.stack.iter().rposition(|el| el.name == name) else {
            return Err(ContentError::UnexpectedClosingTag {
                name: name.to_owned(),
                offset,
            });
        };

        while self.stack.len() > depth {
            self.pop_into_parent();
        }
        Ok(())
    }

    fn pop_into_parent(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.attach(Node::Element(element));
        }
    }

    fn attach(&mut self, node: Node) {
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };

        if let Node::Text(text) = &node {
            if let Some(Node::Text(previous)) = siblings.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        siblings.push(node);
    }

    fn push_text(&mut self, text: String) {
        if !text.is_empty() {
            self.attach(Node::Text(text));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.pop_into_parent();
        }
        self.root
    }
}

/// Index of the `>` closing the tag that starts at `tag[0] == '<'`, skipping quoted values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote = None::<char>;
    for (idx, ch) in tag.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            (None, _) => {}
        }
    }
    None
}

fn parse_open_tag(body: &str) -> (Element, bool) {
    let body = body.trim_end();
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (body, false),
    };

    let name_end = body
        .find(|ch: char| ch.is_whitespace() || ch == '/')
        .unwrap_or(body.len());
    let mut element = Element::new(body[..name_end].to_ascii_lowercase());
    element.attrs = parse_attributes(&body[name_end..]);
    (element, self_closing)
}

fn parse_attributes(mut rest: &str) -> Vec<Attribute> {
    let mut attrs = Vec::new();

    loop {
        rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '=' || ch == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw, remaining) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    match inner.find(q) {
                        Some(close) => (&inner[..close], &inner[close + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remaining;
            Some(decode_entities(raw))
        } else {
            None
        };

        if !name.is_empty() {
            attrs.push(Attribute { name, value });
        }
    }

    attrs
}

pub(super) fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..]
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi + 1]).map(|ch| (ch, semi + 2)));

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
