// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Page layout of a parsed document.
//!
//! The rendered HTML is flattened into paragraphs of styled words, broken into lines using
//! Helvetica advance widths, and distributed over fixed-size pages. Coordinates in the output
//! are PDF-style: millimetres from the bottom-left corner, `y` at the text baseline.

use crate::content::{ContentTree, Element, Node};

pub const PT_TO_MM: f32 = 25.4 / 72.0;

const LINE_HEIGHT: f32 = 1.35;
const ASCENT: f32 = 0.8;
const LIST_INDENT_MM: f32 = 6.0;
/// Share of the content width an indent may take; the rest is kept for text.
const MAX_INDENT_SHARE: f32 = 0.75;
const BODY_SIZE_PT: f32 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageSpec {
    pub const A4: PageSpec = PageSpec {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 20.0,
    };

    pub fn content_width_mm(&self) -> f32 {
        (self.width_mm - 2.0 * self.margin_mm).max(1.0)
    }

    fn bottom_limit_mm(&self) -> f32 {
        self.height_mm - self.margin_mm
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Self::Regular,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub face: FontFace,
    pub size_pt: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
}

/// Lays the document out on pages. Always returns at least one (possibly empty) page.
pub fn layout_document(tree: &ContentTree, page: &PageSpec) -> Vec<PageLayout> {
    let mut flattener = Flattener::default();
    flattener.walk(tree.nodes(), &Context::default());
    flattener.flush();

    let mut paginator = Paginator::new(*page);
    for paragraph in &flattener.paragraphs {
        paginator.place(paragraph);
    }
    paginator.finish()
}

/// Estimated advance width of `text` in millimetres.
pub fn text_width_mm(text: &str, face: FontFace, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| helvetica_width(ch, face.is_bold())).sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, PartialEq)]
struct Context {
    bold: bool,
    italic: bool,
    size_pt: f32,
    indent_mm: f32,
    space_before_pt: f32,
    space_after_pt: f32,
    align: Align,
    list: Option<ListKind>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            size_pt: BODY_SIZE_PT,
            indent_mm: 0.0,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            align: Align::Left,
            list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Word {
    text: String,
    face: FontFace,
    space_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Paragraph {
    words: Vec<Word>,
    size_pt: f32,
    indent_mm: f32,
    space_before_pt: f32,
    space_after_pt: f32,
    align: Align,
    prefix: Option<String>,
}

#[derive(Debug, Default)]
struct Flattener {
    paragraphs: Vec<Paragraph>,
    current: Option<Paragraph>,
    pending_space: bool,
    pending_prefix: Option<String>,
}

impl Flattener {
    fn walk(&mut self, nodes: &[Node], ctx: &Context) {
        let mut ordinal = 0usize;
        for node in nodes {
            match node {
                Node::Text(text) => self.push_text(text, ctx),
                Node::Element(el) => {
                    if el.name == "li" {
                        ordinal += 1;
                    }
                    self.element(el, ctx, ordinal);
                }
            }
        }
    }

    fn element(&mut self, el: &Element, ctx: &Context, ordinal: usize) {
        let mut inner = ctx.clone();
        match el.name.as_str() {
            "head" | "script" | "style" | "title" => return,
            "br" => {
                self.line_break(ctx);
                return;
            }
            "strong" | "b" => {
                inner.bold = true;
                return self.walk(&el.children, &inner);
            }
            "em" | "i" => {
                inner.italic = true;
                return self.walk(&el.children, &inner);
            }
            "h1" => heading(&mut inner, 18.0, 0.0, 10.0, Align::Center),
            "h2" => heading(&mut inner, 14.0, 12.0, 4.0, Align::Left),
            "h3" | "h4" | "h5" | "h6" => heading(&mut inner, 12.0, 6.0, 2.0, Align::Left),
            "p" | "div" | "blockquote" | "pre" => {
                inner.space_before_pt = 0.0;
                inner.space_after_pt = 4.0;
            }
            "ul" | "ol" => {
                inner.list = Some(if el.name == "ol" {
                    ListKind::Ordered
                } else {
                    ListKind::Bullet
                });
                inner.indent_mm += LIST_INDENT_MM;
                inner.space_before_pt = 0.0;
                inner.space_after_pt = 2.0;
            }
            "li" => {
                inner.space_before_pt = 0.0;
                inner.space_after_pt = 2.0;
            }
            "section" | "article" | "body" | "html" | "header" | "footer" | "table" | "tr" => {}
            _ => return self.walk(&el.children, &inner),
        }

        if let Some(margin_em) = el.margin_left_em() {
            inner.indent_mm += margin_em * inner.size_pt * PT_TO_MM;
        }

        self.flush();
        if el.name == "li" {
            self.pending_prefix = Some(match ctx.list {
                Some(ListKind::Ordered) => format!("{ordinal}."),
                _ => "•".to_owned(),
            });
        }
        self.walk(&el.children, &inner);
        self.flush();
    }

    fn push_text(&mut self, text: &str, ctx: &Context) {
        let starts_with_space = text.starts_with(|ch: char| ch.is_ascii_whitespace());
        let ends_with_space = text.ends_with(|ch: char| ch.is_ascii_whitespace());
        let mut words = text
            .split(|ch: char| ch.is_ascii_whitespace())
            .filter(|word| !word.is_empty())
            .peekable();

        if words.peek().is_none() {
            if self.current.is_some() && !text.is_empty() {
                self.pending_space = true;
            }
            return;
        }

        let face = FontFace::from_flags(ctx.bold, ctx.italic);
        let mut first = true;
        for word in words {
            let space_before = if first {
                starts_with_space || self.pending_space
            } else {
                true
            };
            first = false;

            let paragraph = self.current_paragraph(ctx);
            let space_before = space_before && !paragraph.words.is_empty();
            paragraph.words.push(Word {
                text: word.replace('\u{a0}', " "),
                face,
                space_before,
            });
        }
        self.pending_space = ends_with_space;
    }

    fn current_paragraph(&mut self, ctx: &Context) -> &mut Paragraph {
        let prefix = &mut self.pending_prefix;
        self.current.get_or_insert_with(|| Paragraph {
            words: Vec::new(),
            size_pt: ctx.size_pt,
            indent_mm: ctx.indent_mm,
            space_before_pt: ctx.space_before_pt,
            space_after_pt: ctx.space_after_pt,
            align: ctx.align,
            prefix: prefix.take(),
        })
    }

    /// Ends the current line; the text that follows continues with the same style.
    fn line_break(&mut self, ctx: &Context) {
        if let Some(mut paragraph) = self.current.take() {
            paragraph.space_after_pt = 0.0;
            self.paragraphs.push(paragraph);
            let mut continuation = ctx.clone();
            continuation.space_before_pt = 0.0;
            self.current_paragraph(&continuation);
        }
        self.pending_space = false;
    }

    fn flush(&mut self) {
        if let Some(paragraph) = self.current.take() {
            if !paragraph.words.is_empty() || paragraph.prefix.is_some() {
                self.paragraphs.push(paragraph);
            }
        }
        self.pending_space = false;
    }
}

fn heading(ctx: &mut Context, size_pt: f32, before: f32, after: f32, align: Align) {
    ctx.bold = true;
    ctx.size_pt = size_pt;
    ctx.space_before_pt = before;
    ctx.space_after_pt = after;
    ctx.align = align;
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    runs: Vec<(f32, String, FontFace)>,
    width_mm: f32,
}

fn break_lines(paragraph: &Paragraph, available_mm: f32) -> Vec<Line> {
    let size = paragraph.size_pt;
    let space_mm = text_width_mm(" ", FontFace::Regular, size);
    let mut lines = Vec::new();
    let mut line = Line {
        runs: Vec::new(),
        width_mm: 0.0,
    };

    for word in &paragraph.words {
        for chunk in split_to_fit(&word.text, word.face, size, available_mm) {
            let chunk_mm = text_width_mm(&chunk, word.face, size);
            let gap = if word.space_before && !line.runs.is_empty() {
                space_mm
            } else {
                0.0
            };

            if !line.runs.is_empty() && line.width_mm + gap + chunk_mm > available_mm {
                lines.push(std::mem::replace(
                    &mut line,
                    Line {
                        runs: Vec::new(),
                        width_mm: 0.0,
                    },
                ));
                push_chunk(&mut line, chunk, word.face, 0.0, chunk_mm);
            } else {
                push_chunk(&mut line, chunk, word.face, gap, chunk_mm);
            }
        }
    }

    if !line.runs.is_empty() {
        lines.push(line);
    }
    lines
}

fn push_chunk(line: &mut Line, chunk: String, face: FontFace, gap: f32, chunk_mm: f32) {
    match line.runs.last_mut() {
        Some((_, text, last_face)) if *last_face == face => {
            if gap > 0.0 {
                text.push(' ');
            }
            text.push_str(&chunk);
        }
        _ => line.runs.push((line.width_mm + gap, chunk, face)),
    }
    line.width_mm += gap + chunk_mm;
}

/// Splits a word that cannot fit on one line into line-sized pieces.
fn split_to_fit(word: &str, face: FontFace, size_pt: f32, available_mm: f32) -> Vec<String> {
    if text_width_mm(word, face, size_pt) <= available_mm {
        return vec![word.to_owned()];
    }

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in word.chars() {
        chunk.push(ch);
        if chunk.chars().count() > 1 && text_width_mm(&chunk, face, size_pt) > available_mm {
            chunk.pop();
            chunks.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

struct Paginator {
    page: PageSpec,
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor_mm: f32,
}

impl Paginator {
    fn new(page: PageSpec) -> Self {
        Self {
            page,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor_mm: page.margin_mm,
        }
    }

    fn at_page_top(&self) -> bool {
        self.current.runs.is_empty()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_mm = self.page.margin_mm;
    }

    fn place(&mut self, paragraph: &Paragraph) {
        let size = paragraph.size_pt;
        let indent_mm = paragraph
            .indent_mm
            .min(self.page.content_width_mm() * MAX_INDENT_SHARE)
            .max(0.0);
        let left = self.page.margin_mm + indent_mm;
        let prefix_mm = paragraph
            .prefix
            .as_deref()
            .map(|prefix| text_width_mm(prefix, FontFace::Regular, size) + 2.0)
            .unwrap_or(0.0);
        let text_left = left + prefix_mm;
        let available = (self.page.margin_mm + self.page.content_width_mm() - text_left).max(1.0);

        let mut lines = break_lines(paragraph, available);
        if lines.is_empty() && paragraph.prefix.is_some() {
            lines.push(Line {
                runs: Vec::new(),
                width_mm: 0.0,
            });
        }
        if lines.is_empty() {
            return;
        }

        if !self.at_page_top() {
            self.cursor_mm += paragraph.space_before_pt * PT_TO_MM;
        }

        let line_height = size * LINE_HEIGHT * PT_TO_MM;
        for (idx, line) in lines.into_iter().enumerate() {
            if self.cursor_mm + line_height > self.page.bottom_limit_mm() && !self.at_page_top() {
                self.new_page();
            }

            let baseline_from_top = self.cursor_mm + size * ASCENT * PT_TO_MM;
            let y_mm = self.page.height_mm - baseline_from_top;

            if idx == 0 {
                if let Some(prefix) = &paragraph.prefix {
                    self.current.runs.push(TextRun {
                        text: prefix.clone(),
                        face: FontFace::Regular,
                        size_pt: size,
                        x_mm: left,
                        y_mm,
                    });
                }
            }

            let offset = match paragraph.align {
                Align::Left => 0.0,
                Align::Center => ((available - line.width_mm) / 2.0).max(0.0),
            };
            for (x, text, face) in line.runs {
                self.current.runs.push(TextRun {
                    text,
                    face,
                    size_pt: size,
                    x_mm: text_left + offset + x,
                    y_mm,
                });
            }

            self.cursor_mm += line_height;
        }

        self.cursor_mm += paragraph.space_after_pt * PT_TO_MM;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.runs.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Helvetica advance widths (1/1000 em) for printable ASCII; everything else uses the width of
/// a lowercase letter. Bold is approximated as five percent wider.
fn helvetica_width(ch: char, bold: bool) -> u32 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ];

    let code = ch as u32;
    let base = if (32..127).contains(&code) {
        u32::from(ASCII[(code - 32) as usize])
    } else {
        556
    };

    if bold {
        base * 105 / 100
    } else {
        base
    }
}
