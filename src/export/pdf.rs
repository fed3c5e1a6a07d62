// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use super::layout::{FontFace, PageLayout, PageSpec};
use super::ExportError;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ExportError> {
        let add = |font: BuiltinFont| doc.add_builtin_font(font).map_err(pdf_error);
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
            bold_italic: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn face(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
            FontFace::BoldItalic => &self.bold_italic,
        }
    }
}

/// Serializes laid-out pages into PDF bytes using the standard Helvetica family.
pub fn write_pdf(pages: &[PageLayout], page: &PageSpec, title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(page.width_mm), Mm(page.height_mm), "Layer 1");
    let fonts = Fonts::load(&doc)?;

    let mut first = Some((first_page, first_layer));
    for (idx, layout) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = match first.take() {
            Some(indices) => indices,
            None => doc.add_page(
                Mm(page.width_mm),
                Mm(page.height_mm),
                format!("Page {}, Layer 1", idx + 1),
            ),
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for run in &layout.runs {
            layer.use_text(
                run.text.as_str(),
                run.size_pt,
                Mm(run.x_mm),
                Mm(run.y_mm),
                fonts.face(run.face),
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(err: printpdf::Error) -> ExportError {
    ExportError::Layout(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::TextRun;

    fn page_with(text: &str) -> PageLayout {
        PageLayout {
            runs: vec![TextRun {
                text: text.to_owned(),
                face: FontFace::Bold,
                size_pt: 12.0,
                x_mm: 20.0,
                y_mm: 270.0,
            }],
        }
    }

    #[test]
    fn writes_a_pdf_document() {
        let bytes = write_pdf(&[page_with("Ata")], &PageSpec::A4, "Ata de Reunião").expect("pdf");
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn every_layout_page_adds_to_the_document() {
        let one = write_pdf(&[page_with("a")], &PageSpec::A4, "t").expect("pdf");
        let three = write_pdf(
            &[page_with("a"), page_with("b"), page_with("c")],
            &PageSpec::A4,
            "t",
        )
        .expect("pdf");
        assert!(three.len() > one.len());
    }

    #[test]
    fn empty_page_list_still_yields_a_document() {
        let bytes = write_pdf(&[], &PageSpec::A4, "t").expect("pdf");
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
