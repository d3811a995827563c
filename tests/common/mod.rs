#![allow(dead_code)]

use pdf_flow::{CoreFont, Document, DocumentConfig, FontId, Pt, Unit};

/// A 200 × 300 pt page with 10 pt margins all around, uncompressed content
pub fn config() -> DocumentConfig {
    let mut config = DocumentConfig::new();
    config
        .unit(Unit::Point)
        .page_size((Pt(200.0), Pt(300.0)), Default::default())
        .margins(Pt(10.0), Pt(10.0), Pt(10.0))
        .auto_page_break(true, Pt(10.0))
        .compress(false);
    config
}

/// A document on its first page with 10 pt Courier selected and no cell padding
pub fn document(config: DocumentConfig) -> (Document, FontId) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::new(config);
    let font = doc.add_font(CoreFont::courier().into());
    doc.add_page().expect("first page");
    doc.set_font(font, 10.0).expect("courier");
    doc.set_cell_padding(0.0);
    (doc, font)
}

pub fn filler(words: usize) -> String {
    lipsum::lipsum(words)
}
