use pdf_flow::layout::MultiCellOptions;
use pdf_flow::{CoreFont, Document, DocumentConfig, PDFError};

fn main() -> Result<(), PDFError> {
    env_logger::init();

    let mut config = DocumentConfig::default();
    config.booklet(true);
    let mut doc = Document::new(config);
    let courier = doc.add_font(CoreFont::courier().into());
    doc.add_page()?;
    doc.set_font(courier, 9.0)?;

    doc.multi_cell(0.0, 0.0, "Three columns, flowing over pages", &MultiCellOptions::new())?;
    doc.set_equal_columns(3, 0.0, None);
    doc.multi_cell(0.0, 0.0, &lipsum::lipsum(900), &MultiCellOptions::new().border("LR"))?;
    doc.reset_columns();

    let mut out = std::fs::File::create("columns.pdf")?;
    doc.write(&mut out)
}
