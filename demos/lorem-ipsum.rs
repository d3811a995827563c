use pdf_flow::layout::{Align, CellOptions, LineAdvance, MultiCellOptions, PageHooks};
use pdf_flow::{Colour, CoreFont, Document, DocumentConfig, Info, PDFError};

struct Numbered;

impl PageHooks for Numbered {
    fn header(&mut self, doc: &mut Document) -> Result<(), PDFError> {
        doc.cell(0.0, 0.0, "Lorem Ipsum", &CellOptions::new().border("B").ln(LineAdvance::NextLine))
    }

    fn footer(&mut self, doc: &mut Document) -> Result<(), PDFError> {
        let label = format!("{} / {}", doc.page_no(), doc.num_pages());
        doc.cell(0.0, 0.0, &label, &CellOptions::new().align(Align::Center))
    }
}

fn main() -> Result<(), PDFError> {
    env_logger::init();

    let mut doc = Document::new(DocumentConfig::default());
    let mut info = Info::new();
    info.title("Lorem Ipsum").creator("lorem-ipsum demo");
    doc.set_info(info);
    doc.set_hooks(Numbered);

    let courier = doc.add_font(CoreFont::courier().into());
    doc.add_page()?;
    doc.set_font(courier, 11.0)?;
    doc.set_fill_colour(Colour::grey(235));

    for paragraph in 0..6 {
        let text = lipsum::lipsum(40 + paragraph * 35);
        let opts = MultiCellOptions::new()
            .border("1")
            .fill(paragraph % 2 == 0)
            .align(Align::Justify);
        doc.multi_cell(0.0, 0.0, &text, &opts)?;
        doc.ln(Some(4.0));
    }

    let mut out = std::fs::File::create("lorem-ipsum.pdf")?;
    doc.write(&mut out)
}
