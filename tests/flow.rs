mod common;

use pdf_flow::layout::{Align, CellOptions, LineAdvance, MultiCellOptions, PageHooks, WriteOptions};
use pdf_flow::{Document, PDFError};

#[test]
fn wrap_and_newline_line_counts() {
    let (mut doc, _) = common::document(common::config());
    // 6 pt per character
    assert_eq!(doc.get_num_lines("aaa bbb ccc", 45.0, None, "").unwrap(), 2);
    assert_eq!(doc.get_num_lines("line1\nline2", 180.0, None, "").unwrap(), 2);
    assert_eq!(doc.get_num_lines("", 180.0, None, "").unwrap(), 1);
    assert_eq!(doc.get_num_lines("trailing\n", 180.0, None, "").unwrap(), 1);
}

#[test]
fn measuring_twice_gives_the_same_answer() {
    let (mut doc, _) = common::document(common::config());
    let text = common::filler(40);
    let first = doc.get_string_height(120.0, &text, true, None, "1").unwrap();
    let second = doc.get_string_height(120.0, &text, true, None, "1").unwrap();
    assert_eq!(first, second);
    assert_eq!(doc.page_content(1).unwrap().matches("TJ").count(), 0);
}

#[test]
fn string_width_follows_the_font() {
    let (mut doc, _) = common::document(common::config());
    assert_eq!(doc.get_string_width("abcd").unwrap(), 24.0);
    doc.set_font_stretching(50.0);
    assert_eq!(doc.get_string_width("abcd").unwrap(), 12.0);
}

#[test]
fn long_paragraph_flows_over_pages() {
    let (mut doc, _) = common::document(common::config());
    let text = common::filler(200);
    let expected = doc.get_num_lines(&text, 0.0, None, "1").unwrap();
    let lines = doc
        .multi_cell(0.0, 0.0, &text, &MultiCellOptions::new().border("1"))
        .unwrap();
    assert_eq!(lines, expected);
    assert!(doc.num_pages() > 1);
    // the last line ends above the trigger, the padding under it may not
    let trigger = doc.page_height() - 10.0;
    assert!(doc.get_y() <= trigger + 1.0);

    // the frame is closed on top only on the first page, at the bottom only on the last
    let first = doc.page_content(1).unwrap();
    let last = doc.page_content(doc.num_pages()).unwrap();
    assert!(first.contains("10.000000 10.000000 m 10.000000 290.000000 l 190.000000 290.000000 l"));
    assert!(last.contains("190.000000 290.000000 m 190.000000"));
    assert!(!first.contains("re S"));
}

#[test]
fn columns_fill_before_pages() {
    let (mut doc, _) = common::document(common::config());
    doc.set_equal_columns(2, 0.0, None);
    let text = common::filler(150);
    doc.multi_cell(0.0, 0.0, &text, &MultiCellOptions::new().fill(true))
        .unwrap();
    let first = doc.page_content(1).unwrap();
    // one fill for each column the paragraph touched on the first page
    assert_eq!(first.matches("re f").count(), 2);
    assert!(first.contains("100.000000 290.000000 90.000000"));
    assert!(doc.current_column() == 1 || doc.num_pages() > 1);
}

struct Banner;

impl PageHooks for Banner {
    fn header(&mut self, doc: &mut Document) -> Result<(), PDFError> {
        doc.cell(0.0, 0.0, "Header", &CellOptions::new().ln(LineAdvance::NextLine))
    }

    fn footer(&mut self, doc: &mut Document) -> Result<(), PDFError> {
        let label = format!("Page {}", doc.page_no());
        doc.cell(0.0, 0.0, &label, &CellOptions::new().align(Align::Right))
    }
}

#[test]
fn every_page_gets_header_and_footer() {
    let mut config = common::config();
    config.header_footer_margins(pdf_flow::Pt(2.0), pdf_flow::Pt(8.0));
    let (mut doc, _) = common::document(config);
    doc.set_hooks(Banner);
    // the first page was started before the hooks were installed
    doc.multi_cell(0.0, 0.0, &common::filler(250), &MultiCellOptions::new())
        .unwrap();
    doc.add_page().unwrap();
    let pages = doc.num_pages();
    assert!(pages >= 3);
    let content = doc.page_content(2).unwrap();
    assert!(content.contains("[(Header)] TJ"));
    assert!(content.contains("[(Page 2)] TJ"));
    // the cursor is back below the top margin after the header
    assert!(content.find("(Header)").unwrap() < content.find("(Page 2)").unwrap());
}

#[test]
fn running_text_continues_the_line() {
    let (mut doc, _) = common::document(common::config());
    doc.write_text(12.5, "first ", &WriteOptions::new()).unwrap();
    assert_eq!(doc.get_x(), 46.0);
    let lines = doc
        .write_text(12.5, "second part of the sentence that wraps", &WriteOptions::new().ln(true))
        .unwrap();
    assert_eq!(lines, 2);
    assert_eq!(doc.get_x(), 10.0);
    assert_eq!(doc.get_y(), 35.0);
}

#[test]
fn failures_abort_the_document() {
    let mut doc = Document::new(common::config());
    let err = doc.multi_cell(0.0, 0.0, "text", &MultiCellOptions::new());
    assert!(matches!(err, Err(PDFError::NoPage { .. })));
    assert!(matches!(doc.add_page(), Err(PDFError::Aborted)));
    assert!(matches!(doc.write(Vec::new()), Err(PDFError::Aborted)));
}
