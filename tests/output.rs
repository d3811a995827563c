mod common;

use pdf_flow::layout::{CellOptions, MultiCellOptions};
use pdf_flow::{Colour, Info, LinkTarget};

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[test]
fn document_is_written_out() {
    let (mut doc, _) = common::document(common::config());
    let mut info = Info::new();
    info.title("Flow").author("Tester");
    doc.set_info(info);

    doc.set_fill_colour(Colour::grey(230));
    doc.multi_cell(0.0, 0.0, &common::filler(30), &MultiCellOptions::new().fill(true))
        .unwrap();
    doc.cell(
        40.0,
        0.0,
        "link",
        &CellOptions::new().link(LinkTarget::Uri("https://example.com".into())),
    )
    .unwrap();
    doc.cell(40.0, 0.0, "back", &CellOptions::new().link(LinkTarget::Page { page: 1, y: 10.0 }))
        .unwrap();

    let mut out: Vec<u8> = Vec::new();
    doc.write(&mut out).unwrap();

    assert!(out.starts_with(b"%PDF-"));
    assert!(contains(&out, "/BaseFont /Courier"));
    assert!(contains(&out, "/WinAnsiEncoding"));
    assert!(contains(&out, "(Flow)"));
    assert!(contains(&out, "/URI (https://example.com)"));
    assert!(contains(&out, "re f"));
    assert!(contains(&out, "/GoTo"));
}

#[test]
fn compressed_streams_are_deflated() {
    let mut config = common::config();
    config.compress(true);
    let (mut doc, _) = common::document(config);
    doc.multi_cell(0.0, 0.0, "hello", &MultiCellOptions::new().border("1"))
        .unwrap();
    let mut out: Vec<u8> = Vec::new();
    doc.write(&mut out).unwrap();
    assert!(contains(&out, "/FlateDecode"));
    assert!(!contains(&out, "re S"));
}
