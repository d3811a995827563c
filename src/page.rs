use crate::{
    content::{ContentLog, ContentSink, Mark},
    layout::Margins,
    pagesize::Orientation,
    rect::Rect,
    refs::{ObjectReferences, RefType},
    PDFError,
};
use pdf_writer::{
    types::{ActionType, AnnotationType},
    Filter, Finish, Name, Pdf, Ref, Str,
};

/// Size, margins and break behaviour of one page, in user units
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    /// top and bottom margins, and the original left and right margins of the page
    pub margins: Margins,
    pub auto_page_break: bool,
}

impl PageGeometry {
    /// The y coordinate below which content no longer fits on the page
    pub fn break_trigger(&self) -> f64 {
        self.height - self.margins.bottom
    }
}

/// Where a link leads
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Uri(String),
    /// a 1-based page number and a y position on that page, in user units
    Page { page: usize, y: f64 },
}

/// A clickable area on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// area in PDF page space
    pub rect: Rect,
    pub target: LinkTarget,
}

/// Collects link annotations
pub trait AnnotationSink {
    fn register_link(&mut self, rect: Rect, target: LinkTarget);
}

/// One page of the document: its geometry, its content and its annotations
#[derive(Debug, Clone)]
pub struct Page {
    pub geometry: PageGeometry,
    pub(crate) content: ContentLog,
    /// where borders and fills of paragraphs in the page body are inserted
    pub(crate) body_mark: Mark,
    /// where the footer starts, once the page is closed
    pub(crate) footer_mark: Option<Mark>,
    pub links: Vec<Link>,
}

impl Page {
    pub fn new(geometry: PageGeometry) -> Page {
        let content = ContentLog::new();
        let body_mark = content.start();
        Page {
            geometry,
            content,
            body_mark,
            footer_mark: None,
            links: Vec::new(),
        }
    }

    /// Page content as operator text
    pub fn content(&self) -> String {
        self.content.resolve()
    }

    /// Mark the current end of the content as the place where later
    /// backgrounds and borders go
    pub fn set_body_mark(&mut self) {
        self.body_mark = self.content.mark();
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        target: &PageWriteContext,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let k = target.k;
        let id = refs.get(RefType::Page(page_index)).ok_or(PDFError::PageMissing)?;

        let mut annotations: Vec<Ref> = Vec::with_capacity(self.links.len());
        for (i, link) in self.links.iter().enumerate() {
            let destination = match &link.target {
                LinkTarget::Page { page, y } => {
                    let Some(&(dest_ref, dest_height)) = page
                        .checked_sub(1)
                        .and_then(|p| target.pages.get(p))
                    else {
                        log::warn!("link on page {} points at missing page {page}", page_index + 1);
                        continue;
                    };
                    Some((dest_ref, ((dest_height - y) * k) as f32))
                }
                LinkTarget::Uri(_) => None,
            };

            let annotation_id = refs.gen(RefType::Annotation(page_index, i));
            let mut annotation = writer.annotation(annotation_id);
            annotation.subtype(AnnotationType::Link);
            annotation.rect(link.rect.into());
            annotation.border(0.0, 0.0, 0.0, None);
            match (&link.target, destination) {
                (LinkTarget::Uri(uri), _) => {
                    annotation
                        .action()
                        .action_type(ActionType::Uri)
                        .uri(Str(uri.as_bytes()));
                }
                (LinkTarget::Page { .. }, Some((dest_ref, top))) => {
                    annotation
                        .action()
                        .action_type(ActionType::GoTo)
                        .destination()
                        .page(dest_ref)
                        .xyz(0.0, top, None);
                }
                (LinkTarget::Page { .. }, None) => {}
            }
            annotation.finish();
            annotations.push(annotation_id);
        }

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let content = self.content.resolve();
        if target.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(content.as_bytes(), 6);
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        } else {
            writer.stream(content_id, content.as_bytes());
        }

        let mut page = writer.page(id);
        page.media_box(pdf_writer::Rect::new(
            0.0,
            0.0,
            (self.geometry.width * k) as f32,
            (self.geometry.height * k) as f32,
        ));
        page.parent(target.parent);
        page.contents(content_id);
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for font_index in 0..target.font_count {
                if let Some(font_ref) = refs.get(RefType::Font(font_index)) {
                    fonts.pair(Name(format!("F{}", font_index + 1).as_bytes()), font_ref);
                }
            }
        }
        if !annotations.is_empty() {
            page.annotations(annotations);
        }
        page.finish();

        Ok(())
    }
}

impl ContentSink for Page {
    fn append(&mut self, operators: &str) {
        self.content.append(operators);
    }

    fn mark(&mut self) -> Mark {
        self.content.mark()
    }

    fn insert_at(&mut self, mark: Mark, operators: &str) {
        self.content.insert_at(mark, operators);
    }
}

impl AnnotationSink for Page {
    fn register_link(&mut self, rect: Rect, target: LinkTarget) {
        self.links.push(Link { rect, target });
    }
}

/// Document-wide facts a page needs while it is written
pub(crate) struct PageWriteContext {
    pub k: f64,
    pub parent: Ref,
    pub font_count: usize,
    pub compress: bool,
    /// reference and height (user units) of every page, for internal links
    pub pages: Vec<(Ref, f64)>,
}
