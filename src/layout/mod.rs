//! Layout of text on pages: cells, word wrapping, paragraphs that flow over
//! columns and pages, and the decisions to break them.
//!
//! Every layout call works on one [`LayoutContext`] owned by the
//! [`Document`](crate::Document): the page geometry, the cursor, and the
//! graphic state text and borders are drawn with. Coordinates are in user
//! units with the origin at the top left corner of the page and y growing
//! downward.
//!
//! # Example
//!
//! ```
//! use pdf_flow::{CoreFont, Document, DocumentConfig};
//! use pdf_flow::layout::{Align, MultiCellOptions};
//!
//! let mut doc = Document::new(DocumentConfig::default());
//! let font = doc.add_font(CoreFont::courier().into());
//! doc.add_page().unwrap();
//! doc.set_font(font, 12.0).unwrap();
//!
//! let opts = MultiCellOptions::new().border("1").align(Align::Justify);
//! let lines = doc
//!     .multi_cell(80.0, 0.0, "Hello, world! This paragraph wraps.", &opts)
//!     .unwrap();
//! assert!(lines >= 1);
//! ```

mod border;
mod cell;
mod columns;
mod flow;
mod linebreak;
mod margins;
mod pagebreak;
mod state;

pub use border::*;
pub use cell::*;
pub use columns::*;
pub use flow::*;
pub use linebreak::*;
pub use margins::*;
pub use pagebreak::*;
pub use state::{CursorState, FontSelection, GraphicState, LayoutContext, Region, TextDecoration, TextRenderMode};
