use crate::{
    metrics::FontMetrics,
    refs::{ObjectReferences, RefType},
    PDFError,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::{BTreeMap, HashMap};

/// Reference to a font registered with a [`Document`](crate::Document)
pub type FontId = Id<Font>;

/// A font that text can be set in. Fonts are registered once with the
/// document and referred to by their [`FontId`] afterwards.
pub enum Font {
    /// One of the standard PDF fonts, which viewers provide themselves
    Core(CoreFont),
    /// A TrueType / OpenType face, embedded in the document
    TrueType(TrueTypeFont),
}

impl Font {
    /// Load a TrueType or OpenType font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        Ok(Font::TrueType(TrueTypeFont::load(bytes)?))
    }

    pub(crate) fn metrics(&self) -> &dyn FontMetrics {
        match self {
            Font::Core(f) => f,
            Font::TrueType(f) => f,
        }
    }

    /// Remember which characters were drawn, so only their widths and
    /// mappings are written out
    pub(crate) fn record_usage(&mut self, codes: &[u32]) {
        if let Font::TrueType(f) = self {
            f.record_usage(codes);
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: FontId, writer: &mut Pdf) {
        match self {
            Font::Core(f) => f.write(refs, id.index(), writer),
            Font::TrueType(f) => f.write(refs, id.index(), writer),
        }
    }
}

impl From<CoreFont> for Font {
    fn from(f: CoreFont) -> Self {
        Font::Core(f)
    }
}

/// One of the standard 14 PDF fonts, with its width table
#[derive(Debug, Clone)]
pub struct CoreFont {
    pub base_font: String,
    widths: HashMap<u32, f64>,
    missing_width: Option<f64>,
    ascent: f64,
    descent: f64,
    underline_thickness: f64,
}

impl CoreFont {
    /// Describe a core font by its PostScript name and metrics in 1/1000 em
    pub fn new<S: ToString>(
        base_font: S,
        widths: impl IntoIterator<Item = (u32, f64)>,
        ascent: f64,
        descent: f64,
        missing_width: Option<f64>,
    ) -> CoreFont {
        CoreFont {
            base_font: base_font.to_string(),
            widths: widths.into_iter().collect(),
            missing_width,
            ascent,
            descent,
            underline_thickness: 50.0,
        }
    }

    fn monospaced<S: ToString>(base_font: S) -> CoreFont {
        CoreFont::new(
            base_font,
            (32u32..=255).map(|c| (c, 600.0)),
            629.0,
            -157.0,
            Some(600.0),
        )
    }

    /// Courier: every glyph 600 units wide
    pub fn courier() -> CoreFont {
        CoreFont::monospaced("Courier")
    }

    pub fn courier_bold() -> CoreFont {
        CoreFont::monospaced("Courier-Bold")
    }

    pub fn courier_oblique() -> CoreFont {
        CoreFont::monospaced("Courier-Oblique")
    }

    fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Font(font_index));
        writer
            .type1_font(id)
            .base_font(Name(self.base_font.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
}

/// Map a code point to its WinAnsi byte; unknown characters become `?`
fn win_ansi(code: u32) -> u8 {
    match code {
        0x20AC => 0x80,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0..=0x7f | 0xa0..=0xff => code as u8,
        _ => b'?',
    }
}

impl FontMetrics for CoreFont {
    fn char_width(&self, code: u32) -> Option<f64> {
        self.widths.get(&code).copied()
    }

    fn default_width(&self) -> Option<f64> {
        self.missing_width
    }

    fn ascent_descent(&self) -> (f64, f64) {
        (self.ascent, self.descent)
    }

    fn underline_thickness(&self) -> f64 {
        self.underline_thickness
    }

    fn is_unicode(&self) -> bool {
        false
    }

    fn encode(&self, code: u32, out: &mut Vec<u8>) {
        out.push(win_ansi(code));
    }
}

/// A parsed TrueType / OpenType face. The whole font file is embedded in the
/// generated PDF; widths and the ToUnicode map only cover the characters that
/// were actually drawn.
pub struct TrueTypeFont {
    pub face: OwnedFace,
    used: BTreeMap<u16, char>,
}

impl TrueTypeFont {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<TrueTypeFont, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(TrueTypeFont {
            face,
            used: BTreeMap::new(),
        })
    }

    fn scaling(&self) -> f64 {
        1000.0 / self.face.as_face_ref().units_per_em() as f64
    }

    fn glyph_id(&self, code: u32) -> Option<u16> {
        let ch = char::from_u32(code)?;
        self.face.as_face_ref().glyph_index(ch).map(|g| g.0)
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn record_usage(&mut self, codes: &[u32]) {
        for &code in codes {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            match self.glyph_id(code) {
                Some(gid) => {
                    self.used.entry(gid).or_insert(ch);
                }
                None => log::warn!("font has no glyph for {ch:?}, drawing .notdef"),
            }
        }
    }

    fn advance(&self, gid: u16) -> f64 {
        self.face
            .as_face_ref()
            .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
            .unwrap_or_default() as f64
            * self.scaling()
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let descriptor_id = self.write_descriptor(refs, font_index, writer);
        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{}", font_index + 1).as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);
        cid_font.default_width(self.advance(0) as f32);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        // runs of consecutive glyph ids share one width array
        let mut widths = cid_font.widths();
        let mut run_start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for &gid in self.used.keys() {
            match run_start {
                Some(start) if start as usize + run.len() == gid as usize => {}
                Some(start) => {
                    widths.consecutive(start, run.drain(..));
                    run_start = Some(gid);
                }
                None => run_start = Some(gid),
            }
            run.push(self.advance(gid) as f32);
        }
        if let Some(start) = run_start {
            widths.consecutive(start, run);
        }
        widths.finish();

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face.as_face_ref();
        let scaling = self.scaling() as f32;
        let id = refs.gen(RefType::FontDescriptor(font_index));
        let name = self.name().unwrap_or_else(|| format!("F{}", font_index + 1));

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }

        let bbox = face.global_bounding_box();
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.replace(' ', "").as_bytes()));
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );

        // bfchar blocks hold at most 100 entries
        let used: Vec<(u16, char)> = self.used.iter().map(|(&g, &c)| (g, c)).collect();
        for block in used.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{u:04X}"))
                    .collect();
                map.push_str(&format!("<{gid:04X}> <{hex}>\n"));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(map.as_bytes(), 6);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }

    fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{}", font_index + 1).as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

impl FontMetrics for TrueTypeFont {
    fn char_width(&self, code: u32) -> Option<f64> {
        self.glyph_id(code).map(|gid| self.advance(gid))
    }

    fn ascent_descent(&self) -> (f64, f64) {
        let face = self.face.as_face_ref();
        (
            face.ascender() as f64 * self.scaling(),
            face.descender() as f64 * self.scaling(),
        )
    }

    fn underline_thickness(&self) -> f64 {
        self.face
            .as_face_ref()
            .underline_metrics()
            .map(|m| m.thickness as f64 * self.scaling())
            .unwrap_or(50.0)
    }

    fn is_unicode(&self) -> bool {
        true
    }

    fn encode(&self, code: u32, out: &mut Vec<u8>) {
        let gid = self.glyph_id(code).unwrap_or(0);
        out.extend_from_slice(&gid.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::raw_char_width;

    #[test]
    fn courier_is_monospaced() {
        let courier = CoreFont::courier();
        assert_eq!(raw_char_width(&courier, 'i' as u32), 600.0);
        assert_eq!(raw_char_width(&courier, 'W' as u32), 600.0);
        // outside the table, the missing width applies
        assert_eq!(raw_char_width(&courier, 0x4e2d), 600.0);
        assert_eq!(courier.ascent_descent(), (629.0, -157.0));
    }

    #[test]
    fn core_fonts_encode_win_ansi() {
        let courier = CoreFont::courier();
        let mut out = Vec::new();
        for c in "é€中".chars() {
            courier.encode(c as u32, &mut out);
        }
        assert_eq!(out, vec![0xe9, 0x80, b'?']);
    }
}
