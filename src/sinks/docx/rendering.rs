//! WordprocessingML parts of the document.
//!
//! The body is one paragraph per selected line with no run formatting: font,
//! size and spacing come from the document defaults in `styles.xml`, which
//! keeps the body part small for 3000-line documents. Pages are forced with
//! `pageBreakBefore` on every `lines_per_page`-th paragraph, so a page is
//! exactly one slice of the selection regardless of how Word flows text.

use super::config::{half_points, twips, Layout};
use crate::pagination::PageSelection;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const HEADER_RELATIONSHIP_ID: &str = "rId2";
pub const FOOTER_RELATIONSHIP_ID: &str = "rId3";

struct Part {
    writer: Writer<Vec<u8>>,
}

impl Part {
    fn new() -> Result<Part> {
        let mut writer = Writer::new(Vec::default());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Part { writer })
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<&mut Self> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(element))?;
        Ok(self)
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<&mut Self> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Empty(element))?;
        Ok(self)
    }

    fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(self)
    }

    /// `<w:t>` that keeps leading and trailing spaces
    fn preserved_text(&mut self, text: &str) -> Result<&mut Self> {
        self.start("w:t", &[("xml:space", "preserve")])?
            .text(text)?
            .end("w:t")
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Drop characters that XML 1.0 can't carry (control characters other than tab
/// and the non-characters U+FFFE / U+FFFF).
pub fn xml_safe(line: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
    }

    if line.chars().all(allowed) {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(line.chars().filter(|&c| allowed(c)).collect())
    }
}

/// A run of code text, with tabs as `<w:tab/>` the way Word stores them
fn code_run(part: &mut Part, line: &str) -> Result<()> {
    let line = xml_safe(line);
    if line.is_empty() {
        return Ok(());
    }

    part.start("w:r", &[])?;
    for (i, segment) in line.split('\t').enumerate() {
        if i > 0 {
            part.empty("w:tab", &[])?;
        }
        if !segment.is_empty() {
            part.preserved_text(segment)?;
        }
    }
    part.end("w:r")?;
    Ok(())
}

/// `word/document.xml`: the selected lines followed by the section properties
pub fn document(selection: &PageSelection, layout: &Layout) -> Result<Vec<u8>> {
    let lines_per_page = selection.lines_per_page();
    let mut part = Part::new()?;
    part.start("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?
        .start("w:body", &[])?;

    for (i, line) in selection.iter().enumerate() {
        part.start("w:p", &[])?;
        if i > 0 && i % lines_per_page == 0 {
            part.start("w:pPr", &[])?
                .empty("w:pageBreakBefore", &[])?
                .end("w:pPr")?;
        }
        code_run(&mut part, line)?;
        part.end("w:p")?;
    }

    section_properties(&mut part, layout)?;
    part.end("w:body")?.end("w:document")?;
    Ok(part.finish())
}

fn section_properties(part: &mut Part, layout: &Layout) -> Result<()> {
    let width = twips(layout.page_width_in).to_string();
    let height = twips(layout.page_height_in).to_string();
    let top = twips(layout.margin_top_in).to_string();
    let right = twips(layout.margin_right_in).to_string();
    let bottom = twips(layout.margin_bottom_in).to_string();
    let left = twips(layout.margin_left_in).to_string();
    let header = twips(layout.header_distance_in).to_string();
    let footer = twips(layout.footer_distance_in).to_string();

    part.start("w:sectPr", &[])?
        .empty(
            "w:headerReference",
            &[("w:type", "default"), ("r:id", HEADER_RELATIONSHIP_ID)],
        )?
        .empty(
            "w:footerReference",
            &[("w:type", "default"), ("r:id", FOOTER_RELATIONSHIP_ID)],
        )?
        .empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?
        .empty(
            "w:pgMar",
            &[
                ("w:top", top.as_str()),
                ("w:right", right.as_str()),
                ("w:bottom", bottom.as_str()),
                ("w:left", left.as_str()),
                ("w:header", header.as_str()),
                ("w:footer", footer.as_str()),
                ("w:gutter", "0"),
            ],
        )?
        .end("w:sectPr")?;
    Ok(())
}

fn centred_paragraph_properties(part: &mut Part) -> Result<()> {
    part.start("w:pPr", &[])?
        .empty("w:jc", &[("w:val", "center")])?
        .end("w:pPr")?;
    Ok(())
}

/// `word/header1.xml`: the software name and version, centred
pub fn header(layout: &Layout) -> Result<Vec<u8>> {
    let mut part = Part::new()?;
    part.start("w:hdr", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?
        .start("w:p", &[])?;
    centred_paragraph_properties(&mut part)?;
    code_run(&mut part, &layout.header_text)?;
    part.end("w:p")?.end("w:hdr")?;
    Ok(part.finish())
}

/// `word/footer1.xml`: a centred PAGE field that Word fills in per page
pub fn footer() -> Result<Vec<u8>> {
    let mut part = Part::new()?;
    part.start("w:ftr", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?
        .start("w:p", &[])?;
    centred_paragraph_properties(&mut part)?;

    part.start("w:r", &[])?
        .empty("w:fldChar", &[("w:fldCharType", "begin")])?
        .end("w:r")?
        .start("w:r", &[])?
        .start("w:instrText", &[("xml:space", "preserve")])?
        .text(" PAGE ")?
        .end("w:instrText")?
        .end("w:r")?
        .start("w:r", &[])?
        .empty("w:fldChar", &[("w:fldCharType", "separate")])?
        .end("w:r")?
        .start("w:r", &[])?
        .preserved_text("1")?
        .end("w:r")?
        .start("w:r", &[])?
        .empty("w:fldChar", &[("w:fldCharType", "end")])?
        .end("w:r")?;

    part.end("w:p")?.end("w:ftr")?;
    Ok(part.finish())
}

/// `word/styles.xml`: document defaults carrying the code font and single
/// spacing with no space around paragraphs
pub fn styles(layout: &Layout) -> Result<Vec<u8>> {
    let size = half_points(layout.font_size_pt).to_string();
    let font = layout.font.as_str();

    let mut part = Part::new()?;
    part.start("w:styles", &[("xmlns:w", NS_W)])?
        .start("w:docDefaults", &[])?
        .start("w:rPrDefault", &[])?
        .start("w:rPr", &[])?
        .empty(
            "w:rFonts",
            &[
                ("w:ascii", font),
                ("w:hAnsi", font),
                ("w:eastAsia", font),
                ("w:cs", font),
            ],
        )?
        .empty("w:sz", &[("w:val", size.as_str())])?
        .empty("w:szCs", &[("w:val", size.as_str())])?
        .end("w:rPr")?
        .end("w:rPrDefault")?
        .start("w:pPrDefault", &[])?
        .start("w:pPr", &[])?
        .empty(
            "w:spacing",
            &[
                ("w:before", "0"),
                ("w:after", "0"),
                ("w:line", "240"),
                ("w:lineRule", "auto"),
            ],
        )?
        .end("w:pPr")?
        .end("w:pPrDefault")?
        .end("w:docDefaults")?
        .start(
            "w:style",
            &[
                ("w:type", "paragraph"),
                ("w:default", "1"),
                ("w:styleId", "Normal"),
            ],
        )?
        .empty("w:name", &[("w:val", "Normal")])?
        .empty("w:qFormat", &[])?
        .end("w:style")?
        .end("w:styles")?;
    Ok(part.finish())
}

/// `docProps/core.xml`
pub fn core_properties(layout: &Layout) -> Result<Vec<u8>> {
    let mut part = Part::new()?;
    part.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?
    .start("dc:title", &[])?
    .text(&xml_safe(&layout.header_text))?
    .end("dc:title")?
    .start("dc:subject", &[])?
    .text("Source code")?
    .end("dc:subject")?
    .end("cp:coreProperties")?;
    Ok(part.finish())
}

/// `docProps/app.xml`
pub fn app_properties(page_count: usize) -> Result<Vec<u8>> {
    let mut part = Part::new()?;
    part.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?
    .start("Application", &[])?
    .text(env!("CARGO_PKG_NAME"))?
    .end("Application")?
    .start("Pages", &[])?
    .text(&page_count.to_string())?
    .end("Pages")?
    .end("Properties")?;
    Ok(part.finish())
}
