//! Docx generation for registration documents.
//!
//! Produces a minimal Office Open XML package: the body, one header and one
//! footer shared by every page, document-wide styles and the two property
//! parts. The XML parts come from `rendering`; this module zips them. Entries
//! carry a fixed timestamp so identical input gives a byte-identical file.

mod config;
mod rendering;

pub use config::*;

use super::Render;
use crate::pagination::PageSelection;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

// ids must agree with rendering::HEADER_RELATIONSHIP_ID and FOOTER_RELATIONSHIP_ID
const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#;

impl Docx {
    pub fn new<P: Into<std::path::PathBuf>>(outfile: P, layout: Layout) -> Docx {
        Docx {
            outfile: outfile.into(),
            layout,
        }
    }

    /// Write the complete package to any seekable destination.
    pub fn write_to<W: Write + Seek>(
        &self,
        selection: &PageSelection,
        writer: W,
    ) -> Result<RenderStats> {
        let stats = RenderStats {
            paragraph_count: selection.len(),
            page_count: selection.selected_pages(),
        };

        let parts: [(&str, Vec<u8>); 9] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes().to_vec()),
            ("_rels/.rels", PACKAGE_RELS_XML.as_bytes().to_vec()),
            (
                "word/document.xml",
                rendering::document(selection, &self.layout)
                    .with_context(|| "Failed to render document body")?,
            ),
            (
                "word/_rels/document.xml.rels",
                DOCUMENT_RELS_XML.as_bytes().to_vec(),
            ),
            (
                "word/styles.xml",
                rendering::styles(&self.layout).with_context(|| "Failed to render styles")?,
            ),
            (
                "word/header1.xml",
                rendering::header(&self.layout).with_context(|| "Failed to render header")?,
            ),
            (
                "word/footer1.xml",
                rendering::footer().with_context(|| "Failed to render footer")?,
            ),
            (
                "docProps/core.xml",
                rendering::core_properties(&self.layout)
                    .with_context(|| "Failed to render core properties")?,
            ),
            (
                "docProps/app.xml",
                rendering::app_properties(stats.page_count)
                    .with_context(|| "Failed to render app properties")?,
            ),
        ];

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut zip = ZipWriter::new(writer);
        for (name, data) in parts.iter() {
            zip.start_file(*name, options)
                .with_context(|| format!("Failed to start package entry {name}"))?;
            zip.write_all(data)
                .with_context(|| format!("Failed to write package entry {name}"))?;
        }
        let mut writer = zip.finish().with_context(|| "Failed to finish docx package")?;
        writer.flush().with_context(|| "Failed to flush docx package")?;

        Ok(stats)
    }
}

impl Render for Docx {
    fn render(&self, selection: &PageSelection, progress: &ProgressBar) -> Result<RenderStats> {
        progress.set_message("Writing DOCX...");

        let file = File::create(&self.outfile).with_context(|| {
            format!("Failed to create output file {}", self.outfile.display())
        })?;
        let stats = self
            .write_to(selection, BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", self.outfile.display()))?;

        progress.finish_and_clear();
        Ok(stats)
    }
}
