//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use coverage_report::models::columns;
use image::{DynamicImage, ImageFormat, RgbImage};
use rust_xlsxwriter::{Image, Workbook};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// PNG bytes of a solid image
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn write_png(path: &Path, width: u32, height: u32) -> PathBuf {
    std::fs::write(path, png_bytes(width, height)).unwrap();
    path.to_path_buf()
}

/// Paragraph with a single run
pub fn p(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// Paragraph whose runs carry the given texts, the first one bold
pub fn p_runs(texts: &[&str]) -> String {
    let runs: String = texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let rpr = if i == 0 { "<w:rPr><w:b/></w:rPr>" } else { "" };
            format!(r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#, rpr, t)
        })
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// Single-cell-per-row table
pub fn table(cells: &[&str]) -> String {
    let rows: String = cells
        .iter()
        .map(|c| format!("<w:tr><w:tc>{}</w:tc></w:tr>", p(c)))
        .collect();
    format!("<w:tbl>{}</w:tbl>", rows)
}

/// A header part holding a picture run plus the given text
pub fn header_with_drawing(text: &str) -> String {
    format!(
        r#"<w:hdr xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:p><w:r><w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:extent cx="100" cy="100"/><wp:docPr id="7" name="old"/></wp:inline></w:drawing></w:r><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p></w:hdr>"#
    )
}

pub fn footer(text: &str) -> String {
    format!(r#"<w:ftr xmlns:w="{W_NS}" xmlns:r="{R_NS}">{}</w:ftr>"#, p(text))
}

/// Literal OOXML parts zipped into a .docx
pub struct DocxBuilder {
    body: String,
    header: Option<String>,
    footer: Option<String>,
}

impl DocxBuilder {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            header: None,
            footer: None,
        }
    }

    pub fn header(mut self, xml: impl Into<String>) -> Self {
        self.header = Some(xml.into());
        self
    }

    pub fn footer(mut self, xml: impl Into<String>) -> Self {
        self.footer = Some(xml.into());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut overrides = String::from(
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        );
        let mut rels = String::new();
        let mut refs = String::new();
        if self.header.is_some() {
            overrides.push_str(r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#);
            rels.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>"#);
            refs.push_str(r#"<w:headerReference w:type="default" r:id="rId1"/>"#);
        }
        if self.footer.is_some() {
            overrides.push_str(r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#);
            rels.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>"#);
            refs.push_str(r#"<w:footerReference w:type="default" r:id="rId2"/>"#);
        }

        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
        );
        let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;
        let document_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        );
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{}<w:sectPr>{refs}<w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1417" w:right="1701" w:bottom="1417" w:left="1701" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
            self.body
        );

        let mut files: Vec<(&str, String)> = vec![
            ("[Content_Types].xml", content_types),
            ("_rels/.rels", root_rels.to_string()),
            ("word/document.xml", document),
            ("word/_rels/document.xml.rels", document_rels),
        ];
        if let Some(header) = &self.header {
            files.push(("word/header1.xml", header.clone()));
        }
        if let Some(footer) = &self.footer {
            files.push(("word/footer1.xml", footer.clone()));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.build()).unwrap();
        path.to_path_buf()
    }
}

/// One data row of the coverage sheet
pub struct Row<'a> {
    pub locality: &'a str,
    pub operator: &'a str,
    pub report_number: &'a str,
    pub schedule_date: &'a str,
}

/// Coverage workbook with every required column
pub fn write_coverage_workbook(path: &Path, sheet: &str, rows: &[Row<'_>]) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();

    for (col, name) in columns::REQUIRED.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, name) in columns::REQUIRED.iter().enumerate() {
            let col = col as u16;
            match *name {
                columns::LOCALITY => worksheet.write_string(r, col, row.locality),
                columns::CANTON => worksheet.write_string(r, col, "QUITO"),
                columns::PROVINCE => worksheet.write_string(r, col, "PICHINCHA"),
                columns::OPERATOR => worksheet.write_string(r, col, row.operator),
                columns::SCHEDULE_DATE => worksheet.write_string(r, col, row.schedule_date),
                columns::REPORT_NUMBER => worksheet.write_string(r, col, row.report_number),
                columns::REPORT_DATE => worksheet.write_string(r, col, "2025-02-14"),
                columns::TOTAL_SAMPLES_ARCOTEL => worksheet.write_number(r, col, 1200.0),
                columns::VALID_SAMPLES_ARCOTEL => worksheet.write_number(r, col, 1180.0),
                columns::MEASURED_VALUE => worksheet.write_number(r, col, 97.5),
                _ => worksheet.write_string(r, col, "SI"),
            }
            .unwrap();
        }
    }

    workbook.save(path).unwrap();
    path.to_path_buf()
}

/// Workbook whose sheet holds pictures of the given sizes, in order
pub fn write_chart_workbook(path: &Path, sheet: &str, sizes: &[(u32, u32)]) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    worksheet.write_string(0, 0, "Mapas").unwrap();

    for (i, (w, h)) in sizes.iter().enumerate() {
        let image = Image::new_from_buffer(&png_bytes(*w, *h)).unwrap();
        worksheet
            .insert_image(2 + (i as u32) * 20, 1, &image)
            .unwrap();
    }

    workbook.save(path).unwrap();
    path.to_path_buf()
}
