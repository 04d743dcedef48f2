//! Inline pictures (`w:drawing/wp:inline`)

use super::xml::Element;
use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::fs;
use std::path::Path;

pub const EMU_PER_INCH: f64 = 914_400.0;
pub const TWIPS_PER_CM: f64 = 1440.0 / 2.54;

/// An image ready to be embedded in a document part
#[derive(Debug, Clone)]
pub struct PictureSource {
    pub file_name: String,
    pub extension: String,
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl PictureSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
        let (width_px, height_px) = image::image_dimensions(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "png".to_string());

        Ok(Self {
            file_name,
            extension,
            data,
            width_px,
            height_px,
        })
    }

    /// Extent in EMU for a fixed width, keeping the aspect ratio
    pub fn extent_for_width(&self, width_inches: f64) -> (i64, i64) {
        let cx = (width_inches * EMU_PER_INCH).round() as i64;
        if self.width_px == 0 {
            return (cx, cx);
        }
        let cy = (cx as f64 * f64::from(self.height_px) / f64::from(self.width_px)).round() as i64;
        (cx, cy)
    }
}

pub fn cm_to_twips(cm: f64) -> i64 {
    (cm * TWIPS_PER_CM).round() as i64
}

/// Build a `w:r` holding an inline picture that references `rel_id`
pub fn picture_run(rel_id: &str, shape_id: u32, name: &str, cx: i64, cy: i64) -> Result<Element> {
    let name = escape(name);
    let xml = format!(
        r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{shape_id}" name="Picture {shape_id}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rel_id}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
    );
    Element::parse_fragment(&xml)
}

/// Highest `wp:docPr` id used under `root`
pub fn max_shape_id(root: &Element) -> u32 {
    let mut max = 0;
    root.walk(&mut |e| {
        if e.name == "wp:docPr" {
            if let Some(id) = e.attr("id").and_then(|v| v.parse::<u32>().ok()) {
                max = max.max(id);
            }
        }
    });
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_keeps_aspect_ratio() {
        let picture = PictureSource {
            file_name: "grafico.png".to_string(),
            extension: "png".to_string(),
            data: Vec::new(),
            width_px: 800,
            height_px: 400,
        };
        assert_eq!(picture.extent_for_width(6.0), (5_486_400, 2_743_200));
    }

    #[test]
    fn test_margin_twips() {
        assert_eq!(cm_to_twips(4.0), 2268);
        assert_eq!(cm_to_twips(2.54), 1440);
    }

    #[test]
    fn test_picture_run_structure() {
        let run = picture_run("rId7", 3, "a&b.png", 100, 50).unwrap();
        assert!(run.contains_element("w:drawing"));
        assert!(run.contains_element("a:blip"));
        assert_eq!(max_shape_id(&run), 3);
    }
}
