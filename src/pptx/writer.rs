//! Minimal PPTX writer: one full-slide picture per slide.

use crate::error::Result;
use crate::package::{PackageWriter, RelationshipList, REL_IMAGE, XML_DECLARATION};
use std::path::Path;

use super::{PRESENTATION_CONTENT_TYPE, PRESENTATION_PART};

/// Slide width in EMU (10 inches).
pub const SLIDE_WIDTH_EMU: u64 = 9_144_000;

/// Slide height in EMU (7.5 inches).
pub const SLIDE_HEIGHT_EMU: u64 = 6_858_000;

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const LAYOUT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const MASTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const THEME_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

const NAMESPACES: &str = concat!(
    r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
    r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
    r#" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Root group of every shape tree.
const GROUP_PROPERTIES: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Builds a presentation whose slides are PNG pictures stretched to fill
/// the slide, on a blank layout.
#[derive(Debug, Default)]
pub struct PptxWriter {
    slides: Vec<Vec<u8>>,
}

impl PptxWriter {
    /// Create an empty presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide showing `png`.
    pub fn add_picture_slide(&mut self, png: Vec<u8>) {
        self.slides.push(png);
    }

    /// Number of slides added so far.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Check if no slide was added.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Write the package to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut package = PackageWriter::create(path)?;
        package.default_content_type("png", "image/png");

        package.add_part("ppt/theme/theme1.xml", THEME_CONTENT_TYPE, &theme_xml())?;

        let mut master_rels = RelationshipList::default();
        let layout_rel = master_rels.push(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.push(REL_THEME, "../theme/theme1.xml");
        package.add_part(
            "ppt/slideMasters/slideMaster1.xml",
            MASTER_CONTENT_TYPE,
            &master_xml(&layout_rel),
        )?;
        package.add_raw(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            master_rels.to_xml().as_bytes(),
        )?;

        let mut layout_rels = RelationshipList::default();
        layout_rels.push(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.add_part(
            "ppt/slideLayouts/slideLayout1.xml",
            LAYOUT_CONTENT_TYPE,
            &layout_xml(),
        )?;
        package.add_raw(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            layout_rels.to_xml().as_bytes(),
        )?;

        let mut presentation_rels = RelationshipList::default();
        let master_rel = presentation_rels.push(REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        presentation_rels.push(REL_THEME, "theme/theme1.xml");

        let mut slide_rel_ids = Vec::with_capacity(self.slides.len());
        for (i, png) in self.slides.iter().enumerate() {
            let number = i + 1;
            package.add_raw(&format!("ppt/media/image{}.png", number), png)?;

            let mut slide_rels = RelationshipList::default();
            slide_rels.push(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
            let image_rel = slide_rels.push(REL_IMAGE, format!("../media/image{}.png", number));
            package.add_part(
                &format!("ppt/slides/slide{}.xml", number),
                SLIDE_CONTENT_TYPE,
                &slide_xml(number, &image_rel),
            )?;
            package.add_raw(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                slide_rels.to_xml().as_bytes(),
            )?;

            slide_rel_ids.push(
                presentation_rels.push(REL_SLIDE, format!("slides/slide{}.xml", number)),
            );
        }

        package.add_part(
            PRESENTATION_PART,
            PRESENTATION_CONTENT_TYPE,
            &presentation_xml(&master_rel, &slide_rel_ids),
        )?;
        package.add_raw(
            "ppt/_rels/presentation.xml.rels",
            presentation_rels.to_xml().as_bytes(),
        )?;
        package.finish(PRESENTATION_PART)
    }
}

fn presentation_xml(master_rel: &str, slide_rels: &[String]) -> String {
    let mut xml = format!(
        r#"{}<p:presentation{}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
        XML_DECLARATION, NAMESPACES, master_rel
    );
    if !slide_rels.is_empty() {
        xml.push_str("<p:sldIdLst>");
        // slide ids start at 256
        for (i, rel) in slide_rels.iter().enumerate() {
            xml.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, rel));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
        SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU
    ));
    xml
}

fn slide_xml(number: usize, image_rel: &str) -> String {
    format!(
        concat!(
            "{decl}<p:sld{ns}><p:cSld><p:spTree>{group}",
            "<p:pic><p:nvPicPr>",
            r#"<p:cNvPr id="2" name="Picture {n}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#,
            "</p:nvPicPr>",
            r#"<p:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            "</p:pic></p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
        ),
        decl = XML_DECLARATION,
        ns = NAMESPACES,
        group = GROUP_PROPERTIES,
        n = number,
        rel = image_rel,
        cx = SLIDE_WIDTH_EMU,
        cy = SLIDE_HEIGHT_EMU
    )
}

fn layout_xml() -> String {
    format!(
        concat!(
            r#"{}<p:sldLayout{} type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        XML_DECLARATION, NAMESPACES, GROUP_PROPERTIES
    )
}

fn master_xml(layout_rel: &str) -> String {
    format!(
        concat!(
            "{}<p:sldMaster{}><p:cSld><p:spTree>{}</p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2""#,
            r#" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6""#,
            r#" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="{}"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        XML_DECLARATION, NAMESPACES, GROUP_PROPERTIES, layout_rel
    )
}

fn theme_xml() -> String {
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];
    let mut scheme = String::new();
    for (name, rgb) in colors {
        scheme.push_str(&format!(r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, rgb));
    }

    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let font = r#"<a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/>"#;

    format!(
        concat!(
            r#"{decl}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#,
            r#"<a:themeElements><a:clrScheme name="Office">{scheme}</a:clrScheme>"#,
            r#"<a:fontScheme name="Office"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme>"#,
            r#"<a:fmtScheme name="Office">"#,
            "<a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>",
            "<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>",
            "<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>",
            "</a:fmtScheme></a:themeElements></a:theme>"
        ),
        decl = XML_DECLARATION,
        scheme = scheme,
        font = font,
        fill = fill,
        line = line,
        effect = effect
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::OoxmlContainer;
    use crate::detect::detect_format_from_path;
    use crate::format::Format;
    use crate::pptx::PresentationInfo;

    #[test]
    fn test_picture_slides_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.pptx");

        let mut writer = PptxWriter::new();
        writer.add_picture_slide(vec![0x89, b'P', b'N', b'G', 1]);
        writer.add_picture_slide(vec![0x89, b'P', b'N', b'G', 2]);
        assert_eq!(writer.len(), 2);
        writer.save(&path).unwrap();

        assert_eq!(detect_format_from_path(&path).unwrap(), Format::Pptx);

        let info = PresentationInfo::open(&path).unwrap();
        assert_eq!(info.slide_count(), 2);
        assert_eq!(info.slide_ids, vec!["rId3", "rId4"]);

        let container = OoxmlContainer::open(&path).unwrap();
        let rels = container.read_relationships(PRESENTATION_PART).unwrap();
        assert_eq!(rels.get("rId4").unwrap().target, "slides/slide2.xml");

        let slide_rels = container.read_relationships("ppt/slides/slide2.xml").unwrap();
        let image = OoxmlContainer::resolve_path(
            "ppt/slides/slide2.xml",
            &slide_rels.get("rId2").unwrap().target,
        );
        assert_eq!(image, "ppt/media/image2.png");
        assert_eq!(container.read_binary(&image).unwrap()[4], 2);

        let slide = container.read_xml("ppt/slides/slide1.xml").unwrap();
        assert!(slide.contains(r#"<a:ext cx="9144000" cy="6858000"/>"#));
    }

    #[test]
    fn test_empty_presentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pptx");
        PptxWriter::new().save(&path).unwrap();

        assert_eq!(PresentationInfo::open(&path).unwrap().slide_count(), 0);
        let xml = OoxmlContainer::open(&path)
            .unwrap()
            .read_xml(PRESENTATION_PART)
            .unwrap();
        assert!(!xml.contains("sldIdLst"));
    }
}
