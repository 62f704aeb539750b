//! PPTX (OPC package) writer.
//!
//! The generated package is the minimal set of parts PowerPoint needs to open
//! the deck: content types, package relationships, document properties, the
//! presentation part, one blank master/layout/theme, and one slide part per
//! [`Slide`] with its relationships and embedded media. All XML is assembled
//! as strings; geometry is fixed and expressed in EMU.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use zip::write::SimpleFileOptions;

use crate::slide::{Deck, Slide};
use crate::DeckResult;

const XMLNS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const XMLNS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XMLNS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

/// 16:9 slide surface (13.333in x 7.5in).
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;

const EMU_PER_INCH: f64 = 914_400.0;

/// Dark heading and muted fact colors, Arial throughout.
const HEADING_COLOR: &str = "363636";
const FACT_COLOR: &str = "666666";
const FONT_FACE: &str = "Arial";

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Escape text for placement inside XML content or attribute values.
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Media file embedded by one slide.
struct MediaEntry {
    /// 1-based slide number that owns the image.
    slide_no: usize,
    /// File name under `ppt/media/`.
    file_name: String,
    /// Content type of the image.
    content_type: &'static str,
    /// Extension used in the content-types defaults.
    extension: String,
    /// Raw image bytes.
    bytes: Vec<u8>,
}

fn media_content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Collect embedded images, reading each file once.
fn collect_media(deck: &Deck) -> DeckResult<Vec<MediaEntry>> {
    let mut media = Vec::new();
    for (idx, slide) in deck.slides().iter().enumerate() {
        if let Slide::Member {
            image: Some(path), ..
        } = slide
        {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_else(|| "jpg".to_string());
            let bytes = std::fs::read(path)?;
            media.push(MediaEntry {
                slide_no: idx + 1,
                file_name: format!("image{}.{}", media.len() + 1, extension),
                content_type: media_content_type(&extension),
                extension,
                bytes,
            });
        }
    }
    Ok(media)
}

pub(crate) fn write_package(deck: &Deck, path: &Path) -> DeckResult<()> {
    let media = collect_media(deck)?;
    let slide_count = deck.slide_count();

    let file = File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let opts = SimpleFileOptions::default();

    let part = |zip: &mut zip::ZipWriter<File>, name: &str, body: String| -> DeckResult<()> {
        zip.start_file(name, opts)?;
        zip.write_all(body.as_bytes())?;
        Ok(())
    };

    part(&mut zip, "[Content_Types].xml", content_types_xml(slide_count, &media))?;
    part(&mut zip, "_rels/.rels", root_rels_xml())?;
    part(&mut zip, "docProps/core.xml", core_props_xml(deck))?;
    part(&mut zip, "docProps/app.xml", app_props_xml(slide_count))?;
    part(&mut zip, "ppt/presentation.xml", presentation_xml(slide_count))?;
    part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(slide_count),
    )?;
    part(&mut zip, "ppt/slideMasters/slideMaster1.xml", slide_master_xml())?;
    part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        slide_master_rels_xml(),
    )?;
    part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", slide_layout_xml())?;
    part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        slide_layout_rels_xml(),
    )?;
    part(&mut zip, "ppt/theme/theme1.xml", theme_xml())?;

    for (idx, slide) in deck.slides().iter().enumerate() {
        let slide_no = idx + 1;
        let image = media.iter().find(|m| m.slide_no == slide_no);
        part(
            &mut zip,
            &format!("ppt/slides/slide{slide_no}.xml"),
            slide_xml(slide, image.is_some()),
        )?;
        part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{slide_no}.xml.rels"),
            slide_rels_xml(image.map(|m| m.file_name.as_str())),
        )?;
    }

    for entry in &media {
        zip.start_file(format!("ppt/media/{}", entry.file_name), opts)?;
        zip.write_all(&entry.bytes)?;
    }

    zip.finish()?;
    Ok(())
}

fn content_types_xml(slide_count: usize, media: &[MediaEntry]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    );
    xml.push_str(
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    );
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");

    let mut seen_exts: Vec<&str> = Vec::new();
    for entry in media {
        if !seen_exts.contains(&entry.extension.as_str()) {
            seen_exts.push(&entry.extension);
            xml.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                entry.extension, entry.content_type
            ));
        }
    }

    xml.push_str(
        "<Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>",
    );
    xml.push_str(
        "<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>",
    );
    xml.push_str(
        "<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>",
    );
    xml.push_str(
        "<Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
    );
    for slide_no in 1..=slide_count {
        xml.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{slide_no}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
        ));
    }
    xml.push_str(
        "<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>",
    );
    xml.push_str(
        "<Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>",
    );
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    xml.push_str(
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"ppt/presentation.xml\"/>",
    );
    xml.push_str(
        "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>",
    );
    xml.push_str(
        "<Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" Target=\"docProps/app.xml\"/>",
    );
    xml.push_str("</Relationships>");
    xml
}

fn core_props_xml(deck: &Deck) -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let title = deck
        .slides()
        .first()
        .map(|s| xml_escape(s.heading()))
        .unwrap_or_default();
    format!(
        "{XML_DECL}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"><dc:title>{title}</dc:title><dc:creator>rosterdeck</dc:creator><cp:lastModifiedBy>rosterdeck</cp:lastModifiedBy><dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created><dcterms:modified xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:modified></cp:coreProperties>",
    )
}

fn app_props_xml(slide_count: usize) -> String {
    format!(
        "{XML_DECL}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\"><Application>rosterdeck</Application><Slides>{slide_count}</Slides></Properties>",
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}<p:presentation xmlns:a=\"{XMLNS_A}\" xmlns:r=\"{XMLNS_R}\" xmlns:p=\"{XMLNS_P}\">",
    );
    xml.push_str(
        "<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>",
    );
    xml.push_str("<p:sldIdLst>");
    for slide_no in 1..=slide_count {
        // Slide relationship IDs follow the master at rId1.
        xml.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            255 + slide_no,
            1 + slide_no
        ));
    }
    xml.push_str("</p:sldIdLst>");
    xml.push_str(&format!("<p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>"));
    xml.push_str("<p:notesSz cx=\"6858000\" cy=\"9144000\"/>");
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    xml.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"slideMasters/slideMaster1.xml\"/>",
    ));
    for slide_no in 1..=slide_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_SLIDE}\" Target=\"slides/slide{slide_no}.xml\"/>",
            1 + slide_no,
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Empty shape tree shared by the master, layout, and plain slides.
fn empty_sp_tree(shapes: &str) -> String {
    format!(
        "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>{shapes}</p:spTree>",
    )
}

fn slide_master_xml() -> String {
    format!(
        "{XML_DECL}<p:sldMaster xmlns:a=\"{XMLNS_A}\" xmlns:r=\"{XMLNS_R}\" xmlns:p=\"{XMLNS_P}\"><p:cSld>{}</p:cSld><p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/><p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst></p:sldMaster>",
        empty_sp_tree(""),
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/><Relationship Id=\"rId2\" Type=\"{REL_THEME}\" Target=\"../theme/theme1.xml\"/></Relationships>",
    )
}

fn slide_layout_xml() -> String {
    format!(
        "{XML_DECL}<p:sldLayout xmlns:a=\"{XMLNS_A}\" xmlns:r=\"{XMLNS_R}\" xmlns:p=\"{XMLNS_P}\" type=\"blank\" preserve=\"1\"><p:cSld name=\"Blank\">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        empty_sp_tree(""),
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"../slideMasters/slideMaster1.xml\"/></Relationships>",
    )
}

fn theme_xml() -> String {
    format!(
        "{XML_DECL}<a:theme xmlns:a=\"{XMLNS_A}\" name=\"Office Theme\"><a:themeElements><a:clrScheme name=\"Office\"><a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1><a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1><a:dk2><a:srgbClr val=\"44546A\"/></a:dk2><a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2><a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1><a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2><a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3><a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4><a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5><a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6><a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink><a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink></a:clrScheme><a:fontScheme name=\"Office\"><a:majorFont><a:latin typeface=\"{FONT_FACE}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont><a:minorFont><a:latin typeface=\"{FONT_FACE}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont></a:fontScheme><a:fmtScheme name=\"Office\"><a:fillStyleLst><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln><a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln><a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>",
    )
}

/// A positioned text box with pre-rendered paragraphs.
fn text_box(id: u32, name: &str, x: i64, y: i64, cx: i64, cy: i64, paragraphs: &str) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap=\"square\"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
    )
}

fn heading_paragraph(text: &str, size_cpt: u32, centered: bool) -> String {
    let ppr = if centered { "<a:pPr algn=\"ctr\"/>" } else { "" };
    format!(
        "<a:p>{ppr}<a:r><a:rPr lang=\"en-US\" sz=\"{size_cpt}\" b=\"1\"><a:solidFill><a:srgbClr val=\"{HEADING_COLOR}\"/></a:solidFill><a:latin typeface=\"{FONT_FACE}\"/></a:rPr><a:t>{}</a:t></a:r></a:p>",
        xml_escape(text),
    )
}

fn fact_paragraph(text: &str) -> String {
    format!(
        "<a:p><a:pPr><a:lnSpc><a:spcPts val=\"3000\"/></a:lnSpc><a:buFont typeface=\"{FONT_FACE}\"/><a:buChar char=\"\u{2022}\"/></a:pPr><a:r><a:rPr lang=\"en-US\" sz=\"1800\"><a:solidFill><a:srgbClr val=\"{FACT_COLOR}\"/></a:solidFill><a:latin typeface=\"{FONT_FACE}\"/></a:rPr><a:t>{}</a:t></a:r></a:p>",
        xml_escape(text),
    )
}

fn picture(id: u32, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Portrait\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
    )
}

fn slide_xml(slide: &Slide, has_image: bool) -> String {
    let shapes = match slide {
        Slide::Title { heading } => {
            // Centered 44pt heading across 80% of the slide width.
            text_box(
                2,
                "Title",
                emu(1.0),
                emu(2.0),
                emu(10.667),
                emu(1.5),
                &heading_paragraph(heading, 4400, true),
            )
        }
        Slide::Member {
            heading, facts, ..
        } => {
            let mut shapes = text_box(
                2,
                "Name",
                emu(0.5),
                emu(0.5),
                emu(12.0),
                emu(1.0),
                &heading_paragraph(heading, 3600, false),
            );
            if has_image {
                shapes.push_str(&picture(3, emu(0.5), emu(1.7), emu(3.0), emu(3.0)));
            }
            if !facts.is_empty() {
                let paragraphs: String = facts.iter().map(|f| fact_paragraph(f)).collect();
                shapes.push_str(&text_box(
                    4,
                    "Facts",
                    emu(4.0),
                    emu(1.7),
                    emu(5.5),
                    emu(3.0),
                    &paragraphs,
                ));
            }
            shapes
        }
    };

    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{XMLNS_A}\" xmlns:r=\"{XMLNS_R}\" xmlns:p=\"{XMLNS_P}\"><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        empty_sp_tree(&shapes),
    )
}

fn slide_rels_xml(image_file: Option<&str>) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    xml.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>",
    ));
    if let Some(file_name) = image_file {
        xml.push_str(&format!(
            "<Relationship Id=\"rId2\" Type=\"{REL_IMAGE}\" Target=\"../media/{file_name}\"/>",
        ));
    }
    xml.push_str("</Relationships>");
    xml
}
