// ABOUTME: PPTX generation module for the cranio-deck application
// ABOUTME: Serializes an in-memory deck into an Office Open XML presentation package

use crate::deck::{Deck, MediaFormat, Paragraph, PlaceholderKind, Rect, Shape, Slide, TextFrame, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::errors::{DeckError, Result};
use crate::template;
use crate::utils;
use log::{debug, info};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{Seek, Write};
use std::path::Path;
use zip::{write::FileOptions, ZipWriter};

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Document properties written into the package
pub struct PptxConfig {
    pub title: String,
    pub creator: String,
}

impl Default for PptxConfig {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            creator: "cranio-deck".to_string(),
        }
    }
}

/// A picture part and the slide relationship that points at it.
struct MediaPart<'a> {
    rel_id: String,
    name: String,
    data: &'a [u8],
}

/// Write a deck to `output_file` as a PPTX package, replacing any existing file.
pub fn write_pptx(deck: &Deck, output_file: &Path, config: &PptxConfig) -> Result<()> {
    info!("Generating PPTX with {} slides at {:?}", deck.slide_count(), output_file);

    if deck.slide_count() == 0 {
        return Err(DeckError::PptxError("Deck has no slides".to_string()));
    }

    utils::prepare_output_path(output_file)?;

    let file = fs::File::create(output_file).map_err(DeckError::IoError)?;
    write_package(deck, file, config)?;

    info!("PPTX file created at {:?}", output_file);
    Ok(())
}

/// Write the package parts for `deck` into any seekable writer.
pub fn write_package<W: Write + Seek>(deck: &Deck, writer: W, config: &PptxConfig) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let slide_count = deck.slide_count();

    write_part(&mut zip, "[Content_Types].xml", &content_types_xml(slide_count))?;
    write_part(&mut zip, "_rels/.rels", PACKAGE_RELS_XML)?;
    write_part(&mut zip, "docProps/app.xml", &app_xml(slide_count))?;
    write_part(&mut zip, "docProps/core.xml", &core_xml(config))?;
    write_part(&mut zip, "ppt/_rels/presentation.xml.rels", &presentation_rels_xml(slide_count))?;
    write_part(&mut zip, "ppt/presentation.xml", &presentation_xml(slide_count))?;
    write_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER_XML)?;
    write_part(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", template::SLIDE_MASTER_RELS_XML)?;
    write_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT_XML)?;
    write_part(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", template::SLIDE_LAYOUT_RELS_XML)?;
    write_part(&mut zip, "ppt/theme/theme1.xml", template::THEME_XML)?;

    let mut media_counter = 0;
    for (i, slide) in deck.slides().iter().enumerate() {
        let slide_num = i + 1;
        debug!("Processing slide {}: {:?}", slide_num, slide.title());

        // rId1 is the layout; pictures follow in shape order
        let media: Vec<MediaPart> = slide
            .pictures()
            .enumerate()
            .map(|(j, image)| {
                media_counter += 1;
                MediaPart {
                    rel_id: format!("rId{}", j + 2),
                    name: format!("image{}.{}", media_counter, image.format.extension()),
                    data: &image.data,
                }
            })
            .collect();

        for part in &media {
            info!("Adding image to PPTX: ppt/media/{}", part.name);
            zip.start_file(format!("ppt/media/{}", part.name), FileOptions::default())?;
            zip.write_all(part.data)?;
        }

        write_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            &slide_rels_xml(&media),
        )?;
        write_part(
            &mut zip,
            &format!("ppt/slides/slide{}.xml", slide_num),
            &slide_xml(slide, &media)?,
        )?;
    }

    // Finalize the ZIP file
    info!("Finalizing PPTX file");
    Ok(zip.finish()?)
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> Result<()> {
    debug!("Creating PPTX structure: {}", name);
    zip.start_file(name, FileOptions::default())?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

fn content_types_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
{media}
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
    <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
    <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
{slides}
</Types>"#,
        media = MediaFormat::ALL
            .iter()
            .map(|f| format!(
                r#"    <Default Extension="{}" ContentType="{}"/>"#,
                f.extension(),
                f.content_type()
            ))
            .collect::<Vec<String>>()
            .join("\n"),
        slides = (1..=slide_count)
            .map(|n| format!(
                r#"    <Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            ))
            .collect::<Vec<String>>()
            .join("\n")
    )
}

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>cranio-deck</Application>
    <Slides>{}</Slides>
</Properties>"#,
        slide_count
    )
}

fn core_xml(config: &PptxConfig) -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{title}</dc:title>
    <dc:creator>{creator}</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        title = escape(&config.title),
        creator = escape(&config.creator),
        now = now
    )
}

// rId1 is the master, rId2 the theme, slides start at rId3
fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
"#,
    );
    for n in 1..=slide_count {
        rels.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            n + 2,
            n
        ));
        rels.push('\n');
    }
    rels.push_str("</Relationships>");
    rels
}

fn presentation_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {ns} saveSubsetFonts="1">
    <p:sldMasterIdLst>
        <p:sldMasterId id="2147483648" r:id="rId1"/>
    </p:sldMasterIdLst>
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        ns = NS_DECL,
        slide_ids = (0..slide_count)
            .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3))
            .collect::<Vec<String>>()
            .join("\n"),
        cx = SLIDE_WIDTH,
        cy = SLIDE_HEIGHT
    )
}

fn slide_rels_xml(media: &[MediaPart]) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
"#,
    );
    for part in media {
        rels.push_str(&format!(
            r#"    <Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
            part.rel_id, part.name
        ));
        rels.push('\n');
    }
    rels.push_str("</Relationships>");
    rels
}

/// Render one slide's XML. `media` supplies relationship ids for its pictures, in order.
fn slide_xml(slide: &Slide, media: &[MediaPart]) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, "<p:sld {}>", NS_DECL)?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    let mut pictures = media.iter();
    // Group shape uses id 1
    for (shape_id, shape) in (2u32..).zip(slide.shapes.iter()) {
        match shape {
            Shape::Placeholder { kind, frame, text } => {
                let (name, ph) = match kind {
                    PlaceholderKind::CenteredTitle => ("Title", r#"<p:ph type="ctrTitle"/>"#),
                    PlaceholderKind::Subtitle => ("Subtitle", r#"<p:ph type="subTitle" idx="1"/>"#),
                    PlaceholderKind::Title => ("Title", r#"<p:ph type="title"/>"#),
                    PlaceholderKind::Body => ("Content", r#"<p:ph idx="1"/>"#),
                };
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{} {}"/>"#, shape_id, name, shape_id)?;
                xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
                write!(xml, "<p:nvPr>{}</p:nvPr>", ph)?;
                xml.push_str("</p:nvSpPr><p:spPr>");
                write_xfrm(&mut xml, frame)?;
                xml.push_str("</p:spPr>");
                write_text_body(&mut xml, text)?;
                xml.push_str("</p:sp>");
            }
            Shape::TextBox { frame, text } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="TextBox {}"/>"#, shape_id, shape_id)?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/>"#);
                xml.push_str("</p:nvSpPr><p:spPr>");
                write_xfrm(&mut xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
                xml.push_str("</p:spPr>");
                write_text_body(&mut xml, text)?;
                xml.push_str("</p:sp>");
            }
            Shape::Picture {
                frame, description, ..
            } => {
                let part = pictures.next().ok_or_else(|| {
                    DeckError::PptxError("Picture without a media relationship".to_string())
                })?;
                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    shape_id,
                    shape_id,
                    escape(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#);
                xml.push_str("</p:nvPicPr><p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, part.rel_id)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>");
                write_xfrm(&mut xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr></p:pic>");
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

fn write_xfrm(xml: &mut String, frame: &Rect) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.width, frame.height
    )?;
    Ok(())
}

fn write_text_body(xml: &mut String, text: &TextFrame) -> Result<()> {
    xml.push_str("<p:txBody>");
    if text.word_wrap {
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#);
    } else {
        xml.push_str(r#"<a:bodyPr wrap="none" rtlCol="0"/>"#);
    }
    xml.push_str("<a:lstStyle/>");
    for paragraph in &text.paragraphs {
        write_paragraph(xml, paragraph)?;
    }
    xml.push_str("</p:txBody>");
    Ok(())
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) -> Result<()> {
    xml.push_str("<a:p>");
    if paragraph.level > 0 {
        write!(xml, r#"<a:pPr lvl="{}"/>"#, paragraph.level)?;
    }
    xml.push_str("<a:r>");
    match paragraph.font_size {
        Some(pt) => write!(xml, r#"<a:rPr lang="en-US" sz="{}" dirty="0"/>"#, pt * 100)?,
        None => xml.push_str(r#"<a:rPr lang="en-US" dirty="0"/>"#),
    }
    write!(xml, "<a:t>{}</a:t>", escape(&paragraph.text))?;
    xml.push_str("</a:r></a:p>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SYNDROMES;
    use crate::resolver::ResolvedImage;

    #[test]
    fn test_slide_xml_escapes_text() {
        let mut deck = Deck::new();
        deck.add_references_slide(&["Image: A & B <test>".to_string()]);

        let xml = slide_xml(&deck.slides()[0], &[]).unwrap();
        assert!(xml.contains("<a:t>Image: A &amp; B &lt;test&gt;</a:t>"));
        assert!(xml.contains(r#"sz="1200""#));
    }

    #[test]
    fn test_record_slide_xml_marks_bullet_level() {
        let mut deck = Deck::new();
        deck.add_record_slide(&SYNDROMES[0], &ResolvedImage::Unresolved);

        let xml = slide_xml(&deck.slides()[0], &[]).unwrap();
        assert!(xml.contains(r#"<a:pPr lvl="1"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#));
        assert!(!xml.contains("<p:pic>"));
    }

    #[test]
    fn test_presentation_xml_lists_every_slide() {
        let xml = presentation_xml(3);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));
        assert!(!xml.contains(r#"r:id="rId6""#));

        let rels = presentation_rels_xml(3);
        assert!(rels.contains(r#"Id="rId5""#));
        assert!(rels.contains("slides/slide3.xml"));
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = write_pptx(&Deck::new(), &dir.path().join("empty.pptx"), &PptxConfig::default());
        assert!(matches!(result, Err(DeckError::PptxError(_))));
    }
}
