//! Recomposition: substitute every placeholder run in `word/document.xml`
//! with an inline drawing of the captured photo, sized in EMU from the cell's
//! physical dimensions, and rebuild the package.
//!
//! The substitution is text-level on the XML source, not a reserialization:
//! everything outside the replaced runs (and the appended relationship /
//! content-type registrations) stays byte-for-byte identical to the template.

use std::ops::Range;

use crate::archive::{self, Entry};
use crate::docx::{DML_NS, REL_NS, WPD_NS};
use crate::error::Error;
use crate::model::{CapturedPhoto, PlaceholderSpec};
use crate::units::mm_to_emu;

pub const DOCUMENT_PART: &str = "word/document.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const PICTURE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Inline-drawing run replacing one placeholder run. Namespaces the template
/// root may not declare (wp, a, pic, r) are declared on the elements that
/// use them, so the fragment is valid wherever it lands.
fn drawing_run(rel_id: &str, name: &str, doc_pr_id: usize, cx: i64, cy: i64) -> String {
    format!(
        "<w:r><w:drawing>\
         <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\" xmlns:wp=\"{WPD_NS}\">\
         <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
         <wp:docPr id=\"{doc_pr_id}\" name=\"{name}\"/>\
         <a:graphic xmlns:a=\"{DML_NS}\">\
         <a:graphicData uri=\"{PICTURE_URI}\">\
         <pic:pic xmlns:pic=\"{PICTURE_URI}\">\
         <pic:nvPicPr><pic:cNvPr id=\"{doc_pr_id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"{rel_id}\" xmlns:r=\"{REL_NS}\"/>\
         <a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"
    )
}

/// First occurrence of `token` not followed by a digit. The boundary check
/// keeps `PHOTO1` from matching inside `PHOTO12`.
fn find_token(xml: &str, token: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = xml[from..].find(token) {
        let abs = from + pos;
        let tail = &xml[abs + token.len()..];
        if !tail.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(abs);
        }
        from = abs + token.len();
    }
    None
}

/// Byte span of the `index`-th `name` element inside `bounds`, covering the
/// opening tag through the matching close. Nested elements of the same name
/// (a table inside a cell) are skipped by depth counting, not miscounted.
fn nth_element_span(
    xml: &str,
    bounds: Range<usize>,
    name: &str,
    index: usize,
) -> Option<Range<usize>> {
    let open_exact = format!("<{name}>");
    let open_attr = format!("<{name} ");
    let close = format!("</{name}>");

    let find_open = |from: usize, to: usize| -> Option<usize> {
        let hay = &xml[from..to];
        match (hay.find(&open_exact), hay.find(&open_attr)) {
            (Some(a), Some(b)) => Some(from + a.min(b)),
            (Some(a), None) => Some(from + a),
            (None, Some(b)) => Some(from + b),
            (None, None) => None,
        }
    };

    let mut pos = bounds.start;
    let mut remaining = index;
    loop {
        let start = find_open(pos, bounds.end)?;
        let tag_end = xml[start..bounds.end].find('>').map(|p| start + p + 1)?;
        let end = if xml[..tag_end].ends_with("/>") {
            tag_end
        } else {
            let mut depth = 1usize;
            let mut cursor = tag_end;
            loop {
                let next_close = xml[cursor..bounds.end].find(&close).map(|p| cursor + p)?;
                match find_open(cursor, next_close) {
                    Some(inner) => {
                        depth += 1;
                        cursor = inner + open_attr.len();
                    }
                    None => {
                        depth -= 1;
                        cursor = next_close + close.len();
                        if depth == 0 {
                            break cursor;
                        }
                    }
                }
            }
        };
        if remaining == 0 {
            return Some(start..end);
        }
        remaining -= 1;
        pos = end;
    }
}

/// The XML region of the cell a spec was extracted from. Substitution is
/// anchored here so a token string appearing in narrative text elsewhere in
/// the document is never touched.
fn cell_span(document: &str, spec: &PlaceholderSpec) -> Option<Range<usize>> {
    let tbl = nth_element_span(document, 0..document.len(), "w:tbl", spec.table_index)?;
    let tr = nth_element_span(document, tbl, "w:tr", spec.row_index)?;
    nth_element_span(document, tr, "w:tc", spec.col_index)
}

/// Replace the whole `<w:r>…</w:r>` run containing the byte offset `at`.
fn replace_enclosing_run(xml: &mut String, at: usize, replacement: &str) -> Result<(), String> {
    let open = xml[..at]
        .rfind("<w:r>")
        .max(xml[..at].rfind("<w:r "))
        .ok_or("token is not inside a run")?;
    let close = xml[at..]
        .find("</w:r>")
        .map(|p| at + p + "</w:r>".len())
        .ok_or("unterminated run around token")?;
    xml.replace_range(open..close, replacement);
    Ok(())
}

fn require_mm(spec: &PlaceholderSpec, value: Option<f64>, missing: &'static str) -> Result<f64, Error> {
    value.ok_or_else(|| Error::SizeResolution {
        token: spec.token.clone(),
        table: spec.table_index,
        row: spec.row_index,
        col: spec.col_index,
        missing,
    })
}

/// Insert `fragment` immediately before the closing tag of the part.
fn insert_before_close(text: &str, closing: &str, fragment: &str) -> Result<String, Error> {
    let pos = text
        .rfind(closing)
        .ok_or_else(|| Error::Archive(format!("malformed part: no {closing}")))?;
    let mut out = String::with_capacity(text.len() + fragment.len());
    out.push_str(&text[..pos]);
    out.push_str(fragment);
    out.push_str(&text[pos..]);
    Ok(out)
}

/// Smallest drawing-object id above every `wp:docPr` id the template already
/// carries. Word requires these ids to be unique within the document part.
fn next_doc_pr_id(document: &str) -> usize {
    let mut max = 0usize;
    let mut rest = document;
    while let Some(p) = rest.find("<wp:docPr ") {
        let tag = &rest[p..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(q) = tag.find(" id=\"") {
            let digits: &str = &tag[q + 5..];
            let digits = &digits[..digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len())];
            if let Ok(v) = digits.parse::<usize>() {
                max = max.max(v);
            }
        }
        rest = &rest[p + "<wp:docPr ".len()..];
    }
    max + 1
}

fn part_text(package: &[u8], name: &str) -> Result<String, Error> {
    let bytes = archive::extract_entry(package, name)?;
    String::from_utf8(bytes).map_err(|_| Error::Archive(format!("{name} is not valid UTF-8")))
}

/// Build the finished package: template + placeholder list + photos in.
///
/// The photo list must match the placeholder list one-to-one in index order —
/// the capture session guarantees that; this function checks it rather than
/// inferring anything. Placeholders without a resolvable physical size are a
/// hard error: there is no safe default size for an embedded image.
pub fn compose(
    package: &[u8],
    specs: &[PlaceholderSpec],
    photos: &[CapturedPhoto],
) -> Result<Vec<u8>, Error> {
    let mut document = part_text(package, DOCUMENT_PART)?;
    let mut rels = part_text(package, RELS_PART)?;
    let doc_pr_base = next_doc_pr_id(&document);

    let mut media = Vec::new();
    let mut rel_fragments = String::new();

    for (i, spec) in specs.iter().enumerate() {
        let photo = photos
            .iter()
            .find(|p| p.placeholder_index == i)
            .ok_or_else(|| Error::MissingImage {
                token: spec.token.clone(),
                index: i,
            })?;

        let cx = mm_to_emu(require_mm(spec, spec.width_mm, "width")?);
        let cy = mm_to_emu(require_mm(spec, spec.height_mm, "height")?);

        // Re-resolve the cell against the current text: earlier substitutions
        // shift offsets but never add or remove tables, rows, or cells.
        let cell = cell_span(&document, spec).ok_or_else(|| {
            Error::Archive(format!(
                "cannot locate cell for {} (table {}, row {}, col {})",
                spec.token, spec.table_index, spec.row_index, spec.col_index
            ))
        })?;
        let at = find_token(&document[cell.clone()], &spec.token)
            .map(|p| cell.start + p)
            .ok_or_else(|| {
                Error::Archive(format!(
                    "{} not found in its cell (table {}, row {}, col {})",
                    spec.token, spec.table_index, spec.row_index, spec.col_index
                ))
            })?;

        let rel_id = format!("rIdRc{}", i + 1);
        let media_name = format!("media/rc_photo{}.png", i + 1);
        let run = drawing_run(&rel_id, &format!("photo {}", i + 1), doc_pr_base + i, cx, cy);
        replace_enclosing_run(&mut document, at, &run).map_err(|reason| {
            Error::Archive(format!("cannot substitute {}: {reason}", spec.token))
        })?;

        rel_fragments.push_str(&format!(
            "<Relationship Id=\"{rel_id}\" Type=\"{IMAGE_REL_TYPE}\" Target=\"{media_name}\"/>"
        ));
        media.push(Entry::new(
            format!("word/{media_name}"),
            photo.image_bytes.clone(),
        ));
        log::debug!(
            "bound {} -> {} ({cx}x{cy} EMU, {} bytes)",
            spec.token,
            media_name,
            photo.image_bytes.len()
        );
    }

    rels = insert_before_close(&rels, "</Relationships>", &rel_fragments)?;

    let mut replacements = vec![
        Entry::new(DOCUMENT_PART, document.into_bytes()),
        Entry::new(RELS_PART, rels.into_bytes()),
    ];

    if !media.is_empty() {
        let content_types = part_text(package, CONTENT_TYPES_PART)?;
        if !content_types.contains("Extension=\"png\"") {
            let patched = insert_before_close(
                &content_types,
                "</Types>",
                "<Default Extension=\"png\" ContentType=\"image/png\"/>",
            )?;
            replacements.push(Entry::new(CONTENT_TYPES_PART, patched.into_bytes()));
        }
    }

    archive::rewrite_package(package, &replacements, &media)
}
