use crate::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_X: i64 = 50;
const TOP_Y: i64 = 790;
const BOTTOM_Y: i64 = 60;
const LEADING: i64 = 18;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 11;

/// Writes `lines` as an A4 document, starting a new page whenever the
/// vertical space is exhausted. The first line is the title.
pub fn write_pdf(path: &Path, lines: &[String]) -> Result<(), RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let lines_per_page = usize::try_from((TOP_Y - BOTTOM_Y) / LEADING).unwrap_or(1).max(1);
    let mut kids: Vec<Object> = Vec::new();
    let mut first_line = true;
    for chunk in lines.chunks(lines_per_page) {
        let mut operations = Vec::new();
        let mut y = TOP_Y;
        for line in chunk {
            let size = if first_line { TITLE_SIZE } else { BODY_SIZE };
            first_line = false;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
            operations.push(Operation::new("Td", vec![MARGIN_X.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(encode_text(line))]));
            operations.push(Operation::new("ET", vec![]));
            y -= LEADING;
        }
        let content = Content { operations };
        let encoded = content.encode().map_err(pdf_error)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).map_err(|err| RenderError::Pdf {
        message: err.to_string(),
    })?;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path).map_err(pdf_error)?;
    Ok(())
}

/// Maps text to the single-byte WinAnsi codes the font dictionary declares.
/// Latin-1 covers the Spanish diacritics; anything outside it becomes `?`.
fn encode_text(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn pdf_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf {
        message: err.to_string(),
    }
}
