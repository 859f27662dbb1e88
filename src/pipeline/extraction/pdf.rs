use lopdf::content::Content;
use lopdf::{Document, ObjectId};

use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// PDF text extractor using lopdf.
/// Reads the embedded text layer only; scanned pages come back blank.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes).map_err(parse_error)?;

        doc.get_pages()
            .into_iter()
            .map(|(page_number, page_id)| -> Result<PageExtraction, ExtractionError> {
                check_font_selection(&doc, page_number, page_id)?;
                let text = doc.extract_text(&[page_number]).map_err(parse_error)?;
                Ok(PageExtraction {
                    page_number: page_number as usize,
                    text,
                })
            })
            .collect()
    }
}

/// Text-showing operators are only valid once `Tf` has set a font.
fn check_font_selection(
    doc: &Document,
    page_number: u32,
    page_id: ObjectId,
) -> Result<(), ExtractionError> {
    let data = doc.get_page_content(page_id).map_err(parse_error)?;
    let content = Content::decode(&data).map_err(parse_error)?;

    let mut font_selected = false;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => font_selected = true,
            "Tj" | "TJ" | "'" | "\"" if !font_selected => {
                return Err(ExtractionError::PdfParsing(format!(
                    "page {page_number} shows text before selecting a font"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_error(e: lopdf::Error) -> ExtractionError {
    ExtractionError::PdfParsing(e.to_string())
}

/// Test fixture: a PDF with one text line per page, built with lopdf.
#[cfg(test)]
pub(crate) fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
    let contents: Vec<String> = pages
        .iter()
        .map(|text| format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"))
        .collect();
    build_pdf(&contents, true)
}

/// Test fixture: one page drawing text without selecting or declaring a font.
#[cfg(test)]
pub(crate) fn make_fontless_pdf(text: &str) -> Vec<u8> {
    build_pdf(&[format!("BT 100 700 Td ({text}) Tj ET")], false)
}

#[cfg(test)]
fn build_pdf(contents: &[String], with_font: bool) -> Vec<u8> {
    use lopdf::{dictionary, Dictionary, Object, Stream};

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let resources_id = if with_font {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        })
    } else {
        doc.add_object(Dictionary::new())
    };

    let kids: Vec<Object> = contents
        .iter()
        .map(|content| {
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.clone().into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
