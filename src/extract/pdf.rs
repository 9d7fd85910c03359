// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use lopdf::Document;
use tracing::{debug, warn};

use crate::extract::ExtractError;

/// 从PDF字节流中提取文本
///
/// 优先逐页提取并以空行连接非空页面；当逐页提取一无所获时，
/// 回退到整篇提取。单页失败只告警，不中断整篇处理。
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::PdfParse(e.to_string()))?;

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    debug!("PDF共{}页", pages.len());

    let mut parts = Vec::new();
    for page in &pages {
        match doc.extract_text(&[*page]) {
            Ok(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Err(e) => {
                warn!("第{}页文本提取失败: {}", page, e);
            }
        }
    }

    if !parts.is_empty() {
        return Ok(parts.join("\n\n"));
    }

    // 逐页提取失败，回退到整篇提取
    let text = doc
        .extract_text(&pages)
        .map_err(|e| ExtractError::PdfParse(e.to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyPdf);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::PdfParse(_))));
    }

    #[test]
    fn test_single_page_pdf_extracts_text() {
        let pdf = build_pdf("Hello refscrape");
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(text.contains("Hello refscrape"));
    }

    /// Build a well-formed single-page PDF containing one text object.
    fn build_pdf(message: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(message)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize pdf");
        buf
    }
}
