//! In-process PDF composition.
//!
//! Builds the PDF documents for the text-to-document and image-to-document
//! conversions with `pdf-writer`: paginated Helvetica text pages, or a
//! single page sized to an embedded JPEG.

use std::io::Cursor;

use image::DynamicImage;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;
const LEADING: f32 = 14.0;
const MAX_LINE_CHARS: usize = 90;

/// Compose a paginated A4 PDF from plain text.
///
/// Lines longer than the page width are hard-wrapped; an empty input
/// still yields a single blank page.
pub fn text_to_pdf(text: &str) -> Vec<u8> {
    let lines = wrap_lines(text);
    let lines_per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(lines_per_page).collect()
    };

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let font_id = alloc.bump();
    let page_ids: Vec<Ref> = chunks.iter().map(|_| alloc.bump()).collect();
    let content_ids: Vec<Ref> = chunks.iter().map(|_| alloc.bump()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    for ((page_id, content_id), chunk) in page_ids.iter().zip(&content_ids).zip(&chunks) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(Name(b"F1"), font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(Name(b"F1"), FONT_SIZE);
        content.next_line(MARGIN, PAGE_HEIGHT - MARGIN);
        for line in chunk.iter() {
            content.show(Str(line.as_bytes()));
            content.next_line(0.0, -LEADING);
        }
        content.end_text();
        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}

/// Compose a single-page PDF around an image, page sized to the image
/// dimensions in points.
///
/// The image is re-encoded to RGB JPEG so the embedded XObject is always
/// DeviceRGB regardless of the source color model.
pub fn image_to_pdf(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let rgb = img.to_rgb8();

    let mut jpeg = Vec::new();
    let mut cursor = Cursor::new(&mut jpeg);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, 90);
    image::ImageEncoder::write_image(
        encoder,
        rgb.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| AppError::conversion(format!("Failed to encode image for PDF: {e}")))?;

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let page_id = alloc.bump();
    let image_id = alloc.bump();
    let content_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut image = pdf.image_xobject(image_id, &jpeg);
    image.filter(Filter::DctDecode);
    image.width(width as i32);
    image.height(height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let w = width as f32;
    let h = height as f32;

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, w, h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(Name(b"Im1"), image_id);
    page.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([w, 0.0, 0.0, h, 0.0, 0.0]);
    content.x_object(Name(b"Im1"));
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    Ok(pdf.finish())
}

/// Split text into display lines, hard-wrapping overlong ones.
fn wrap_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut count = 0usize;
        for ch in raw.chars() {
            current.push(ch);
            count += 1;
            if count >= MAX_LINE_CHARS {
                lines.push(std::mem::take(&mut current));
                count = 0;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
