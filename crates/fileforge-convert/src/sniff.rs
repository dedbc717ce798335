//! Magic-byte content sniffing.
//!
//! Detects a file's true media type from its byte content rather than
//! trusting the client-supplied name. ZIP containers are introspected to
//! distinguish OOXML documents from plain archives.

use std::io::Cursor;

/// MIME type for PDF documents.
pub const PDF: &str = "application/pdf";
/// MIME type for JPEG images.
pub const JPEG: &str = "image/jpeg";
/// MIME type for PNG images.
pub const PNG: &str = "image/png";
/// MIME type for DOCX documents.
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for plain ZIP archives.
pub const ZIP: &str = "application/zip";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];
const ZIP_LOCAL_HEADER: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Detect the media type of `data` from its magic bytes.
///
/// Returns `None` when no signature matches — plain text and arbitrary
/// binaries have no reliable magic, so absence of a match is not an error.
pub fn detect(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"%PDF") {
        return Some(PDF);
    }
    if data.starts_with(&JPEG_SOI) {
        return Some(JPEG);
    }
    if data.starts_with(&PNG_SIGNATURE) {
        return Some(PNG);
    }
    if data.starts_with(&ZIP_LOCAL_HEADER) {
        return Some(detect_zip(data));
    }
    None
}

/// Introspect a ZIP container to find the specific OOXML type.
///
/// A DOCX is a ZIP whose archive listing contains `word/document.xml`,
/// the one entry every Word package must carry. Unreadable archives fall
/// back to the plain ZIP classification.
fn detect_zip(data: &[u8]) -> &'static str {
    let Ok(archive) = zip::ZipArchive::new(Cursor::new(data)) else {
        return ZIP;
    };
    // Only the archive listing is consulted; no entry is extracted.
    if archive.file_names().any(|n| n == "word/document.xml") {
        DOCX
    } else {
        ZIP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_with_entry(name: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<xml/>").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_detects_pdf() {
        assert_eq!(detect(b"%PDF-1.7 rest"), Some(PDF));
    }

    #[test]
    fn test_detects_jpeg_and_png() {
        assert_eq!(detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some(JPEG));
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(b"IHDR");
        assert_eq!(detect(&png), Some(PNG));
    }

    #[test]
    fn test_plain_text_has_no_signature() {
        assert_eq!(detect(b"hello world"), None);
        assert_eq!(detect(b""), None);
    }

    #[test]
    fn test_docx_is_zip_with_word_entries() {
        let docx = zip_with_entry("word/document.xml");
        assert_eq!(detect(&docx), Some(DOCX));

        let plain = zip_with_entry("notes.txt");
        assert_eq!(detect(&plain), Some(ZIP));

        // Other word/ entries alone do not make a Word package.
        let partial = zip_with_entry("word/styles.xml");
        assert_eq!(detect(&partial), Some(ZIP));
    }

    #[test]
    fn test_truncated_zip_falls_back_to_plain_zip() {
        assert_eq!(detect(&[b'P', b'K', 0x03, 0x04, 0x00]), Some(ZIP));
    }
}
