//! Content sniffing for conversion inputs and outputs.
//!
//! Extensions drive dispatch; sniffing is only used to report what a file
//! actually contains and to sanity-check converter output.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use crate::format::Format;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// ZIP magic of an archive with no entries: PK\x05\x06
const EMPTY_ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const BMP_MAGIC: &[u8] = b"BM";
const TIFF_LE_MAGIC: &[u8] = b"II*\0";
const TIFF_BE_MAGIC: &[u8] = b"MM\0*";

/// Content type for DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for PPTX presentation part.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Detect the format of a file from its content.
///
/// # Example
///
/// ```no_run
/// use fileshift::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("upload.bin")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), fileshift::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<Format> {
    let mut data = Vec::new();
    File::open(path.as_ref())?.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect the format from a byte slice.
///
/// Plain text is reported for anything that decodes as UTF-8 and has no
/// other signature.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<Format> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(Format::Pdf);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(Format::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(Format::Jpeg);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Ok(Format::Gif);
    }
    if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        return Ok(Format::Tiff);
    }
    if data.starts_with(BMP_MAGIC) && data.len() >= 14 {
        return Ok(Format::Bmp);
    }
    if is_zip_file(data) {
        return detect_zip_flavor(Cursor::new(data));
    }
    if !data.is_empty() && std::str::from_utf8(data).is_ok() {
        return Ok(Format::Txt);
    }
    Err(Error::InvalidData("unrecognized file signature".to_string()))
}

/// Tell OOXML packages apart from plain ZIP archives.
fn detect_zip_flavor<R: Read + Seek>(reader: R) -> Result<Format> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => return Ok(Format::Zip),
    };

    if content_types.contains(DOCX_CONTENT_TYPE) {
        Ok(Format::Docx)
    } else if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(Format::Xlsx)
    } else if content_types.contains(PPTX_CONTENT_TYPE) {
        Ok(Format::Pptx)
    } else {
        detect_by_folder_structure(&mut archive)
    }
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<Format> {
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let has_word = names.iter().any(|n| n.starts_with("word/"));
    let has_xl = names.iter().any(|n| n.starts_with("xl/"));
    let has_ppt = names.iter().any(|n| n.starts_with("ppt/"));

    match (has_word, has_xl, has_ppt) {
        (true, false, false) => Ok(Format::Docx),
        (false, true, false) => Ok(Format::Xlsx),
        (false, false, true) => Ok(Format::Pptx),
        _ => Ok(Format::Zip),
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && (data[..4] == ZIP_MAGIC || data[..4] == EMPTY_ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_detect_signatures() {
        assert_eq!(detect_format_from_bytes(b"%PDF-1.5\n").unwrap(), Format::Pdf);
        assert_eq!(detect_format_from_bytes(PNG_MAGIC).unwrap(), Format::Png);
        assert_eq!(
            detect_format_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            Format::Jpeg
        );
        assert_eq!(detect_format_from_bytes(b"GIF89a....").unwrap(), Format::Gif);
        assert_eq!(detect_format_from_bytes(b"hello\nworld").unwrap(), Format::Txt);
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0xFF, 0xFE, 0x80]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_detect_ooxml_by_content_type() {
        let ct = format!(r#"<Types><Override ContentType="{}"/></Types>"#, XLSX_CONTENT_TYPE);
        let data = zip_with(&[("[Content_Types].xml", &ct)]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), Format::Xlsx);
    }

    #[test]
    fn test_detect_by_folder_fallback() {
        let data = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            ("ppt/slides/slide1.xml", "<p:sld/>"),
        ]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), Format::Pptx);
    }

    #[test]
    fn test_detect_plain_zip() {
        let data = zip_with(&[("slide_001.png", "x")]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), Format::Zip);
    }
}
