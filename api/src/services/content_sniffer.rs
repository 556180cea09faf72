//! Category-conditioned content sniffing for uploaded files.
//!
//! Acceptance requires both an allowed extension for the claimed category and
//! the matching magic-byte signature at the start of the file. The sniffer is
//! a pure function over the header bytes; the caller is responsible for
//! deleting staged data when a rejection comes back.

use db::models::submission::Category;
use thiserror::Error;

/// Number of leading bytes the sniffer needs to see (the PNG signature is the
/// longest at 8 bytes).
pub const HEADER_LEN: usize = 8;

// ZIP local-file signature, shared by .sb3 and .mp containers.
const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SniffRejection {
    #[error("Uploaded file is empty")]
    EmptyFile,
    #[error("Unsupported file type for the given category")]
    UnsupportedFileType,
}

/// Decides whether a file with the given original extension and leading bytes
/// is acceptable for `category`.
///
/// The extension comparison is case-insensitive and expects a leading dot
/// (e.g. `".sb3"`); an empty string means the original name had no extension.
/// Zero-length input is rejected before any other check. The rejection
/// message is identical whichever of the extension or magic-byte checks
/// failed.
pub fn sniff(category: &Category, extension: &str, header: &[u8]) -> Result<(), SniffRejection> {
    if header.is_empty() {
        return Err(SniffRejection::EmptyFile);
    }

    let ext = extension.to_ascii_lowercase();
    let accepted = match category {
        Category::Programming => {
            matches!(ext.as_str(), ".sb3" | ".mp") && header.starts_with(&ZIP_MAGIC)
        }
        Category::Aigc => {
            (ext == ".png" && header.starts_with(&PNG_MAGIC))
                || (matches!(ext.as_str(), ".jpg" | ".jpeg") && header.starts_with(&JPEG_MAGIC))
        }
    };

    if accepted {
        Ok(())
    } else {
        Err(SniffRejection::UnsupportedFileType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const ZIP_HEADER: [u8; 8] = [0x50, 0x4B, 0x03, 0x04, 0x00, 0x00, 0x00, 0x00];
    const JPEG_HEADER: [u8; 8] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

    #[test]
    fn programming_accepts_zip_signed_sb3_and_mp() {
        assert!(sniff(&Category::Programming, ".sb3", &ZIP_HEADER).is_ok());
        assert!(sniff(&Category::Programming, ".mp", &ZIP_HEADER).is_ok());
    }

    #[test]
    fn programming_extension_is_case_insensitive() {
        assert!(sniff(&Category::Programming, ".SB3", &ZIP_HEADER).is_ok());
        assert!(sniff(&Category::Programming, ".Mp", &ZIP_HEADER).is_ok());
    }

    #[test]
    fn programming_rejects_wrong_extension_and_wrong_magic_with_same_reason() {
        let bad_ext = sniff(&Category::Programming, ".zip", &ZIP_HEADER).unwrap_err();
        let bad_magic = sniff(&Category::Programming, ".sb3", &PNG_HEADER).unwrap_err();
        assert_eq!(bad_ext, SniffRejection::UnsupportedFileType);
        assert_eq!(bad_ext, bad_magic);
        assert_eq!(
            bad_magic.to_string(),
            "Unsupported file type for the given category"
        );
    }

    #[test]
    fn aigc_accepts_png_and_jpeg_pairs() {
        assert!(sniff(&Category::Aigc, ".png", &PNG_HEADER).is_ok());
        assert!(sniff(&Category::Aigc, ".jpg", &JPEG_HEADER).is_ok());
        assert!(sniff(&Category::Aigc, ".jpeg", &JPEG_HEADER).is_ok());
        assert!(sniff(&Category::Aigc, ".PNG", &PNG_HEADER).is_ok());
    }

    #[test]
    fn aigc_rejects_mismatched_extension_and_signature() {
        // Right signature, wrong extension for it.
        assert!(sniff(&Category::Aigc, ".png", &JPEG_HEADER).is_err());
        assert!(sniff(&Category::Aigc, ".jpg", &PNG_HEADER).is_err());
        // Extension outside the table entirely.
        assert!(sniff(&Category::Aigc, ".gif", &PNG_HEADER).is_err());
        assert!(sniff(&Category::Aigc, ".sb3", &ZIP_HEADER).is_err());
    }

    #[test]
    fn aigc_rejects_truncated_png_header() {
        assert!(sniff(&Category::Aigc, ".png", &PNG_HEADER[..4]).is_err());
    }

    #[test]
    fn empty_input_is_rejected_before_extension_checks() {
        for category in [Category::Programming, Category::Aigc] {
            let rejection = sniff(&category, ".sb3", &[]).unwrap_err();
            assert_eq!(rejection, SniffRejection::EmptyFile);
            assert_eq!(rejection.to_string(), "Uploaded file is empty");
        }
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(sniff(&Category::Programming, "", &ZIP_HEADER).is_err());
        assert!(sniff(&Category::Aigc, "", &PNG_HEADER).is_err());
    }
}
