//! Image MIME type detection for uploads
//!
//! Clients often send `application/octet-stream` or nothing at all, so the
//! magic bytes are trusted first, then the hinted type, then the file name.

const JPEG: &str = "image/jpeg";
const PNG: &str = "image/png";
const WEBP: &str = "image/webp";

/// Fewer bytes than this are never sniffed
const MIN_SNIFF_BYTES: usize = 12;

/// Best guess at the image MIME type; falls back to JPEG
pub fn sniff_mime(bytes: &[u8], hinted: Option<&str>, file_name: Option<&str>) -> String {
    if bytes.len() >= MIN_SNIFF_BYTES {
        let detected = infer::get(bytes).filter(|kind| kind.matcher_type() == infer::MatcherType::Image);
        if let Some(kind) = detected {
            return kind.mime_type().to_string();
        }
    }

    let hinted = hinted.unwrap_or_default().trim().to_lowercase();
    if hinted.starts_with("image/") {
        return hinted;
    }

    let name = file_name.unwrap_or_default().to_lowercase();
    if name.ends_with(".png") {
        PNG.to_string()
    } else if name.ends_with(".webp") {
        WEBP.to_string()
    } else {
        JPEG.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8]) -> Vec<u8> {
        let mut bytes = prefix.to_vec();
        bytes.resize(16, 0);
        bytes
    }

    #[test]
    fn test_magic_bytes_win_over_hint() {
        let png = padded(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(sniff_mime(&png, Some("image/jpeg"), Some("x.jpg")), "image/png");

        let jpeg = padded(&[0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(sniff_mime(&jpeg, None, None), "image/jpeg");

        let mut webp = b"RIFF\0\0\0\0WEBP".to_vec();
        webp.resize(16, 0);
        assert_eq!(sniff_mime(&webp, Some("application/octet-stream"), None), "image/webp");
    }

    #[test]
    fn test_other_image_formats_detected() {
        let gif = padded(b"GIF89a");
        assert_eq!(sniff_mime(&gif, Some("application/octet-stream"), None), "image/gif");
    }

    #[test]
    fn test_hint_used_when_magic_unknown() {
        let bytes = padded(b"????");
        assert_eq!(sniff_mime(&bytes, Some(" Image/AVIF "), Some("a.png")), "image/avif");
    }

    #[test]
    fn test_extension_fallback() {
        let bytes = padded(b"????");
        assert_eq!(sniff_mime(&bytes, Some("application/octet-stream"), Some("Poster.PNG")), "image/png");
        assert_eq!(sniff_mime(&bytes, None, Some("a.webp")), "image/webp");
        assert_eq!(sniff_mime(&bytes, None, Some("a.jpeg")), "image/jpeg");
    }

    #[test]
    fn test_short_input_defaults_to_jpeg() {
        assert_eq!(sniff_mime(&[0x89, 0x50], None, None), "image/jpeg");
        assert_eq!(sniff_mime(&[], Some("text/plain"), Some("notes.txt")), "image/jpeg");
    }
}
