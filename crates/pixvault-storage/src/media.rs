//! Image type detection from leading bytes.

/// Number of leading bytes needed to recognise every supported format.
pub const SNIFF_LEN: usize = 32;

/// Detect an image MIME type from the first bytes of a blob.
pub fn sniff_image_mime(head: &[u8]) -> Option<&'static str> {
    image::guess_format(head).ok().map(|format| format.to_mime_type())
}

/// Whether a declared content type carries no real information.
pub fn is_generic_mime(mime: &str) -> bool {
    let mime = mime.trim();
    mime.is_empty() || mime.eq_ignore_ascii_case("application/octet-stream")
}
