/// Sniff the MIME type of a generated image from its magic bytes.
///
/// Providers only hand back PNG, JPEG, WebP or GIF; anything else is
/// labelled PNG, which is what OpenAI returns by default.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized portrait image format ({} bytes), labelling as image/png",
                bytes.len()
            );
            "image/png"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_formats() {
        assert_eq!(detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D]), "image/png");
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_unknown_or_empty_is_png() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02]), "image/png");
        assert_eq!(detect_image_mime(&[]), "image/png");
    }
}
