/// Image formats accepted for post illustrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    Webp,
    Bmp,
}

/// Detect the image format from the file signature.
pub fn sniff(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(ImageKind::Gif)
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageKind::Png)
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageKind::Jpeg)
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageKind::Webp)
    } else if data.starts_with(b"BM") && data.len() >= 26 {
        Some(ImageKind::Bmp)
    } else {
        None
    }
}

/// Check that an upload is an image whose name matches its content.
pub fn validate_image(filename: &str, data: &[u8]) -> Result<ImageKind, &'static str> {
    let kind = sniff(data).ok_or(
        "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
    )?;

    let guessed = mime_guess::from_path(filename).first();
    match guessed {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => Ok(kind),
        _ => Err("File extension is not allowed for images."),
    }
}
