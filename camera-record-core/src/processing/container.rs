//! Container signature sniffing.
//!
//! The host owns muxing; this only checks the leading bytes of an assembled
//! artifact so a mismatch with the declared MIME type can be reported.

/// EBML header magic shared by WebM and Matroska.
pub const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// JPEG start-of-image marker, the first bytes of every MJPEG frame.
pub const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    WebM,
    Mp4,
    MotionJpeg,
    Unknown,
}

impl ContainerKind {
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::WebM => Some("video/webm"),
            Self::Mp4 => Some("video/mp4"),
            Self::MotionJpeg => Some("video/x-motion-jpeg"),
            Self::Unknown => None,
        }
    }
}

/// Identify the container from its first bytes.
///
/// Layout checked:
/// ```text
/// WebM/Matroska  [0-3]  1A 45 DF A3
/// MP4            [4-7]  "ftyp"
/// MJPEG          [0-2]  FF D8 FF
/// ```
pub fn detect(data: &[u8]) -> ContainerKind {
    if data.starts_with(&EBML_MAGIC) {
        ContainerKind::WebM
    } else if data.len() >= 8 && &data[4..8] == b"ftyp" {
        ContainerKind::Mp4
    } else if data.starts_with(&JPEG_SOI) {
        ContainerKind::MotionJpeg
    } else {
        ContainerKind::Unknown
    }
}

/// Whether `data` is compatible with the declared MIME type.
///
/// Empty data and unrecognized containers are accepted; only a positive
/// detection of a different container is a mismatch.
pub fn matches_mime(data: &[u8], mime_type: &str) -> bool {
    let base = mime_type.split(';').next().unwrap_or("").trim();
    match detect(data).mime_type() {
        Some(detected) => detected.eq_ignore_ascii_case(base),
        None => true,
    }
}
