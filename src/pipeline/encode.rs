//! Local image loading: file on disk → base64 data URI.
//!
//! The platform never sees the author's filesystem, so a `file:` image has to
//! travel inside the HTML fragment itself. This is the converter's only I/O:
//! the file is opened, read to the end and closed before rendering continues,
//! and any failure aborts the conversion.

use crate::error::Md2ZhihuError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read `path` and return it as a `data:` URI.
///
/// The path is used exactly as given; relative paths resolve against the
/// process working directory. `limit` caps the file size in bytes.
pub fn encode_local_image(path: &Path, limit: Option<u64>) -> Result<String, Md2ZhihuError> {
    let bytes = read_limited(path, limit)?;
    let b64 = STANDARD.encode(&bytes);
    debug!(
        "Encoded {} → {} bytes base64",
        path.display(),
        b64.len()
    );
    Ok(format!("data:{};base64,{}", mime_for(path), b64))
}

fn read_limited(path: &Path, limit: Option<u64>) -> Result<Vec<u8>, Md2ZhihuError> {
    let io_err = |e: std::io::Error| Md2ZhihuError::from_image_io(path.to_path_buf(), e);

    let mut file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    if let Some(limit) = limit {
        if size > limit {
            return Err(Md2ZhihuError::LocalImageTooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
    }

    let mut buf = Vec::with_capacity(size as usize);
    file.read_to_end(&mut buf).map_err(io_err)?;
    Ok(buf)
}

/// MIME type from the file extension; unknown extensions are sent as PNG.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn encode_small_file() {
        let mut f = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        f.write_all(b"\x89PNG fake").unwrap();

        let uri = encode_local_image(f.path(), None).expect("encode should succeed");
        let b64 = uri
            .strip_prefix("data:image/png;base64,")
            .expect("png data uri");
        assert_eq!(STANDARD.decode(b64).unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = encode_local_image(Path::new("/definitely/not/here.png"), None).unwrap_err();
        assert!(matches!(err, Md2ZhihuError::LocalImageNotFound { .. }));
    }

    #[test]
    fn limit_is_enforced() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0u8; 64]).unwrap();

        let err = encode_local_image(f.path(), Some(10)).unwrap_err();
        assert!(matches!(
            err,
            Md2ZhihuError::LocalImageTooLarge {
                size: 64,
                limit: 10,
                ..
            }
        ));
        assert!(encode_local_image(f.path(), Some(64)).is_ok());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for(Path::new("a")), "image/png");
    }
}
