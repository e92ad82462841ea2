use std::fs;
use std::path::Path;

use image::ImageFormat;
use my_space_application::{ApplicationError, UploadFile, UploadSource};
use my_space_domain::{detect_image_kind, ImageKind};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct WalkdirUploadSource;

impl UploadSource for WalkdirUploadSource {
    fn collect_images(&self, path: &str) -> Result<Vec<UploadFile>, ApplicationError> {
        let root = Path::new(path);
        if root.is_file() {
            let bytes = fs::read(root).map_err(|error| ApplicationError::Io(error.to_string()))?;
            let Some(mime_type) = sniff_mime_type(root, &bytes) else {
                return Err(ApplicationError::InvalidInput(format!(
                    "Please upload an image file: {path}"
                )));
            };
            return Ok(vec![upload_file(root, mime_type, bytes)]);
        }

        if !root.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "no such file or directory: {path}"
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_path = entry.path();
            if detect_image_kind(file_path) == ImageKind::Unsupported {
                continue;
            }

            let bytes =
                fs::read(file_path).map_err(|error| ApplicationError::Io(error.to_string()))?;
            match sniff_mime_type(file_path, &bytes) {
                Some(mime_type) => files.push(upload_file(file_path, mime_type, bytes)),
                None => warn!(path = %file_path.display(), "skipping file that is not an image"),
            }
        }

        Ok(files)
    }
}

fn upload_file(path: &Path, mime_type: &str, bytes: Vec<u8>) -> UploadFile {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    UploadFile {
        file_name,
        mime_type: mime_type.to_string(),
        bytes,
    }
}

fn sniff_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return mime_for_format(format);
    }
    if detect_image_kind(path) == ImageKind::Svg && String::from_utf8_lossy(bytes).contains("<svg")
    {
        return Some("image/svg+xml");
    }
    None
}

fn mime_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::Ico => Some("image/x-icon"),
        ImageFormat::Avif => Some("image/avif"),
        _ => None,
    }
}
