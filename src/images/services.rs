use anyhow::Context;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::storage::StorageClient;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// An image part taken from a multipart form.
pub struct ImageUpload {
    pub filename: String,
    pub body: Bytes,
}

/// Lower-cased extension of `filename` if it is an allowed image type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// True only for names of the shape [`store_image`] generates.
pub fn is_stored_image_name(name: &str) -> bool {
    lazy_static! {
        static ref STORED_NAME_RE: Regex = Regex::new(r"^[0-9a-f]{32}\.(jpg|jpeg|png|gif)$").unwrap();
    }
    STORED_NAME_RE.is_match(name)
}

pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Saves the image under a fresh server-side name and returns that name.
/// The client's file name only contributes its extension.
pub async fn store_image(storage: &dyn StorageClient, upload: ImageUpload) -> anyhow::Result<String> {
    let ext = allowed_extension(&upload.filename)
        .with_context(|| format!("disallowed image name {:?}", upload.filename))?;
    let name = format!("{}.{}", Uuid::new_v4().simple(), ext);
    storage
        .put_object(&name, upload.body)
        .await
        .with_context(|| format!("put_object {}", name))?;
    Ok(name)
}
