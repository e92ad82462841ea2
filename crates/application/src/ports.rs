use std::sync::Arc;

use my_space_domain::{ImageId, ImageRecord, UploadProgress};

use crate::ApplicationError;

pub type ProgressSink = Arc<dyn Fn(UploadProgress) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub trait ImageHost {
    fn upload(
        &self,
        file: &UploadFile,
        progress: ProgressSink,
    ) -> Result<ImageRecord, ApplicationError>;

    fn list(&self) -> Result<Vec<ImageRecord>, ApplicationError>;

    fn delete(&self, image_id: &ImageId) -> Result<(), ApplicationError>;
}

pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError>;

    fn remove(&self, key: &str) -> Result<(), ApplicationError>;

    fn clear(&self) -> Result<(), ApplicationError>;
}

pub trait UploadSource {
    fn collect_images(&self, path: &str) -> Result<Vec<UploadFile>, ApplicationError>;
}

pub trait Clock {
    fn now_unix_seconds(&self) -> i64;

    fn now_unix_millis(&self) -> i64;
}
