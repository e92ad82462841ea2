use my_space_domain::{ImageId, ImageRecord, UploadedAt};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub resources: Vec<ListedResource>,
}

#[derive(Debug, Deserialize)]
pub struct ListedResource {
    pub public_id: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub bytes: u64,
}

impl ListedResource {
    /// `None` when the host sent an entry it cannot be fetched by.
    pub fn into_record(self, resource_root: &str) -> Option<ImageRecord> {
        let id = match ImageId::new(self.public_id) {
            Ok(id) => id,
            Err(error) => {
                warn!("skipping listed resource: {error}");
                return None;
            }
        };
        let (Some(version), Some(format)) = (self.version, self.format) else {
            warn!(image = %id, "skipping listed resource without version or format");
            return None;
        };
        let url = format!("{resource_root}/image/upload/v{version}/{id}.{format}");
        Some(ImageRecord::new(id, url, parse_created_at(self.created_at)))
    }
}

impl UploadResponse {
    pub fn into_record(self) -> Result<ImageRecord, my_space_domain::DomainError> {
        let id = ImageId::new(self.public_id)?;
        Ok(
            ImageRecord::new(id, self.secure_url, parse_created_at(self.created_at))
                .with_size(self.bytes),
        )
    }
}

fn parse_created_at(raw: Option<String>) -> Option<UploadedAt> {
    let raw = raw?;
    match UploadedAt::parse(&raw) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!("ignoring upload time: {error}");
            None
        }
    }
}
