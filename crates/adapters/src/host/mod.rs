mod progress;
mod signature;
mod wire;

use std::time::Duration;

use my_space_application::{ApplicationError, Clock, ImageHost, ProgressSink, UploadFile};
use my_space_domain::{ImageId, ImageRecord};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, warn};

pub use progress::ProgressReader;
pub use signature::{destroy_payload, sign_destroy};
pub use wire::{ListedResource, ListingResponse, UploadResponse};

#[derive(Clone)]
pub struct HostConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_key: String,
    pub api_secret: String,
    pub gallery_tag: String,
    pub api_base_url: String,
    pub resource_base_url: String,
    pub timeout: Duration,
}

impl HostConfig {
    pub fn upload_url(&self) -> String {
        format!("{}/image/upload", self.api_root())
    }

    pub fn destroy_url(&self) -> String {
        format!("{}/image/destroy", self.api_root())
    }

    /// `cache_buster` changes on every call so the CDN cannot serve a stale list.
    pub fn listing_url(&self, cache_buster: i64) -> String {
        format!(
            "{}/image/list/{}.json?t={cache_buster}",
            self.resource_root(),
            self.gallery_tag
        )
    }

    pub fn resource_root(&self) -> String {
        format!(
            "{}/{}",
            self.resource_base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    fn api_root(&self) -> String {
        format!(
            "{}/v1_1/{}",
            self.api_base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

impl std::fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConfig")
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &self.upload_preset)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("gallery_tag", &self.gallery_tag)
            .field("api_base_url", &self.api_base_url)
            .field("resource_base_url", &self.resource_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct CloudinaryImageHost {
    config: HostConfig,
    client: Client,
    clock: Box<dyn Clock>,
}

impl CloudinaryImageHost {
    pub fn new(config: HostConfig, clock: Box<dyn Clock>) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        Ok(Self::with_client(config, client, clock))
    }

    pub fn with_client(config: HostConfig, client: Client, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            client,
            clock,
        }
    }
}

impl ImageHost for CloudinaryImageHost {
    fn upload(
        &self,
        file: &UploadFile,
        progress: ProgressSink,
    ) -> Result<ImageRecord, ApplicationError> {
        let body = ProgressReader::new(file.bytes.clone(), progress);
        let length = body.total();
        let part = Part::reader_with_length(body, length)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|error| ApplicationError::Upload(error.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("tags", self.config.gallery_tag.clone());

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .map_err(|error| ApplicationError::Upload(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::Upload(format!(
                "host responded with {status}"
            )));
        }

        let body: UploadResponse = response
            .json()
            .map_err(|error| ApplicationError::Upload(error.to_string()))?;
        body.into_record()
            .map_err(|error| ApplicationError::Upload(error.to_string()))
    }

    fn list(&self) -> Result<Vec<ImageRecord>, ApplicationError> {
        let url = self.config.listing_url(self.clock.now_unix_millis());
        debug!(%url, "fetching image list");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|error| ApplicationError::ListingFetch(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(
                tag = %self.config.gallery_tag,
                "resource list not found; enable resource listing and tag uploads"
            );
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ApplicationError::ListingFetch(format!(
                "host responded with {status}"
            )));
        }

        let listing: ListingResponse = response
            .json()
            .map_err(|error| ApplicationError::ListingFetch(error.to_string()))?;
        let root = self.config.resource_root();
        Ok(listing
            .resources
            .into_iter()
            .filter_map(|resource| resource.into_record(&root))
            .collect())
    }

    fn delete(&self, image_id: &ImageId) -> Result<(), ApplicationError> {
        let timestamp = self.clock.now_unix_seconds();
        let signature = sign_destroy(image_id.as_str(), timestamp, &self.config.api_secret);
        let form = Form::new()
            .text("public_id", image_id.to_string())
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let response = self
            .client
            .post(self.config.destroy_url())
            .multipart(form)
            .send()
            .map_err(|error| ApplicationError::Delete(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::Delete(format!(
                "host responded with {status}"
            )));
        }
        Ok(())
    }
}
