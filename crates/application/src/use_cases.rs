use my_space_domain::ImageId;

use crate::UploadFile;

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LogoutCommand;

#[derive(Debug, Clone, Default)]
pub struct EndSessionCommand;

#[derive(Debug, Clone, Default)]
pub struct CurrentSessionQuery;

#[derive(Debug, Clone)]
pub struct PrepareUploadCommand {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct UploadImageCommand {
    pub file: UploadFile,
}

#[derive(Debug, Clone, Default)]
pub struct RefreshGalleryCommand;

#[derive(Debug, Clone)]
pub struct DeleteImageCommand {
    pub image_id: ImageId,
}
