mod error;
mod gallery;
mod ports;
mod service;
mod tracker;
mod use_cases;

pub use error::ApplicationError;
pub use gallery::{GallerySnapshot, GalleryView, Notification, NotificationKind};
pub use ports::{Clock, ImageHost, ProgressSink, SessionStore, UploadFile, UploadSource};
pub use service::{ApplicationService, PENDING_UPLOADS_KEY, USER_KEY};
pub use tracker::UploadTracker;
pub use use_cases::{
    CurrentSessionQuery, DeleteImageCommand, EndSessionCommand, LoginCommand, LogoutCommand,
    PrepareUploadCommand, RefreshGalleryCommand, UploadImageCommand,
};
