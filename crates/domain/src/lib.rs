mod error;
mod image;
mod pending;
mod reconcile;
mod route;
mod session;
mod upload;

pub use error::DomainError;
pub use image::{detect_image_kind, ImageId, ImageKind, ImageRecord, UploadedAt};
pub use pending::PendingSet;
pub use reconcile::{reconcile, Reconciliation};
pub use route::{post_login_target, resolve, Navigation, Route};
pub use session::{Credentials, Session, User};
pub use upload::{UploadProgress, UploadState};
