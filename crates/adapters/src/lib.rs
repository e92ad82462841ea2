pub mod fs;
pub mod host;
pub mod memory;
pub mod migrations;
pub mod presenters;
pub mod sqlite;

pub use fs::{SystemClock, WalkdirUploadSource};
pub use host::{CloudinaryImageHost, HostConfig};
pub use memory::MemorySessionStore;
pub use presenters::{
    present_gallery_header, present_image_detail, present_image_row, present_notification,
    present_size, present_upload_state, present_user,
};
pub use sqlite::SqliteSessionStore;
