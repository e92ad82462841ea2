use my_space_application::{Notification, NotificationKind};
use my_space_domain::{ImageRecord, UploadState, User};

pub fn present_image_row(image: &ImageRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        image.id,
        present_uploaded_at(image),
        present_size(image.size),
        image.url
    )
}

pub fn present_image_detail(image: &ImageRecord, position: usize, count: usize) -> String {
    format!(
        "[{}/{}] {}\n  uploaded: {}\n  size: {}\n  url: {}",
        position + 1,
        count,
        image.name,
        present_uploaded_at(image),
        present_size(image.size),
        image.url
    )
}

pub fn present_gallery_header(count: usize) -> String {
    match count {
        0 => "No images yet. Upload your first image to get started".to_string(),
        1 => "1 image stored".to_string(),
        n => format!("{n} images stored"),
    }
}

pub fn present_size(bytes: u64) -> String {
    if bytes == 0 {
        return "-".to_string();
    }
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

pub fn present_upload_state(state: &UploadState) -> String {
    match state {
        UploadState::Idle => "Ready to upload".to_string(),
        UploadState::Uploading(_) => format!("Uploading... {}%", state.percent()),
        UploadState::Succeeded(record) => format!("Complete! {}", record.id),
        UploadState::Failed(_) => "Upload failed. Please try again.".to_string(),
    }
}

pub fn present_notification(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
    };
    format!("[{marker}] {}", notification.message)
}

pub fn present_user(user: &User) -> String {
    format!("{} <{}>", user.name, user.email)
}

fn present_uploaded_at(image: &ImageRecord) -> String {
    image
        .uploaded_at
        .map(|at| at.get().format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
