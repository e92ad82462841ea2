use crate::ImageRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let ratio = self.sent.min(self.total) as f64 / self.total as f64;
        (ratio * 100.0).floor() as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading(UploadProgress),
    Succeeded(ImageRecord),
    Failed(String),
}

impl UploadState {
    pub fn percent(&self) -> u8 {
        match self {
            Self::Idle | Self::Failed(_) => 0,
            Self::Uploading(progress) => progress.percent(),
            Self::Succeeded(_) => 100,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}
