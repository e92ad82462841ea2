use my_space_domain::{ImageId, ImageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySnapshot {
    images: Vec<ImageRecord>,
    selected: Option<ImageId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryView {
    images: Vec<ImageRecord>,
    selected: Option<ImageId>,
    notification: Option<Notification>,
}

impl GalleryView {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    /// Swaps in a fresh list, keeping the selection if that image is still present.
    pub fn replace_images(&mut self, images: Vec<ImageRecord>) {
        self.images = images;
        if let Some(selected) = &self.selected {
            if self.position(selected).is_none() {
                self.selected = None;
            }
        }
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn find(&self, image_id: &ImageId) -> Option<&ImageRecord> {
        self.images.iter().find(|image| &image.id == image_id)
    }

    pub fn select(&mut self, image_id: &ImageId) -> Option<&ImageRecord> {
        let index = self.position(image_id)?;
        self.selected = Some(image_id.clone());
        self.images.get(index)
    }

    pub fn selected(&self) -> Option<&ImageRecord> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn select_next(&mut self) -> Option<&ImageRecord> {
        self.step(1)
    }

    pub fn select_previous(&mut self) -> Option<&ImageRecord> {
        self.step(-1)
    }

    pub fn remove(&mut self, image_id: &ImageId) -> Option<ImageRecord> {
        let index = self.position(image_id)?;
        if self.selected.as_ref() == Some(image_id) {
            self.selected = None;
        }
        Some(self.images.remove(index))
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            images: self.images.clone(),
            selected: self.selected.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: GallerySnapshot) {
        self.images = snapshot.images;
        self.selected = snapshot.selected;
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
        });
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    fn position(&self, image_id: &ImageId) -> Option<usize> {
        self.images.iter().position(|image| &image.id == image_id)
    }

    fn step(&mut self, offset: isize) -> Option<&ImageRecord> {
        let count = self.images.len() as isize;
        if count == 0 {
            return None;
        }
        let current = self.selected.as_ref().and_then(|id| self.position(id))? as isize;
        let next = (current + offset).rem_euclid(count) as usize;
        self.selected = Some(self.images[next].id.clone());
        self.images.get(next)
    }
}
