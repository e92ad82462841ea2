use serde::{Deserialize, Serialize};

use crate::{ImageId, ImageRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingSet(Vec<ImageRecord>);

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh upload at the front, dropping any older entry with the same id.
    pub fn push_front(&mut self, record: ImageRecord) {
        self.0.retain(|existing| existing.id != record.id);
        self.0.insert(0, record);
    }

    pub fn remove(&mut self, id: &ImageId) -> Option<ImageRecord> {
        let index = self.0.iter().position(|record| &record.id == id)?;
        Some(self.0.remove(index))
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.0.iter().any(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ImageRecord] {
        &self.0
    }
}

impl From<Vec<ImageRecord>> for PendingSet {
    fn from(records: Vec<ImageRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a PendingSet {
    type Item = &'a ImageRecord;
    type IntoIter = std::slice::Iter<'a, ImageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
