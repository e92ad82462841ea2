use std::io::{Cursor, Read};

use my_space_application::ProgressSink;
use my_space_domain::UploadProgress;

pub struct ProgressReader {
    inner: Cursor<Vec<u8>>,
    total: u64,
    sink: ProgressSink,
}

impl ProgressReader {
    pub fn new(bytes: Vec<u8>, sink: ProgressSink) -> Self {
        Self {
            total: bytes.len() as u64,
            inner: Cursor::new(bytes),
            sink,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read > 0 {
            (self.sink)(UploadProgress {
                sent: self.inner.position(),
                total: self.total,
            });
        }
        Ok(read)
    }
}
