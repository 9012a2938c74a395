use crate::review::Review;
use crate::storage::{ReviewStore, StorageResult};
use std::path::{Path, PathBuf};

/// CSV-backed checkpoint store
///
/// One row per review, identifier plus payload columns. Snapshots are
/// written to a sibling temp file and renamed into place, so a crash
/// mid-write never clobbers the previous checkpoint.
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ReviewStore for CsvStore {
    fn save(&mut self, reviews: &[Review]) -> StorageResult<()> {
        let tmp = self.tmp_path();
        let mut writer = csv::Writer::from_path(&tmp)?;
        for review in reviews {
            writer.serialize(review)?;
        }
        writer.flush()?;
        drop(writer);
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> StorageResult<Option<Vec<Review>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut reviews = Vec::new();
        for row in reader.deserialize() {
            let review: Review = row?;
            reviews.push(review);
        }
        Ok(Some(reviews))
    }
}
