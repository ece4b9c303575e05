use std::path::{Path, PathBuf};

use anyhow::Context;
use image::DynamicImage;
use redb::{Database, ReadableTable, TableDefinition};

use crate::dataset::{Dataset, StoredSample, encode_jpeg, missing};
use crate::foundation::error::{SynthError, SynthResult};

pub const DB_FILE: &str = "data.redb";
pub const NUM_SAMPLES_KEY: &str = "num-samples";

const SAMPLES: TableDefinition<&str, &[u8]> = TableDefinition::new("samples");

/// Pending writes committed together once this many are buffered.
const COMMIT_BATCH: usize = 512;

pub fn image_key(name: &str) -> String {
    format!("image-{name}")
}

pub fn label_key(name: &str) -> String {
    format!("label-{name}")
}

pub fn size_key(name: &str) -> String {
    format!("size-{name}")
}

fn db_err(e: impl Into<redb::Error>) -> SynthError {
    SynthError::from(e.into())
}

/// All samples in one embedded key-value store.
///
/// Keys are `image-{name}` (JPEG bytes), `label-{name}` (UTF-8), `size-{name}` (`"{w},{h}"`) and
/// `num-samples` (decimal).
pub struct KvDataset {
    path: PathBuf,
    db: Database,
    pending: Vec<(String, Vec<u8>)>,
}

impl std::fmt::Debug for KvDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvDataset")
            .field("path", &self.path)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl KvDataset {
    pub fn open(dir: &Path) -> SynthResult<Self> {
        std::fs::create_dir_all(dir).with_context(|| format!("create '{}'", dir.display()))?;
        let path = dir.join(DB_FILE);
        let db = Database::create(&path).map_err(db_err)?;
        let txn = db.begin_write().map_err(db_err)?;
        txn.open_table(SAMPLES).map_err(db_err)?;
        txn.commit().map_err(db_err)?;
        Ok(Self {
            path,
            db,
            pending: Vec::new(),
        })
    }

    fn put(&mut self, key: String, value: Vec<u8>) -> SynthResult<()> {
        self.pending.push((key, value));
        if self.pending.len() >= COMMIT_BATCH {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> SynthResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = txn.open_table(SAMPLES).map_err(db_err)?;
            for (k, v) in &self.pending {
                table.insert(k.as_str(), v.as_slice()).map_err(db_err)?;
            }
        }
        txn.commit().map_err(db_err)?;
        self.pending.clear();
        Ok(())
    }

    fn get(&mut self, key: &str) -> SynthResult<Option<Vec<u8>>> {
        self.flush()?;
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(SAMPLES).map_err(db_err)?;
        let value = table.get(key).map_err(db_err)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn get_str(&mut self, key: &str) -> SynthResult<Option<String>> {
        self.get(key)?
            .map(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| SynthError::dataset(format!("value of '{key}' is not UTF-8: {e}")))
            })
            .transpose()
    }
}

impl Dataset for KvDataset {
    fn write(&mut self, name: &str, image: &DynamicImage, label: &str) -> SynthResult<()> {
        let bytes = encode_jpeg(image)?;
        self.put(image_key(name), bytes)?;
        self.put(label_key(name), label.as_bytes().to_vec())?;
        let size = format!("{},{}", image.width(), image.height());
        self.put(size_key(name), size.into_bytes())
    }

    fn read(&mut self, name: &str) -> SynthResult<StoredSample> {
        let bytes = self.get(&image_key(name))?.ok_or_else(|| missing(name))?;
        let image = image::load_from_memory(&bytes)
            .with_context(|| format!("decode stored image '{name}'"))?;
        let label = self.get_str(&label_key(name))?.ok_or_else(|| missing(name))?;
        let size = self.read_size(name)?;
        Ok(StoredSample { image, label, size })
    }

    fn read_size(&mut self, name: &str) -> SynthResult<(u32, u32)> {
        let raw = self.get_str(&size_key(name))?.ok_or_else(|| missing(name))?;
        let parsed = raw
            .split_once(',')
            .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)));
        parsed.ok_or_else(|| SynthError::dataset(format!("malformed size '{raw}' for '{name}'")))
    }

    fn read_count(&mut self) -> SynthResult<usize> {
        match self.get_str(NUM_SAMPLES_KEY)? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| SynthError::dataset(format!("malformed num-samples '{raw}': {e}"))),
        }
    }

    fn write_count(&mut self, count: usize) -> SynthResult<()> {
        self.put(NUM_SAMPLES_KEY.to_string(), count.to_string().into_bytes())
    }

    fn close(&mut self) -> SynthResult<()> {
        self.flush()
    }
}

impl Drop for KvDataset {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(path = %self.path.display(), "flush key-value dataset failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/kv.rs"]
mod tests;
