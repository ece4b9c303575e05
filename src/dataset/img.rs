use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::DynamicImage;

use crate::dataset::{Dataset, StoredSample, encode_jpeg, missing};
use crate::foundation::error::{SynthError, SynthResult};

pub const LABEL_FILE: &str = "labels.json";
pub const IMAGE_DIR: &str = "images";

/// Contents of `labels.json`.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LabelFile {
    #[serde(rename = "num-samples", default)]
    pub num_samples: usize,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub sizes: BTreeMap<String, (u32, u32)>,
}

/// JPEG files under `images/` and one JSON sidecar holding labels and sizes.
#[derive(Debug)]
pub struct ImgDataset {
    img_dir: PathBuf,
    label_path: PathBuf,
    data: LabelFile,
    dirty: bool,
}

impl ImgDataset {
    pub fn open(dir: &Path) -> SynthResult<Self> {
        let img_dir = dir.join(IMAGE_DIR);
        std::fs::create_dir_all(&img_dir)
            .with_context(|| format!("create '{}'", img_dir.display()))?;
        let label_path = dir.join(LABEL_FILE);
        let data = if label_path.is_file() {
            let text = std::fs::read_to_string(&label_path)
                .with_context(|| format!("read '{}'", label_path.display()))?;
            serde_json::from_str(&text).map_err(|e| {
                SynthError::dataset(format!("parse '{}': {e}", label_path.display()))
            })?
        } else {
            LabelFile::default()
        };
        Ok(Self {
            img_dir,
            label_path,
            data,
            dirty: false,
        })
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.img_dir.join(format!("{name}.jpg"))
    }
}

impl Dataset for ImgDataset {
    fn write(&mut self, name: &str, image: &DynamicImage, label: &str) -> SynthResult<()> {
        let path = self.image_path(name);
        let bytes = encode_jpeg(image)?;
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        self.data.labels.insert(name.to_string(), label.to_string());
        self.data
            .sizes
            .insert(name.to_string(), (image.width(), image.height()));
        self.dirty = true;
        Ok(())
    }

    fn read(&mut self, name: &str) -> SynthResult<StoredSample> {
        let label = self.data.labels.get(name).ok_or_else(|| missing(name))?.clone();
        let size = self.read_size(name)?;
        let path = self.image_path(name);
        let image = image::open(&path).with_context(|| format!("decode '{}'", path.display()))?;
        Ok(StoredSample { image, label, size })
    }

    fn read_size(&mut self, name: &str) -> SynthResult<(u32, u32)> {
        self.data.sizes.get(name).copied().ok_or_else(|| missing(name))
    }

    fn read_count(&mut self) -> SynthResult<usize> {
        Ok(self.data.num_samples)
    }

    fn write_count(&mut self, count: usize) -> SynthResult<()> {
        self.data.num_samples = count;
        self.dirty = true;
        Ok(())
    }

    fn close(&mut self) -> SynthResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| SynthError::dataset(format!("serialize labels: {e}")))?;
        std::fs::write(&self.label_path, json)
            .with_context(|| format!("write '{}'", self.label_path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for ImgDataset {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!("flush image dataset failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/img.rs"]
mod tests;
