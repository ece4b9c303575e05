//! Storage for generated samples.
//!
//! Two layouts are supported: JPEG files plus a JSON label sidecar ([`ImgDataset`]) and a single
//! embedded key-value store file ([`KvDataset`]). Both flush on [`Dataset::close`] and on drop.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{SynthError, SynthResult};

pub mod img;
pub mod kv;

pub use img::ImgDataset;
pub use kv::KvDataset;

/// JPEG quality used for every stored image.
pub const JPEG_QUALITY: u8 = 95;

/// A stored sample.
#[derive(Clone, Debug)]
pub struct StoredSample {
    pub image: DynamicImage,
    pub label: String,
    pub size: (u32, u32),
}

pub trait Dataset: Send {
    fn write(&mut self, name: &str, image: &DynamicImage, label: &str) -> SynthResult<()>;

    fn read(&mut self, name: &str) -> SynthResult<StoredSample>;

    /// `(width, height)` of a stored image, without decoding it.
    fn read_size(&mut self, name: &str) -> SynthResult<(u32, u32)>;

    /// Number of samples recorded by the last `write_count`, 0 for a fresh dataset.
    fn read_count(&mut self) -> SynthResult<usize>;

    fn write_count(&mut self, count: usize) -> SynthResult<()>;

    /// Persist everything written so far. Safe to call more than once.
    fn close(&mut self) -> SynthResult<()>;
}

/// Storage layout, as chosen on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetKind {
    /// `images/*.jpg` plus `labels.json`.
    #[default]
    Img,
    /// One key-value store file.
    Kv,
}

/// Open (or create) a dataset of `kind` under `dir`.
pub fn open(kind: DatasetKind, dir: &Path) -> SynthResult<Box<dyn Dataset>> {
    Ok(match kind {
        DatasetKind::Img => Box::new(ImgDataset::open(dir)?),
        DatasetKind::Kv => Box::new(KvDataset::open(dir)?),
    })
}

pub(crate) fn encode_jpeg(image: &DynamicImage) -> SynthResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .map_err(|e| SynthError::dataset(format!("encode jpeg: {e}")))?;
    Ok(buf.into_inner())
}

pub(crate) fn missing(name: &str) -> SynthError {
    SynthError::dataset(format!("no sample named '{name}'"))
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/mod.rs"]
mod tests;
