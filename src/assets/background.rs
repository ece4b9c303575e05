use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use image::imageops::{self, FilterType};
use lru::LruCache;
use rand::RngCore;

use crate::{
    assets::fonts::collect_files,
    foundation::core::Canvas,
    foundation::error::{SynthError, SynthResult},
    foundation::random,
};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "bmp"];

pub const DEFAULT_BG_CACHE_SIZE: usize = 32;

enum BgStore {
    Preloaded(Vec<Arc<Canvas>>),
    OnDemand(LruCache<PathBuf, Arc<Canvas>>),
}

/// Opaque background images drawn from a directory.
pub struct BgManager {
    paths: Vec<PathBuf>,
    store: BgStore,
}

impl std::fmt::Debug for BgManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BgManager")
            .field("paths", &self.paths.len())
            .field("pre_load", &matches!(self.store, BgStore::Preloaded(_)))
            .finish()
    }
}

impl BgManager {
    /// Scan `bg_dir` recursively. Images with any non-opaque pixel are skipped with a warning.
    pub fn new(bg_dir: &Path, pre_load: bool, cache_size: usize) -> SynthResult<Self> {
        if !bg_dir.is_dir() {
            return Err(SynthError::config(format!(
                "bg_dir does not exist: {}",
                bg_dir.display()
            )));
        }
        let mut found = Vec::new();
        collect_files(bg_dir, IMAGE_EXTENSIONS, &mut found)?;
        found.sort();

        let mut paths = Vec::with_capacity(found.len());
        let mut loaded = Vec::new();
        for path in found {
            let img = decode_background(&path)?;
            if !is_opaque(&img) {
                tracing::warn!(
                    path = %path.display(),
                    "ignore transparent background image, convert it to JPEG"
                );
                continue;
            }
            if pre_load {
                loaded.push(Arc::new(img));
            }
            paths.push(path);
        }

        if paths.is_empty() {
            return Err(SynthError::config(format!(
                "background image is empty: {}",
                bg_dir.display()
            )));
        }
        tracing::info!(count = paths.len(), pre_load, "loaded backgrounds");

        let store = if pre_load {
            BgStore::Preloaded(loaded)
        } else {
            let cap = NonZeroUsize::new(cache_size.max(1)).unwrap_or(NonZeroUsize::MIN);
            BgStore::OnDemand(LruCache::new(cap))
        };
        Ok(Self { paths, store })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Uniformly pick one background.
    pub fn get_bg(&mut self, rng: &mut dyn RngCore) -> SynthResult<Arc<Canvas>> {
        let idx = random::index(rng, self.paths.len());
        match &mut self.store {
            BgStore::Preloaded(imgs) => Ok(Arc::clone(&imgs[idx])),
            BgStore::OnDemand(cache) => {
                let path = &self.paths[idx];
                if let Some(img) = cache.get(path).cloned() {
                    return Ok(img);
                }
                let img = Arc::new(decode_background(path)?);
                cache.put(path.clone(), Arc::clone(&img));
                Ok(img)
            }
        }
    }
}

/// Upscale `bg` (keeping its aspect ratio) until it covers `size` on both axes.
pub fn guard_bg_size(bg: &Canvas, size: (u32, u32)) -> Option<Canvas> {
    let (w, h) = bg.dimensions();
    let scale = (size.0 as f64 / w as f64).max(size.1 as f64 / h as f64);
    if scale <= 1.0 {
        return None;
    }
    let nw = ((w as f64 * scale).ceil() as u32).max(size.0);
    let nh = ((h as f64 * scale).ceil() as u32).max(size.1);
    Some(imageops::resize(bg, nw, nh, FilterType::CatmullRom))
}

fn decode_background(path: &Path) -> SynthResult<Canvas> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read background '{}'", path.display()))?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode background '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

fn is_opaque(img: &Canvas) -> bool {
    img.pixels().all(|p| p[3] == 255)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
