use std::{
    collections::{BTreeSet, HashMap},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use ab_glyph::{Font, FontArc, FontVec, PxScale, PxScaleFont};
use anyhow::Context;
use lru::LruCache;
use rand::RngCore;

use crate::{
    assets::charset::{CharSet, SPACE_CHAR},
    foundation::error::{SynthError, SynthResult},
    foundation::random,
};

/// Font container extensions picked up by directory scans.
pub const FONT_EXTENSIONS: &[&str] = &["ttc", "ttf", "otf"];

/// Default capacity of the `(path, size)` handle cache.
pub const DEFAULT_FONT_CACHE_SIZE: usize = 256;

/// Probe size used when checking that declared glyphs actually draw something.
const PROBE_SIZE: u32 = 10;

/// A parsed font bound to one pixel size.
///
/// `size` is the em size in pixels; `scale` is the matching `ab_glyph` scale.
pub struct SizedFont {
    pub font: FontArc,
    pub size: u32,
    pub scale: PxScale,
}

impl SizedFont {
    pub fn new(font: FontArc, size: u32) -> Self {
        let scale = em_scale(&font, size);
        Self { font, size, scale }
    }

    pub fn scaled(&self) -> PxScaleFont<&FontArc> {
        self.font.as_scaled(self.scale)
    }
}

impl std::fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedFont")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

pub type FontHandle = Arc<SizedFont>;

/// `ab_glyph` scales by ascent-to-descent height; convert an em size in pixels to that.
fn em_scale(font: &FontArc, size: u32) -> PxScale {
    let upem = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size as f32 * font.height_unscaled() / upem)
}

/// Code point coverage of one font file.
#[derive(Clone, Debug)]
pub struct FontRecord {
    pub path: PathBuf,
    /// Code points the character map declares.
    pub declared: BTreeSet<char>,
    /// Subset of `declared` known to draw a visible mark.
    pub validated: Arc<BTreeSet<char>>,
}

/// Result of [`FontCatalog::get_font`].
#[derive(Clone, Debug)]
pub struct SelectedFont {
    pub handle: FontHandle,
    pub code_points: Arc<BTreeSet<char>>,
    pub path: PathBuf,
}

/// Usable fonts of a directory plus a size range, with coverage tracking.
pub struct FontCatalog {
    size_range: (u32, u32),
    paths: Vec<PathBuf>,
    fonts: HashMap<PathBuf, FontArc>,
    records: HashMap<PathBuf, FontRecord>,
    charset_support: Option<HashMap<PathBuf, usize>>,
    cache: LruCache<(PathBuf, u32), FontHandle>,
}

impl std::fmt::Debug for FontCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCatalog")
            .field("size_range", &self.size_range)
            .field("paths", &self.paths)
            .field("cached_handles", &self.cache.len())
            .finish()
    }
}

impl FontCatalog {
    /// Resolve fonts from `font_dir`.
    ///
    /// With `font_list_file`, each non-empty line names a file relative to `font_dir`; a missing
    /// file or an empty list is fatal. Without it every font container under `font_dir` is used.
    pub fn new(
        font_dir: &Path,
        font_list_file: Option<&Path>,
        font_size: (u32, u32),
        cache_size: usize,
    ) -> SynthResult<Self> {
        let paths = match font_list_file {
            Some(list) => read_font_list(font_dir, list)?,
            None => scan_font_dir(font_dir)?,
        };
        Self::from_paths(paths, font_size, cache_size)
    }

    pub fn from_paths(
        paths: Vec<PathBuf>,
        font_size: (u32, u32),
        cache_size: usize,
    ) -> SynthResult<Self> {
        if font_size.0 >= font_size.1 {
            return Err(SynthError::config(format!(
                "font_size min must be < max, got {font_size:?}"
            )));
        }
        if font_size.0 == 0 {
            return Err(SynthError::config("font_size min must be > 0"));
        }

        let mut fonts = HashMap::new();
        let mut records = HashMap::new();
        let mut usable = Vec::with_capacity(paths.len());
        for path in paths {
            let font = match load_font(&path) {
                Ok(font) => font,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "load font failed, skip it");
                    continue;
                }
            };
            let declared = declared_code_points(&font);
            records.insert(
                path.clone(),
                FontRecord {
                    path: path.clone(),
                    validated: Arc::new(declared.clone()),
                    declared,
                },
            );
            fonts.insert(path.clone(), font);
            usable.push(path);
        }

        if usable.is_empty() {
            return Err(SynthError::config("no usable font files found"));
        }
        tracing::info!(count = usable.len(), "loaded fonts");

        let cap = NonZeroUsize::new(cache_size.max(1)).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            size_range: font_size,
            paths: usable,
            fonts,
            records,
            charset_support: None,
            cache: LruCache::new(cap),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn record(&self, path: &Path) -> Option<&FontRecord> {
        self.records.get(path)
    }

    /// Uniformly pick a font and a size in `[min, max)`.
    pub fn get_font(&mut self, rng: &mut dyn RngCore) -> SynthResult<SelectedFont> {
        if self.paths.is_empty() {
            return Err(SynthError::config("font catalog is empty"));
        }
        let path = self.paths[random::index(rng, self.paths.len())].clone();
        let size = random::randint(
            rng,
            (i64::from(self.size_range.0), i64::from(self.size_range.1)),
        ) as u32;
        let handle = self.sized(&path, size)?;
        let code_points = self
            .records
            .get(&path)
            .map(|r| Arc::clone(&r.validated))
            .ok_or_else(|| SynthError::config(format!("unknown font {}", path.display())))?;
        Ok(SelectedFont {
            handle,
            code_points,
            path,
        })
    }

    /// Cached handle for `(path, size)`; parsing happened once at construction.
    pub fn sized(&mut self, path: &Path, size: u32) -> SynthResult<FontHandle> {
        let key = (path.to_path_buf(), size);
        if let Some(handle) = self.cache.get(&key).cloned() {
            return Ok(handle);
        }
        let font = self
            .fonts
            .get(path)
            .cloned()
            .ok_or_else(|| SynthError::config(format!("unknown font {}", path.display())))?;
        let handle = Arc::new(SizedFont::new(font, size));
        self.cache.put(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// `(true, {})` iff every character of `text` is in `code_points`; otherwise the missing ones.
    pub fn check_support(text: &str, code_points: &BTreeSet<char>) -> (bool, BTreeSet<char>) {
        let missing = text
            .chars()
            .filter(|c| !code_points.contains(c))
            .collect::<BTreeSet<_>>();
        (missing.is_empty(), missing)
    }

    /// Drop declared code points in `charset` whose probe rendering is blank (space excepted).
    pub fn refine_for(&mut self, charset: &CharSet) {
        let mut support = HashMap::with_capacity(self.paths.len());
        for path in &self.paths {
            let (Some(font), Some(record)) = (self.fonts.get(path), self.records.get_mut(path))
            else {
                continue;
            };
            let probe = SizedFont::new(font.clone(), PROBE_SIZE);
            let removed = record
                .validated
                .iter()
                .copied()
                .filter(|c| *c != SPACE_CHAR && charset.contains(*c) && glyph_is_blank(&probe, *c))
                .collect::<Vec<_>>();

            if !removed.is_empty() {
                let validated = Arc::make_mut(&mut record.validated);
                for c in &removed {
                    validated.remove(c);
                }
                let preview = removed.iter().take(10).collect::<String>();
                tracing::info!(
                    path = %path.display(),
                    removed = removed.len(),
                    "removed empty glyph masks: {preview:?}{}",
                    if removed.len() > 10 { "..." } else { "" }
                );
            }

            let inter = record
                .validated
                .iter()
                .filter(|c| charset.contains(**c))
                .count();
            support.insert(path.clone(), inter);
        }
        self.charset_support = Some(support);
    }

    /// Drop fonts supporting fewer than `min_support` characters of the refined charset.
    ///
    /// Must be called after [`FontCatalog::refine_for`].
    pub fn filter_by_min_support(&mut self, min_support: usize) -> SynthResult<()> {
        let support = self.charset_support.as_ref().ok_or_else(|| {
            SynthError::config("filter_by_min_support must be called after refine_for")
        })?;
        let before = self.paths.len();
        self.paths.retain(|path| {
            let inter = support.get(path).copied().unwrap_or(0);
            if inter < min_support {
                tracing::info!(
                    path = %path.display(),
                    "filtered, supports too few chars of the charset: {inter}<{min_support}"
                );
                false
            } else {
                true
            }
        });
        if self.paths.len() != before {
            tracing::info!("filter font path: {before} -> {}", self.paths.len());
        }
        if self.paths.is_empty() {
            return Err(SynthError::config(format!(
                "every font supports fewer than {min_support} chars of the charset"
            )));
        }
        Ok(())
    }
}

fn load_font(path: &Path) -> SynthResult<FontArc> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    // Collections share coverage closely enough; the first face stands in for all of them.
    let font = FontVec::try_from_vec_and_index(bytes, 0)
        .map_err(|e| SynthError::config(format!("invalid font {}: {e}", path.display())))?;
    Ok(FontArc::new(font))
}

fn declared_code_points(font: &FontArc) -> BTreeSet<char> {
    font.codepoint_ids()
        .filter(|(id, _)| id.0 != 0)
        .map(|(_, c)| c)
        .collect()
}

/// Whether `c` draws no visible pixel at the font's size.
pub fn glyph_is_blank(font: &SizedFont, c: char) -> bool {
    let glyph = font.font.glyph_id(c).with_scale(font.scale);
    let Some(outlined) = font.font.outline_glyph(glyph) else {
        return true;
    };
    let mut blank = true;
    outlined.draw(|_, _, v| {
        if v * 255.0 >= 1.0 {
            blank = false;
        }
    });
    blank
}

fn read_font_list(font_dir: &Path, list: &Path) -> SynthResult<Vec<PathBuf>> {
    let text = std::fs::read_to_string(list)
        .with_context(|| format!("read font list '{}'", list.display()))?;
    let names = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>();
    if names.is_empty() {
        return Err(SynthError::config(format!(
            "font list file is empty: {}",
            list.display()
        )));
    }
    names
        .into_iter()
        .map(|name| {
            let path = font_dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(SynthError::config(format!(
                    "font file does not exist: {}",
                    path.display()
                )))
            }
        })
        .collect()
}

fn scan_font_dir(font_dir: &Path) -> SynthResult<Vec<PathBuf>> {
    if !font_dir.is_dir() {
        return Err(SynthError::config(format!(
            "font dir does not exist: {}",
            font_dir.display()
        )));
    }
    let mut out = Vec::new();
    collect_files(font_dir, FONT_EXTENSIONS, &mut out)?;
    out.sort();
    Ok(out)
}

/// Recursively collect files whose extension (case-insensitive) is in `exts`.
pub(crate) fn collect_files(dir: &Path, exts: &[&str], out: &mut Vec<PathBuf>) -> SynthResult<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read dir entry in '{}'", dir.display()))?
            .path();
        if path.is_dir() {
            collect_files(&path, exts, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
