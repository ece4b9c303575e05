use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn fonts_dir() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts")
}

fn config(chars_file: PathBuf, length: (usize, usize)) -> RandCorpusConfig {
    RandCorpusConfig {
        base: CorpusBaseConfig::new(fonts_dir(), (16, 20)),
        chars_file,
        length,
        filter_font: false,
        filter_font_min_support_chars: 100,
    }
}

#[test]
fn draws_chars_from_charset() {
    let dir = tempfile::tempdir().unwrap();
    let chars = dir.path().join("chars.txt");
    std::fs::write(&chars, "x\ny\nz\n").unwrap();
    let mut corpus = RandCorpus::new(config(chars, (2, 6))).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..100 {
        let t = corpus.get_text(&mut rng).unwrap();
        assert!((2..6).contains(&t.chars().count()));
        assert!(t.chars().all(|c| "xyz".contains(c)));
    }
}

#[test]
fn missing_chars_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = RandCorpus::new(config(dir.path().join("nope.txt"), (2, 6))).unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
}

#[test]
fn font_filter_drops_unsupporting_fonts() {
    let dir = tempfile::tempdir().unwrap();
    let chars = dir.path().join("chars.txt");
    std::fs::write(&chars, "中\n文\n").unwrap();
    let mut cfg = config(chars, (1, 2));
    cfg.filter_font = true;
    cfg.filter_font_min_support_chars = 1;
    let err = RandCorpus::new(cfg).unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
}
