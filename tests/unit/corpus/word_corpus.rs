use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn fonts_dir() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts")
}

fn corpus(text: &str, num_word: (usize, usize)) -> SynthResult<WordCorpus> {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("words.txt");
    std::fs::write(&p, text).unwrap();
    WordCorpus::new(WordCorpusConfig {
        base: CorpusBaseConfig::new(fonts_dir(), (16, 20)),
        filter: CharFilterConfig::default(),
        text_paths: vec![p],
        separator: " ".to_string(),
        num_word,
    })
}

#[test]
fn returns_contiguous_word_runs() {
    let text = "one two three four five six";
    let mut c = corpus(text, (1, 4)).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..100 {
        let t = c.get_text(&mut rng).unwrap();
        let n = t.split(' ').count();
        assert!((1..4).contains(&n));
        assert!(text.contains(&t));
    }
}

#[test]
fn equal_bounds_fix_the_word_count() {
    let mut c = corpus("a b c d", (2, 2)).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        assert_eq!(c.get_text(&mut rng).unwrap().split(' ').count(), 2);
    }
}

#[test]
fn whole_text_can_be_selected() {
    let mut c = corpus("a b c", (3, 3)).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    assert_eq!(c.get_text(&mut rng).unwrap(), "a b c");
}

#[test]
fn too_few_words_is_fatal() {
    let err = corpus("a b", (1, 5)).unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
}
