use super::*;
use crate::corpus::{CharFilterConfig, CorpusBaseConfig, CorpusConfig, EnumCorpusConfig};
use crate::dataset::{ImgDataset, KvDataset};
use crate::test_support::{background_dir, fonts_dir};

fn render_config(bg: &std::path::Path) -> RenderConfig {
    RenderConfig::new(
        CorpusConfig::Enum(EnumCorpusConfig {
            base: CorpusBaseConfig::new(fonts_dir(), (18, 22)),
            filter: CharFilterConfig::default(),
            text_paths: vec![],
            items: vec!["alpha".into(), "beta".into()],
            num_pick: 1,
            join_str: String::new(),
        }),
        bg,
    )
}

#[test]
fn parallel_run_writes_every_sample_with_sequential_names() {
    let bg = background_dir(64, 64);
    let out = tempfile::tempdir().unwrap();
    let opts = GenerateOptions {
        workers: Some(3),
        seed: Some(7),
        ..GenerateOptions::default()
    };
    let ds = Box::new(ImgDataset::open(out.path()).unwrap());
    let stats = generate_into(&render_config(bg.path()), 9, ds, &opts).unwrap();
    assert_eq!(stats, GenerateStats { generated: 9, total: 9 });

    let mut ds = ImgDataset::open(out.path()).unwrap();
    assert_eq!(ds.read_count().unwrap(), 9);
    for i in 0..9 {
        let sample = ds.read(&format!("{i:09}")).unwrap();
        assert!(sample.label == "alpha" || sample.label == "beta");
        assert_eq!(sample.size.1, 32);
    }
}

#[test]
fn inline_run_continues_existing_count() {
    let bg = background_dir(64, 64);
    let out = tempfile::tempdir().unwrap();
    let opts = GenerateOptions {
        workers: Some(0),
        seed: Some(1),
        ..GenerateOptions::default()
    };
    let cfg = render_config(bg.path());
    let first = generate_into(&cfg, 2, Box::new(KvDataset::open(out.path()).unwrap()), &opts).unwrap();
    assert_eq!(first.total, 2);
    let second = generate_into(&cfg, 3, Box::new(KvDataset::open(out.path()).unwrap()), &opts).unwrap();
    assert_eq!(second, GenerateStats { generated: 3, total: 5 });

    let mut ds = KvDataset::open(out.path()).unwrap();
    assert!(ds.read_size("000000004").is_ok());
    assert!(ds.read_size("000000005").is_err());
}

#[test]
fn fatal_worker_error_is_propagated() {
    let bg = background_dir(16, 16);
    let out = tempfile::tempdir().unwrap();
    let mut cfg = render_config(bg.path());
    cfg.bg_dir = out.path().join("no-backgrounds-here");
    let opts = GenerateOptions {
        workers: Some(2),
        seed: Some(3),
        ..GenerateOptions::default()
    };
    let ds = Box::new(ImgDataset::open(out.path()).unwrap());
    assert!(generate_into(&cfg, 4, ds, &opts).is_err());
}
