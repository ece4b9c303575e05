use super::*;
use crate::dataset::tests::gray_image;

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut ds = ImgDataset::open(dir.path()).unwrap();
    ds.write("000000000", &gray_image(30, 12), "hello").unwrap();
    ds.write_count(1).unwrap();

    assert!(dir.path().join("images/000000000.jpg").is_file());
    let sample = ds.read("000000000").unwrap();
    assert_eq!(sample.label, "hello");
    assert_eq!(sample.size, (30, 12));
    assert_eq!((sample.image.width(), sample.image.height()), (30, 12));
    assert_eq!(ds.read_size("000000000").unwrap(), (30, 12));
    assert!(ds.read("missing").is_err());
}

#[test]
fn labels_file_uses_hyphenated_count_key() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut ds = ImgDataset::open(dir.path()).unwrap();
        ds.write("000000000", &gray_image(4, 4), "中文").unwrap();
        ds.write_count(1).unwrap();
    }
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(LABEL_FILE)).unwrap())
            .unwrap();
    assert_eq!(json["num-samples"], 1);
    assert_eq!(json["labels"]["000000000"], "中文");
    assert_eq!(json["sizes"]["000000000"], serde_json::json!([4, 4]));
}

#[test]
fn reopen_continues_count() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut ds = ImgDataset::open(dir.path()).unwrap();
        assert_eq!(ds.read_count().unwrap(), 0);
        ds.write_count(7).unwrap();
        ds.close().unwrap();
    }
    let mut ds = ImgDataset::open(dir.path()).unwrap();
    assert_eq!(ds.read_count().unwrap(), 7);
}
