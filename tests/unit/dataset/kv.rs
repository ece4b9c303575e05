use super::*;
use crate::dataset::tests::gray_image;

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut ds = KvDataset::open(dir.path()).unwrap();
    ds.write("000000003", &gray_image(16, 8), "kv label").unwrap();
    ds.write_count(4).unwrap();

    let sample = ds.read("000000003").unwrap();
    assert_eq!(sample.label, "kv label");
    assert_eq!(sample.size, (16, 8));
    assert_eq!(ds.read_count().unwrap(), 4);
    assert!(matches!(ds.read_size("nope"), Err(SynthError::Dataset(_))));
}

#[test]
fn keys_follow_the_documented_layout() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut ds = KvDataset::open(dir.path()).unwrap();
        ds.write("000000000", &gray_image(5, 3), "x").unwrap();
        ds.write_count(1).unwrap();
    }
    let db = Database::create(dir.path().join(DB_FILE)).unwrap();
    let txn = db.begin_read().unwrap();
    let table = txn.open_table(SAMPLES).unwrap();
    assert_eq!(table.get("size-000000000").unwrap().unwrap().value(), b"5,3");
    assert_eq!(table.get("label-000000000").unwrap().unwrap().value(), b"x");
    assert_eq!(table.get("num-samples").unwrap().unwrap().value(), b"1");
    assert!(table.get("image-000000000").unwrap().is_some());
}

#[test]
fn count_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut ds = KvDataset::open(dir.path()).unwrap();
        ds.write_count(12).unwrap();
    }
    let mut ds = KvDataset::open(dir.path()).unwrap();
    assert_eq!(ds.read_count().unwrap(), 12);
}
