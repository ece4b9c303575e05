use std::io::Write;

use super::*;

fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn single_space_line_yields_space() {
    let f = write_tmp("a\n \nb\n");
    let set = CharSet::load(f.path()).unwrap();
    assert!(set.contains(SPACE_CHAR));
    assert!(set.contains('a'));
    assert!(set.contains('b'));
    assert_eq!(set.len(), 3);
}

#[test]
fn two_space_lines_are_fatal() {
    let f = write_tmp("a\n \nb\n  \n");
    let err = CharSet::load(f.path()).unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
    assert!(err.to_string().contains("two space"));
}

#[test]
fn multi_char_lines_are_fatal() {
    let err = CharSet::parse("a\nbc\n").unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn empty_lines_without_space_are_ignored() {
    let set = CharSet::parse("x\n\ny\n").unwrap();
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!['x', 'y']);
}

#[test]
fn unicode_lines_count_as_single_chars() {
    let set = CharSet::parse("你\n好\né\n").unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.filter_text("你们好!é"), "你好é");
}

#[test]
fn missing_file_is_fatal() {
    let err = CharSet::load(std::path::Path::new("/definitely/not/here.txt")).unwrap_err();
    assert!(matches!(err, SynthError::Config(_)));
}
