use stemforge::domain::{StoragePath, StoragePathError};

#[test]
fn given_nested_relative_path_when_parsing_then_accepted() {
    let path = StoragePath::parse("user-1/vocals/take 2.wav").unwrap();

    assert_eq!(path.as_str(), "user-1/vocals/take 2.wav");
    assert_eq!(
        path.segments().collect::<Vec<_>>(),
        vec!["user-1", "vocals", "take 2.wav"]
    );
    assert_eq!(format!("{}", path), path.as_str());
}

#[test]
fn given_blank_path_when_parsing_then_empty_error() {
    assert_eq!(StoragePath::parse("  "), Err(StoragePathError::Empty));
}

#[test]
fn given_leading_slash_when_parsing_then_absolute_error() {
    assert!(matches!(
        StoragePath::parse("/etc/passwd"),
        Err(StoragePathError::Absolute(_))
    ));
}

#[test]
fn given_traversal_or_empty_segment_when_parsing_then_rejected() {
    for raw in ["a/../b", "./a", "a//b", "a/", "a/\nb"] {
        assert!(
            matches!(StoragePath::parse(raw), Err(StoragePathError::InvalidSegment(_))),
            "{:?}",
            raw
        );
    }
}

#[test]
fn given_overlong_path_when_parsing_then_too_long_error() {
    let raw = "a".repeat(1025);
    assert_eq!(StoragePath::parse(raw), Err(StoragePathError::TooLong(1025)));
}
