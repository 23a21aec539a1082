use shared::{load_stories, save_stories, Story, StoryList};

#[test]
fn test_saved_stories_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("hackernews.json");
    let stories = StoryList {
        stories: vec![Story {
            id: Some(1),
            title: Some("Show HN: A tiny database".to_string()),
            url: Some("https://example.com".to_string()),
            discussion: Some("https://news.ycombinator.com/item?id=1".to_string()),
            excerpt: Some("An excerpt with \"quotes\" and\nnewlines.".to_string()),
            text: None,
        }],
    };

    save_stories(&stories, &path).unwrap();
    assert_eq!(load_stories(&path).unwrap(), stories);
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_stories(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_garbage_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_stories(&path).is_err());
}
