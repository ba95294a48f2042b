//! Media resolver: JSON parsing, existence filtering, classification.

use auctioneer_bot::channel::media::{ResolvedMedia, listed_images, resolve_media};
use std::path::PathBuf;

fn temp_image(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "auctioneer_media_test_{}_{name}.jpg",
        std::process::id()
    ));
    std::fs::write(&path, b"jpeg").expect("write temp image");
    path
}

#[test]
fn missing_or_malformed_json_means_no_images() {
    assert!(listed_images(None).is_empty());
    assert!(listed_images(Some("not json")).is_empty());
    assert!(listed_images(Some("[]")).is_empty());
}

#[test]
fn listed_images_parses_paths_in_order() {
    let paths = listed_images(Some(r#"["/a.jpg","/b.jpg"]"#));
    assert_eq!(paths, vec!["/a.jpg".to_string(), "/b.jpg".to_string()]);
}

#[test]
fn no_valid_files_resolves_to_none() {
    let missing = std::env::temp_dir()
        .join("auctioneer_media_test_never_written.jpg")
        .to_string_lossy()
        .into_owned();
    assert_eq!(resolve_media(&[]), ResolvedMedia::None);
    assert_eq!(resolve_media(&[missing]), ResolvedMedia::None);
}

#[test]
fn one_valid_file_resolves_to_single() {
    let image = temp_image("single");
    let resolved = resolve_media(&[image.to_string_lossy().into_owned()]);
    assert_eq!(resolved, ResolvedMedia::Single(image.clone()));
    let _ = std::fs::remove_file(image);
}

#[test]
fn broken_paths_are_dropped_not_fatal() {
    let a = temp_image("album_a");
    let b = temp_image("album_b");
    let missing = std::env::temp_dir()
        .join("auctioneer_media_test_gone.jpg")
        .to_string_lossy()
        .into_owned();
    let resolved = resolve_media(&[
        a.to_string_lossy().into_owned(),
        missing,
        b.to_string_lossy().into_owned(),
    ]);
    assert_eq!(resolved, ResolvedMedia::Album(vec![a.clone(), b.clone()]));
    let _ = std::fs::remove_file(a);
    let _ = std::fs::remove_file(b);
}

#[test]
fn two_remaining_files_still_form_an_album() {
    let a = temp_image("pair_a");
    let b = temp_image("pair_b");
    let resolved = resolve_media(&[
        a.to_string_lossy().into_owned(),
        b.to_string_lossy().into_owned(),
    ]);
    match resolved {
        ResolvedMedia::Album(paths) => assert_eq!(paths.len(), 2),
        other => panic!("expected album, got {other:?}"),
    }
    let _ = std::fs::remove_file(a);
    let _ = std::fs::remove_file(b);
}
