use std::path::Path;

use anyhow::Result;
use test_utils::png_fixture;

use super::detect_mime_type;
use super::load_image_file;
use super::ImageIntake;
use crate::domain::models::ImageFile;

fn png(name: &str) -> ImageFile {
    return ImageFile::new(name, "image/png", vec![1, 2, 3]);
}

fn text(name: &str) -> ImageFile {
    return ImageFile::new(name, "text/plain", b"hello".to_vec());
}

#[test]
fn it_adds_images_up_to_max() {
    let intake = ImageIntake::default();
    let images = intake
        .add_images(vec![png("a.png"), png("b.png"), png("c.png")], &[])
        .unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].name(), "a.png");
    assert_eq!(images[1].name(), "b.png");
}

#[test]
fn it_never_exceeds_max_across_selections() {
    let intake = ImageIntake::new(3);
    let mut images = vec![];
    for batch in 0..5 {
        let files = (0..batch).map(|i| return png(&format!("{i}.png"))).collect();
        if let Some(updated) = intake.add_images(files, &images) {
            images = updated;
        }
        assert!(images.len() <= 3);
    }

    assert_eq!(images.len(), 3);
}

#[test]
fn it_skips_non_image_files() {
    let intake = ImageIntake::default();
    let images = intake
        .add_images(vec![text("notes.txt"), png("a.png"), text("b.md")], &[])
        .unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name(), "a.png");
}

#[test]
fn it_filters_before_applying_capacity() {
    let intake = ImageIntake::new(1);
    let images = intake
        .add_images(vec![text("notes.txt"), png("a.png")], &[])
        .unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name(), "a.png");
}

#[test]
fn it_returns_unchanged_when_nothing_qualifies() {
    let intake = ImageIntake::default();
    assert!(intake.add_images(vec![text("notes.txt")], &[]).is_none());
    assert!(intake.add_images(vec![], &[]).is_none());

    let full = intake.add_images(vec![png("a.png"), png("b.png")], &[]).unwrap();
    assert!(intake.add_images(vec![png("c.png")], &full).is_none());
}

#[test]
fn it_appends_to_existing_images() {
    let intake = ImageIntake::default();
    let first = intake.add_images(vec![png("a.png")], &[]).unwrap();
    let second = intake.add_images(vec![png("b.png")], &first).unwrap();

    assert_eq!(second.len(), 2);
    assert_eq!(second[0].id, first[0].id);
    assert_eq!(second[1].name(), "b.png");
}

#[test]
fn it_removes_by_id_keeping_order() {
    let intake = ImageIntake::new(3);
    let images = intake
        .add_images(vec![png("a.png"), png("b.png"), png("c.png")], &[])
        .unwrap();

    let removed = intake.remove_image(&images[1].id, &images);
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].id, images[0].id);
    assert_eq!(removed[1].id, images[2].id);
}

#[test]
fn it_ignores_unknown_ids_on_remove() {
    let intake = ImageIntake::default();
    let images = intake.add_images(vec![png("a.png")], &[]).unwrap();
    let removed = intake.remove_image("missing", &images);

    assert_eq!(removed, images);
}

#[test]
fn it_clears_images() {
    let intake = ImageIntake::default();
    assert!(intake.clear_images().is_empty());
}

#[test]
fn it_releases_previews_on_remove_and_clear() {
    let intake = ImageIntake::default();
    let images = intake.add_images(vec![png("a.png"), png("b.png")], &[]).unwrap();
    assert_eq!(intake.previews().live(), 2);

    let remaining = intake.remove_image(&images[0].id, &images);
    drop(images);
    assert_eq!(intake.previews().live(), 1);

    drop(remaining);
    let cleared = intake.clear_images();
    assert!(cleared.is_empty());
    assert_eq!(intake.previews().live(), 0);
}

#[test]
fn it_does_not_accumulate_previews_over_long_sessions() {
    let intake = ImageIntake::default();
    let mut images = vec![];
    for i in 0..200 {
        if let Some(updated) = intake.add_images(vec![png(&format!("{i}.png"))], &images) {
            images = updated;
        }
        if images.len() == 2 {
            images = intake.remove_image(&images[0].id, &images);
        }
    }

    assert_eq!(intake.previews().live(), images.len());
}

#[test]
fn it_detects_mime_from_extension() {
    assert_eq!(detect_mime_type(Path::new("a.png"), &[]), "image/png");
    assert_eq!(detect_mime_type(Path::new("a.JPG"), &[]), "image/jpeg");
    assert_eq!(detect_mime_type(Path::new("a.jpeg"), &[]), "image/jpeg");
    assert_eq!(detect_mime_type(Path::new("a.webp"), &[]), "image/webp");
}

#[test]
fn it_detects_mime_from_content() {
    let bytes = png_fixture(2, 2, [255, 0, 0, 255]);
    assert_eq!(detect_mime_type(Path::new("upload"), &bytes), "image/png");
}

#[test]
fn it_falls_back_to_octet_stream() {
    assert_eq!(
        detect_mime_type(Path::new("notes.txt"), b"hello"),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn it_loads_files_from_disk() -> Result<()> {
    let file = load_image_file(Path::new("./test/bad-config.toml")).await?;
    assert_eq!(file.name, "bad-config.toml");
    assert_eq!(file.mime_type, "application/octet-stream");
    assert!(!file.is_image());

    return Ok(());
}

#[tokio::test]
async fn it_fails_loading_missing_files() {
    let res = load_image_file(Path::new("./test/does-not-exist.png")).await;
    assert!(res.is_err());
}
