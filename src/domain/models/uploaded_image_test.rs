use std::sync::Arc;

use super::ImageFile;
use super::Previews;
use super::UploadedImage;

#[test]
fn it_detects_image_files() {
    assert!(ImageFile::new("a.png", "image/png", vec![1]).is_image());
    assert!(ImageFile::new("b.jpg", "image/jpeg", vec![1]).is_image());
    assert!(!ImageFile::new("c.txt", "text/plain", vec![1]).is_image());
    assert!(!ImageFile::new("d", "application/octet-stream", vec![1]).is_image());
}

#[test]
fn it_creates_uploaded_image_with_unique_ids() {
    let previews = Previews::default();
    let first = UploadedImage::new(ImageFile::new("a.png", "image/png", vec![1, 2]), &previews);
    let second = UploadedImage::new(ImageFile::new("a.png", "image/png", vec![1, 2]), &previews);

    assert_ne!(first.id, second.id);
    assert_ne!(first.preview.url(), second.preview.url());
    assert!(first.preview.url().starts_with("preview://"));
    assert_eq!(first.name(), "a.png");
    assert_eq!(first.mime_type(), "image/png");
    assert_eq!(first.data(), &[1, 2]);
    assert_eq!(first.preview.data(), &[1, 2]);
}

#[test]
fn it_encodes_base64_lazily_and_caches_across_clones() {
    let previews = Previews::default();
    let image = UploadedImage::new(ImageFile::new("a.png", "image/png", b"hello".to_vec()), &previews);
    let clone = image.clone();

    assert!(!image.is_base64_cached());
    assert_eq!(clone.base64(), "aGVsbG8=");
    assert!(image.is_base64_cached());
    assert_eq!(image.base64(), "aGVsbG8=");
}

#[test]
fn it_releases_previews_when_dropped() {
    let previews = Previews::default();
    let image = UploadedImage::new(ImageFile::new("a.png", "image/png", vec![1]), &previews);
    let held = image.preview.clone();
    assert_eq!(previews.live(), 1);

    drop(image);
    assert_eq!(previews.live(), 1);

    drop(held);
    assert_eq!(previews.live(), 0);
}

#[test]
fn it_tracks_many_previews() {
    let previews = Previews::default();
    let data: Arc<[u8]> = Arc::from(vec![1, 2, 3]);
    let kept = (0..10)
        .map(|_| return previews.create("image/png", data.clone()))
        .collect::<Vec<_>>();

    for _ in 0..100 {
        previews.create("image/png", data.clone());
    }

    assert_eq!(previews.live(), 10);
    drop(kept);
    assert_eq!(previews.live(), 0);
}
