use super::GeneratedImage;
use super::GenerationResult;
use crate::domain::models::ImageFile;
use crate::domain::models::Previews;
use crate::domain::models::UploadedImage;

#[test]
fn it_defaults_mime_type_to_png() {
    assert_eq!(GeneratedImage::new(None, vec![]).mime_type, "image/png");
    assert_eq!(GeneratedImage::new(Some(""), vec![]).mime_type, "image/png");
    assert_eq!(
        GeneratedImage::new(Some("image/webp"), vec![]).mime_type,
        "image/webp"
    );
}

#[test]
fn it_builds_data_urls() {
    let image = GeneratedImage::new(Some("image/jpeg"), b"hello".to_vec());
    insta::assert_snapshot!(image.data_url(), @"data:image/jpeg;base64,aGVsbG8=");
}

#[test]
fn it_maps_extensions() {
    assert_eq!(GeneratedImage::new(None, vec![]).extension(), "png");
    assert_eq!(GeneratedImage::new(Some("image/jpeg"), vec![]).extension(), "jpg");
    assert_eq!(GeneratedImage::new(Some("image/webp"), vec![]).extension(), "webp");
    assert_eq!(GeneratedImage::new(Some("image/heic"), vec![]).extension(), "png");
}

#[test]
fn it_records_provenance() {
    let previews = Previews::default();
    let source = UploadedImage::new(ImageFile::new("a.png", "image/png", vec![1]), &previews);
    let result = GenerationResult::new(
        GeneratedImage::new(None, vec![9]),
        "Add a cinematic cyberpunk look",
        vec![source.preview.clone()],
    );

    assert!(!result.id().is_empty());
    assert_eq!(result.prompt(), "Add a cinematic cyberpunk look");
    assert_eq!(result.image().data, vec![9]);
    assert_eq!(result.original_images().len(), 1);
    assert_eq!(result.original_images()[0].url(), source.preview.url());
}
