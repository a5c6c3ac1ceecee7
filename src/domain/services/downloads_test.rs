use std::env;

use anyhow::Result;
use tokio::fs;

use super::Downloads;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationResult;

fn result(mime: &str) -> GenerationResult {
    return GenerationResult::new(
        GeneratedImage::new(Some(mime), b"edited".to_vec()),
        "Make it look like a vintage 90s photo",
        vec![],
    );
}

#[test]
fn it_names_files_with_timestamp_and_extension() {
    let res = result("image/jpeg");
    let name = Downloads::file_name(&res);

    assert_eq!(
        name,
        format!("lumina-edit-{}.jpg", res.timestamp().timestamp_millis())
    );
}

#[tokio::test]
async fn it_saves_to_output_dir() -> Result<()> {
    let dir = env::temp_dir().join(format!("lumina-downloads-{}", std::process::id()));
    let downloads = Downloads::new(dir.join("nested"));
    let res = result("image/png");

    let file_path = downloads.save(&res, None).await?;
    assert_eq!(file_path, dir.join("nested").join(Downloads::file_name(&res)));
    assert_eq!(fs::read(&file_path).await?, b"edited".to_vec());

    fs::remove_dir_all(dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_saves_to_explicit_target() -> Result<()> {
    let dir = env::temp_dir().join(format!("lumina-downloads-target-{}", std::process::id()));
    let target = dir.join("result.webp");
    let downloads = Downloads::new(dir.join("unused"));

    let file_path = downloads.save(&result("image/webp"), Some(target.clone())).await?;
    assert_eq!(file_path, target);
    assert_eq!(fs::read(&target).await?, b"edited".to_vec());
    assert!(!dir.join("unused").exists());

    fs::remove_dir_all(dir).await?;
    return Ok(());
}
