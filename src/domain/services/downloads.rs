#[cfg(test)]
#[path = "downloads_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::GenerationResult;

pub struct Downloads {
    pub output_dir: path::PathBuf,
}

impl Default for Downloads {
    fn default() -> Downloads {
        return Downloads::new(path::PathBuf::from(Config::get(ConfigKey::OutputDir)));
    }
}

impl Downloads {
    pub fn new(output_dir: path::PathBuf) -> Downloads {
        return Downloads { output_dir };
    }

    pub fn file_name(result: &GenerationResult) -> String {
        return format!(
            "lumina-edit-{}.{}",
            result.timestamp().timestamp_millis(),
            result.image().extension()
        );
    }

    /// Writes the result's image to `target`, or to a timestamped file in the
    /// output directory when no target is given.
    pub async fn save(
        &self,
        result: &GenerationResult,
        target: Option<path::PathBuf>,
    ) -> Result<path::PathBuf> {
        let file_path = target.unwrap_or_else(|| {
            return self.output_dir.join(Downloads::file_name(result));
        });

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(&result.image().data).await?;
        file.flush().await?;

        tracing::info!(path = ?file_path, bytes = result.image().data.len(), "saved result");

        return Ok(file_path);
    }
}
