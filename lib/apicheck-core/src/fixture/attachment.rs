use std::path::{Path, PathBuf};

use tracing::debug;

use super::FixtureError;

/// A named copy of a client's request/response log, attached to a test report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogAttachment {
    /// Step name, e.g. `create article`.
    pub name: String,
    /// The rendered log.
    pub contents: String,
}

impl LogAttachment {
    /// File name used by [`write_to`](Self::write_to): the slugified name with a `.log` extension.
    pub fn file_name(&self) -> String {
        let slug = slug::slugify(&self.name);
        if slug.is_empty() {
            "api-logs.log".to_string()
        } else {
            format!("{slug}.log")
        }
    }

    /// Writes the log under `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] when the directory or the file cannot be written.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, FixtureError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(self.file_name());
        tokio::fs::write(&path, &self.contents).await?;
        debug!(path = %path.display(), "log attachment written");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_slugified() {
        let attachment = LogAttachment {
            name: "Create Article / 201".to_string(),
            contents: String::new(),
        };

        assert_eq!(attachment.file_name(), "create-article-201.log");
    }

    #[test]
    fn test_blank_name_gets_a_fallback() {
        let attachment = LogAttachment {
            name: "  ".to_string(),
            contents: String::new(),
        };

        assert_eq!(attachment.file_name(), "api-logs.log");
    }

    #[tokio::test]
    async fn test_write_to_creates_directory() {
        let temp = tempfile::tempdir().expect("temp dir");
        let attachment = LogAttachment {
            name: "get tags".to_string(),
            contents: "=== Request Details ===".to_string(),
        };

        let path = attachment
            .write_to(temp.path().join("attachments"))
            .await
            .expect("written");

        assert_eq!(path, temp.path().join("attachments").join("get-tags.log"));
        let written = std::fs::read_to_string(path).expect("readable");
        assert_eq!(written, "=== Request Details ===");
    }
}
