//! Collection import
//!
//! Converts Postman and Insomnia exports, and entities exported by this
//! application, into folders, settings and environments of a collection.
//! [`ApiImporter`] converts and then persists the result.

mod insomnia;
mod native;
mod postman;
mod query;

use serde_json::Value;

use courier_application::Repositories;
use courier_application::ports::BackendError;
use courier_application::use_cases::{ImportApi, ImportApiOutput};
use courier_domain::{DomainError, ImportCategory, ImportData};

pub use query::{sniff_content_type, split_uri};

/// Errors that can occur during import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The input is not JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The JSON does not have the shape of the selected format.
    #[error("invalid import format: {0}")]
    InvalidFormat(String),

    /// An entity could not be built, or the category is unsupported.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persisting the converted entities failed.
    #[error(transparent)]
    Storage(#[from] BackendError),
}

/// Converts `text` of the given format into entities of `collection`.
///
/// Nothing is returned for a malformed input; conversion either fully
/// succeeds or fails.
///
/// # Errors
///
/// Returns an error if the text is not JSON or does not match the format.
pub fn convert(
    category: ImportCategory,
    collection: &str,
    text: &str,
) -> Result<ImportData, ImportError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let data = match category {
        ImportCategory::Postman => postman::convert(&root, collection)?,
        ImportCategory::Insomnia => insomnia::convert(&root, collection)?,
        ImportCategory::File | ImportCategory::Text => native::convert(root, collection)?,
    };
    tracing::debug!(
        %category,
        folders = data.folders.len(),
        settings = data.settings.len(),
        environments = data.environments.len(),
        "converted import"
    );
    Ok(data)
}

/// Converts an export and persists it.
pub struct ApiImporter {
    persist: ImportApi,
}

impl ApiImporter {
    /// Creates an importer writing through `repos`.
    #[must_use]
    pub fn new(repos: &Repositories) -> Self {
        Self {
            persist: ImportApi::new(repos),
        }
    }

    /// Imports `text` into `collection`.
    ///
    /// `category` is the format's wire name (`postMan`, `insomnia`, `file`
    /// or `text`). Folders are written before settings.
    ///
    /// # Errors
    ///
    /// - Returns `"<category> is not supported"` for an unknown category
    /// - Returns error if the text cannot be converted
    /// - Returns the first storage error
    pub async fn import(
        &self,
        category: &str,
        collection: &str,
        text: &str,
    ) -> Result<ImportApiOutput, ImportError> {
        let category: ImportCategory = category.parse()?;
        let data = convert(category, collection, text)?;
        tracing::info!(%category, collection, "importing");
        Ok(self.persist.execute(data).await?)
    }
}

impl std::fmt::Debug for ApiImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiImporter").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_json() {
        let err = convert(ImportCategory::Postman, "c1", "{").unwrap_err();
        assert!(matches!(err, ImportError::InvalidJson(_)));
    }

    #[test]
    fn test_text_and_file_share_a_converter() {
        let text = r#"{"id": "f1", "name": "folder"}"#;
        let from_text = convert(ImportCategory::Text, "c1", text).unwrap();
        let from_file = convert(ImportCategory::File, "c1", text).unwrap();
        assert_eq!(from_text.folders[0].id, from_file.folders[0].id);
    }
}
