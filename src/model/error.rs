//! Model dispatch errors.

use crate::collab::CollaboratorError;
use crate::model::family::ModelFamily;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unsupported model id: {model_id}")]
    UnsupportedModel { model_id: String },

    #[error("No adapter registered for model family {family}")]
    FamilyNotRegistered { family: ModelFamily },

    #[error("{family} response missing {what}")]
    MissingContent {
        family: ModelFamily,
        what: &'static str,
    },

    #[error("Failed to encode {family} request: {source}")]
    RequestEncoding {
        family: ModelFamily,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Provider(#[from] CollaboratorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_display() {
        let error = DispatchError::UnsupportedModel {
            model_id: "meta.llama3-8b-instruct-v1:0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported model id: meta.llama3-8b-instruct-v1:0"
        );
    }

    #[test]
    fn test_missing_content_display_names_family() {
        let error = DispatchError::MissingContent {
            family: ModelFamily::Nova,
            what: "text",
        };
        assert_eq!(error.to_string(), "nova response missing text");
    }

    #[test]
    fn test_provider_errors_pass_through_unchanged() {
        let inner = CollaboratorError::Model {
            message: "throttled".to_string(),
        };
        let expected = inner.to_string();
        let error: DispatchError = inner.into();
        assert_eq!(error.to_string(), expected);
    }
}
