//! Orchestration-level error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OpsError {
    #[error("failed to serialize result: {message}")]
    SerializationError { message: String },

    #[error("override list {path} is unreadable: {message}")]
    OverrideListUnreadable { path: String, message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OverrideListUnreadable { .. } => {
                Some("Fix or delete the override file; one package name per line.")
            }
            Self::SerializationError { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SerializationError { .. } => "ops.serialization_error",
            Self::OverrideListUnreadable { .. } => "ops.override_list_unreadable",
        };
        Some(code)
    }
}
