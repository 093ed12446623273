//! Settings document persistence error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum StateError {
    #[error("failed to read settings document {document}: {message}")]
    ReadFailed { document: String, message: String },

    #[error("settings document {document} is malformed: {message}")]
    ParseFailed { document: String, message: String },

    #[error("failed to write settings document {document}: {message}")]
    WriteFailed { document: String, message: String },
}

impl UserFacingError for StateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ReadFailed { .. } | Self::WriteFailed { .. } => {
                Some("Check permissions on the extup state directory.")
            }
            Self::ParseFailed { .. } => {
                Some("The document is not valid JSON; fix or delete it and re-run `extup init`.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ReadFailed { .. } => "state.read_failed",
            Self::ParseFailed { .. } => "state.parse_failed",
            Self::WriteFailed { .. } => "state.write_failed",
        };
        Some(code)
    }
}
