//! Package host primitive error types
//!
//! Failures of the disable/install/remove primitives are fatal to the
//! current bootstrap run: no partial progress is committed and the run is
//! safely re-triggerable from scratch on the next invocation.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum HostError {
    #[error("failed to disable package {package}: {message}")]
    DisableFailed { package: String, message: String },

    #[error("failed to re-enable package {package}: {message}")]
    ReenableFailed { package: String, message: String },

    #[error("failed to install package {package}: {message}")]
    InstallFailed { package: String, message: String },

    #[error("failed to remove package {package}: {message}")]
    RemoveFailed { package: String, message: String },

    #[error("package {package} not present in channel {path}")]
    ChannelPackageMissing { package: String, path: String },
}

impl UserFacingError for HostError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ChannelPackageMissing { .. } => {
                Some("Sync the channel directory or drop the package from the override list.")
            }
            _ => Some("The run made no commit; it is safe to re-run `extup run`."),
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::ChannelPackageMissing { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DisableFailed { .. } => "host.disable_failed",
            Self::ReenableFailed { .. } => "host.reenable_failed",
            Self::InstallFailed { .. } => "host.install_failed",
            Self::RemoveFailed { .. } => "host.remove_failed",
            Self::ChannelPackageMissing { .. } => "host.channel_package_missing",
        };
        Some(code)
    }
}
