//! Canonical errors of camera access.
//!
//! Browsers disagree on how they name media errors, so every
//! [`platform::Error`] is normalized into a [`CameraError`] at the single
//! place where it is received from the host.

use std::fmt;

use derive_more::Display;
use serde::Serialize;

use crate::platform;

/// Message some platforms use instead of a proper `OverconstrainedError`
/// name.
const INVALID_CONSTRAINT_MESSAGE: &str = "Invalid constraint";

/// Host capability required for camera access.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrowserFeature {
    /// Device enumeration and media acquisition functions.
    #[display(fmt = "MEDIA_DEVICES")]
    MediaDevices,
}

/// Report of the host capabilities relevant for camera access.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCompatibility {
    /// Whether the host supports everything needed.
    pub full_support: bool,

    /// Capabilities the host lacks.
    pub missing_features: Vec<BrowserFeature>,
}

impl BrowserCompatibility {
    /// Checks the provided [`platform::Features`].
    ///
    /// Both some device enumeration function and `getUserMedia()` are
    /// required for full support.
    #[must_use]
    pub fn check(features: platform::Features) -> Self {
        let supported = features.preferred_enumeration_api().is_some()
            && features.contains(platform::Features::GET_USER_MEDIA);
        if supported {
            Self {
                full_support: true,
                missing_features: Vec::new(),
            }
        } else {
            Self::missing_media_devices()
        }
    }

    /// Report of a host without any usable media devices functions.
    #[must_use]
    pub fn missing_media_devices() -> Self {
        Self {
            full_support: false,
            missing_features: vec![BrowserFeature::MediaDevices],
        }
    }
}

impl fmt::Display for BrowserCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<_> = self
            .missing_features
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(f, "missing features: [{}]", missing.join(", "))
    }
}

/// Canonical error of a camera operation.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum CameraError {
    /// Request was aborted by the host for a reason unrelated to permissions
    /// or hardware availability.
    #[display(fmt = "AbortError: {}", _0)]
    Abort(String),

    /// User or platform denied access to the camera.
    #[display(fmt = "NotAllowedError: {}", _0)]
    NotAllowed(String),

    /// No camera matching the request exists.
    #[display(fmt = "NotFoundError: {}", _0)]
    NotFound(String),

    /// Camera exists but couldn't be started (usually it's busy).
    #[display(fmt = "NotReadableError: {}", _0)]
    NotReadable(String),

    /// Camera access is disabled for the current document.
    #[display(fmt = "SecurityError: {}", _0)]
    Security(String),

    /// Requested constraints can't be satisfied by the camera. Retrying with
    /// coarser constraints may succeed.
    #[display(fmt = "OverconstrainedError: {}", _0)]
    Overconstrained(String),

    /// Host lacks capabilities required for camera access.
    #[display(fmt = "UnsupportedBrowserError: {}", _0)]
    UnsupportedBrowser(BrowserCompatibility),

    /// Error with a name outside of the canonical taxonomy, passed through
    /// unchanged.
    #[display(fmt = "{}: {}", name, message)]
    Other {
        /// Raw error name.
        name: String,

        /// Raw error message.
        message: String,
    },
}

impl CameraError {
    /// Returns the canonical name of this [`CameraError`].
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Abort(_) => "AbortError",
            Self::NotAllowed(_) => "NotAllowedError",
            Self::NotFound(_) => "NotFoundError",
            Self::NotReadable(_) => "NotReadableError",
            Self::Security(_) => "SecurityError",
            Self::Overconstrained(_) => "OverconstrainedError",
            Self::UnsupportedBrowser(_) => "UnsupportedBrowserError",
            Self::Other { name, .. } => name,
        }
    }

    /// Indicates whether this error is resolution-negotiable rather than a
    /// device-level failure.
    #[inline]
    #[must_use]
    pub fn is_overconstrained(&self) -> bool {
        matches!(self, Self::Overconstrained(_))
    }

    /// Indicates whether this error is caused by a host lacking required
    /// capabilities, so no retry can ever succeed.
    #[inline]
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedBrowser(_))
    }
}

impl std::error::Error for CameraError {}

/// Maps a non-standard error name to the canonical one.
///
/// Unknown names are returned unchanged.
#[must_use]
pub fn canonical_name(raw: &str) -> &str {
    match raw {
        "DeviceCaptureError"
        | "NotSupportedError"
        | "ScreenCaptureError"
        | "TabCaptureError"
        | "TypeError" => "AbortError",
        "InvalidStateError"
        | "MediaDeviceFailedDueToShutdown"
        | "MediaDeviceKillSwitchOn"
        | "PermissionDeniedError"
        | "PermissionDismissedError" => "NotAllowedError",
        "DevicesNotFoundError" => "NotFoundError",
        "SourceUnavailableError" | "TrackStartError" => "NotReadableError",
        "ConstraintNotSatisfiedError" => "OverconstrainedError",
        _ => raw,
    }
}

impl From<platform::Error> for CameraError {
    fn from(err: platform::Error) -> Self {
        let name = if err.message() == INVALID_CONSTRAINT_MESSAGE {
            "OverconstrainedError"
        } else {
            canonical_name(err.name())
        };
        let message = err.message().to_owned();
        match name {
            "AbortError" => Self::Abort(message),
            "NotAllowedError" => Self::NotAllowed(message),
            "NotFoundError" => Self::NotFound(message),
            "NotReadableError" => Self::NotReadable(message),
            "SecurityError" => Self::Security(message),
            "OverconstrainedError" => Self::Overconstrained(message),
            "UnsupportedBrowserError" => {
                Self::UnsupportedBrowser(BrowserCompatibility {
                    full_support: false,
                    missing_features: Vec::new(),
                })
            }
            _ => Self::Other {
                name: name.to_owned(),
                message,
            },
        }
    }
}
