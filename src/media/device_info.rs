//! [MediaDeviceInfo][1] related objects.
//!
//! [1]: https://w3.org/TR/mediacapture-streams/#device-info

use derive_more::Display;
use serde::Serialize;

use crate::platform;

/// Media exchange kind of a track.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum MediaKind {
    /// Audio track.
    #[display(fmt = "audio")]
    Audio,

    /// Video track.
    #[display(fmt = "video")]
    Video,
}

/// Kind of a media device, as defined by [MediaDeviceKind][1].
///
/// [1]: https://w3.org/TR/mediacapture-streams/#dom-mediadevicekind
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaDeviceKind {
    /// Audio input device (a microphone).
    AudioInput,

    /// Audio output device (a speaker).
    AudioOutput,

    /// Video input device (a camera).
    VideoInput,

    /// Anything this crate doesn't know about.
    #[serde(skip)]
    Unknown(String),
}

impl MediaDeviceKind {
    /// Parses a [`MediaDeviceKind`] from the raw host string.
    ///
    /// Legacy `getSources()` implementations report `audio`/`video`, which
    /// are accepted as input kinds too.
    #[must_use]
    pub fn parse(kind: &str) -> Self {
        match kind.to_lowercase().as_str() {
            "videoinput" | "video" => Self::VideoInput,
            "audioinput" | "audio" => Self::AudioInput,
            "audiooutput" => Self::AudioOutput,
            _ => Self::Unknown(kind.to_owned()),
        }
    }
}

/// Normalized representation of a [MediaDeviceInfo][1].
///
/// [1]: https://w3.org/TR/mediacapture-streams/#device-info
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDeviceInfo {
    /// Unique identifier of the represented device. May be empty and may
    /// change between permission grants.
    pub device_id: String,

    /// Label describing the represented device (for example "External USB
    /// Webcam"). Empty until a media access permission is granted.
    pub label: String,

    /// Group identifier of the represented device.
    pub group_id: String,

    /// Kind of the represented device.
    pub kind: MediaDeviceKind,
}

impl InputDeviceInfo {
    /// Indicates whether the represented device is a camera.
    #[inline]
    #[must_use]
    pub fn is_video_input(&self) -> bool {
        self.kind == MediaDeviceKind::VideoInput
    }
}

impl From<platform::MediaDeviceInfo> for InputDeviceInfo {
    fn from(info: platform::MediaDeviceInfo) -> Self {
        Self {
            device_id: info.device_id.unwrap_or_default(),
            label: info.label.unwrap_or_default(),
            group_id: info.group_id,
            kind: MediaDeviceKind::parse(&info.kind),
        }
    }
}
