//! Host environment capabilities consumed by this crate.
//!
//! Everything that touches the actual [Media Capture and Streams API][1]
//! lives behind the [`MediaDevices`] and [`MediaStreamTrack`] traits, so the
//! negotiation logic stays platform agnostic. Browser adapters live in the
//! `wasm` submodule.
//!
//! [1]: https://w3.org/TR/mediacapture-streams

#[cfg(target_arch = "wasm32")]
mod wasm;

use std::{rc::Rc, time::Duration};

use async_trait::async_trait;
use bitflags::bitflags;
use derive_more::Display;
use tracerr::Traced;

use crate::media::{FacingMode, MediaKind, MediaStreamConstraints};

#[cfg(target_arch = "wasm32")]
pub use self::wasm::{
    init_logger, set_panic_hook, WebMediaDevices, WebMediaStreamTrack,
};

bitflags! {
    /// Device-related capabilities exposed by the host environment.
    pub struct Features: u8 {
        /// Non-namespaced `navigator.enumerateDevices()`.
        const ENUMERATE_DEVICES = 0b0001;

        /// [MediaDevices.enumerateDevices()][1].
        ///
        /// [1]: https://tinyurl.com/w3-streams#dom-mediadevices-enumeratedevices
        const MEDIA_DEVICES_ENUMERATE_DEVICES = 0b0010;

        /// Legacy `MediaStreamTrack.getSources()`.
        const GET_SOURCES = 0b0100;

        /// [MediaDevices.getUserMedia()][1].
        ///
        /// [1]: https://w3.org/TR/mediacapture-streams#dom-mediadevices-getusermedia
        const GET_USER_MEDIA = 0b1000;
    }
}

impl Features {
    /// Returns the most preferred [`EnumerationApi`] available, if any.
    #[must_use]
    pub fn preferred_enumeration_api(self) -> Option<EnumerationApi> {
        if self.contains(Self::ENUMERATE_DEVICES) {
            Some(EnumerationApi::EnumerateDevices)
        } else if self.contains(Self::MEDIA_DEVICES_ENUMERATE_DEVICES) {
            Some(EnumerationApi::MediaDevicesEnumerateDevices)
        } else if self.contains(Self::GET_SOURCES) {
            Some(EnumerationApi::GetSources)
        } else {
            None
        }
    }
}

/// Concrete host function used to enumerate devices.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum EnumerationApi {
    /// `navigator.enumerateDevices()`.
    #[display(fmt = "navigator.enumerateDevices()")]
    EnumerateDevices,

    /// `navigator.mediaDevices.enumerateDevices()`.
    #[display(fmt = "navigator.mediaDevices.enumerateDevices()")]
    MediaDevicesEnumerateDevices,

    /// `MediaStreamTrack.getSources()`.
    #[display(fmt = "MediaStreamTrack.getSources()")]
    GetSources,
}

/// Error raised by the host environment.
///
/// Mirrors a JS `DOMException` which is only loosely typed: both the `name`
/// and the `message` are arbitrary strings, depending on the browser.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display(fmt = "{}: {}", name, message)]
pub struct Error {
    name: String,
    message: String,
}

impl Error {
    /// Creates a new [`Error`] with the provided `name` and `message`.
    #[inline]
    pub fn new<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the raw name of this [`Error`].
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw message of this [`Error`].
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Raw representation of a [MediaDeviceInfo][1] as returned by one of the
/// [`EnumerationApi`]s, before any normalization.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#device-info
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MediaDeviceInfo {
    /// `deviceId`, absent on some legacy implementations.
    pub device_id: Option<String>,

    /// `kind` as reported by the host (`videoinput`, `video`, ...).
    pub kind: String,

    /// `label`, absent on some legacy implementations.
    pub label: Option<String>,

    /// `groupId`.
    pub group_id: String,
}

/// Wrapper around a [MediaStreamTrack][1] received from a
/// [getUserMedia()][2] request.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#mediastreamtrack
/// [2]: https://w3.org/TR/mediacapture-streams#dom-mediadevices-getusermedia
#[cfg_attr(any(test, feature = "mockable"), mockall::automock)]
pub trait MediaStreamTrack {
    /// Returns [`id`][1] of the underlying track.
    ///
    /// [1]: https://w3.org/TR/mediacapture-streams/#dom-mediastreamtrack-id
    fn id(&self) -> String;

    /// Returns the kind (audio/video) of this track.
    fn kind(&self) -> MediaKind;

    /// Returns [`label`][1] of the underlying track.
    ///
    /// [1]: https://w3.org/TR/mediacapture-streams/#dom-mediastreamtrack-label
    fn label(&self) -> String;

    /// Returns [`deviceId`][1] setting of the underlying track, if the host
    /// supports [getSettings()][2].
    ///
    /// [1]: https://tinyurl.com/w3-streams/#dom-mediatracksettings-deviceid
    /// [2]: https://tinyurl.com/w3-streams/#dom-mediastreamtrack-getsettings
    fn device_id(&self) -> Option<String>;

    /// Returns [`facingMode`][1] setting of the underlying track.
    ///
    /// [1]: https://tinyurl.com/w3-streams/#dom-mediatracksettings-facingmode
    fn facing_mode(&self) -> Option<FacingMode>;

    /// Stops the underlying track, releasing its source.
    fn stop(&self);
}

/// Media-device capabilities of the host environment.
///
/// All the methods are invoked sequentially: implementations never see two
/// concurrent requests from the same [`CameraAccess`].
///
/// [`CameraAccess`]: crate::CameraAccess
#[async_trait(?Send)]
pub trait MediaDevices {
    /// Reports which device-related capabilities this host has.
    fn features(&self) -> Features;

    /// Collects information about the available media devices via the
    /// provided [`EnumerationApi`].
    ///
    /// # Errors
    ///
    /// With [`Error`] if the host call fails.
    async fn enumerate_devices(
        &self,
        api: EnumerationApi,
    ) -> Result<Vec<MediaDeviceInfo>, Traced<Error>>;

    /// Prompts for a media input permission, returning the acquired tracks.
    ///
    /// # Errors
    ///
    /// With [`Error`] if the host rejects the request.
    async fn get_user_media(
        &self,
        constraints: MediaStreamConstraints,
    ) -> Result<Vec<Rc<dyn MediaStreamTrack>>, Traced<Error>>;

    /// Suspends the calling task until the next host macrotask, but not
    /// earlier than the provided `delay`.
    async fn delay_for(&self, delay: Duration);
}
