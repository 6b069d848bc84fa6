//! [MediaDevices][1] functionality.
//!
//! [1]: https://w3.org/TR/mediacapture-streams#mediadevices

use std::{convert::TryFrom as _, rc::Rc, time::Duration};

use async_trait::async_trait;
use js_sys::{Array, Promise};
use tracerr::Traced;
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{
    media::MediaStreamConstraints,
    platform::{
        self, EnumerationApi, Error, Features, MediaDeviceInfo,
        MediaStreamTrack,
    },
};

use super::{get_function, get_property_by_name, WebMediaStreamTrack};

/// [`platform::MediaDevices`] of the current browser window.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebMediaDevices;

impl WebMediaDevices {
    /// Creates new [`WebMediaDevices`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns the current [Window][1].
///
/// [1]: https://developer.mozilla.org/docs/Web/API/Window
fn window() -> Result<web_sys::Window, Traced<Error>> {
    web_sys::window().ok_or_else(|| {
        tracerr::new!(Error::new("NotSupportedError", "no window object"))
    })
}

/// Returns the [MediaDevices][1] of the current window.
///
/// [1]: https://w3.org/TR/mediacapture-streams#mediadevices
fn media_devices() -> Result<web_sys::MediaDevices, Traced<Error>> {
    window()?
        .navigator()
        .media_devices()
        .map_err(Error::from)
        .map_err(tracerr::wrap!())
}

/// Converts a raw device description object into a [`MediaDeviceInfo`].
///
/// Legacy `SourceInfo` objects name their identifier `id` rather than
/// `deviceId`.
fn parse_device_info(info: &JsValue) -> MediaDeviceInfo {
    let string = |name| get_property_by_name(info, name, |v| v.as_string());
    MediaDeviceInfo {
        device_id: string("deviceId").or_else(|| string("id")),
        kind: string("kind").unwrap_or_default(),
        label: string("label"),
        group_id: string("groupId").unwrap_or_default(),
    }
}

/// Awaits the provided [`Promise`] resolving into an array of device
/// descriptions.
async fn await_devices(
    promise: Promise,
) -> Result<Vec<MediaDeviceInfo>, Traced<Error>> {
    let devices = JsFuture::from(promise)
        .await
        .map_err(Error::from)
        .map_err(tracerr::wrap!())?;
    Ok(Array::from(&devices)
        .iter()
        .map(|info| parse_device_info(&info))
        .collect())
}

#[async_trait(?Send)]
impl platform::MediaDevices for WebMediaDevices {
    fn features(&self) -> Features {
        let mut features = Features::empty();
        let window = match window() {
            Ok(w) => w,
            Err(_) => return features,
        };
        let navigator = window.navigator();

        if get_function(&navigator, "enumerateDevices").is_some() {
            features |= Features::ENUMERATE_DEVICES;
        }
        if let Some(devices) =
            get_property_by_name(&navigator, "mediaDevices", |v| {
                (!v.is_undefined() && !v.is_null()).then(|| v)
            })
        {
            if get_function(&devices, "enumerateDevices").is_some() {
                features |= Features::MEDIA_DEVICES_ENUMERATE_DEVICES;
            }
            if get_function(&devices, "getUserMedia").is_some() {
                features |= Features::GET_USER_MEDIA;
            }
        }
        if get_property_by_name(&window, "MediaStreamTrack", Some)
            .and_then(|track| get_function(&track, "getSources"))
            .is_some()
        {
            features |= Features::GET_SOURCES;
        }

        features
    }

    async fn enumerate_devices(
        &self,
        api: EnumerationApi,
    ) -> Result<Vec<MediaDeviceInfo>, Traced<Error>> {
        let unsupported = || {
            tracerr::new!(Error::new(
                "NotSupportedError",
                format!("{} is not available", api),
            ))
        };

        let promise = match api {
            EnumerationApi::EnumerateDevices => {
                let navigator = window()?.navigator();
                get_function(&navigator, "enumerateDevices")
                    .ok_or_else(unsupported)?
                    .call0(&navigator)
                    .map_err(Error::from)
                    .map_err(tracerr::wrap!())?
                    .unchecked_into::<Promise>()
            }
            EnumerationApi::MediaDevicesEnumerateDevices => media_devices()?
                .enumerate_devices()
                .map_err(Error::from)
                .map_err(tracerr::wrap!())?,
            EnumerationApi::GetSources => {
                let track_class = get_property_by_name(
                    &window()?,
                    "MediaStreamTrack",
                    Some,
                )
                .ok_or_else(unsupported)?;
                let get_sources = get_function(&track_class, "getSources")
                    .ok_or_else(unsupported)?;
                Promise::new(&mut |resolve, reject| {
                    if let Err(e) = get_sources.call1(&track_class, &resolve) {
                        let _ = reject.call1(&JsValue::NULL, &e);
                    }
                })
            }
        };

        await_devices(promise).await.map_err(tracerr::wrap!())
    }

    async fn get_user_media(
        &self,
        constraints: MediaStreamConstraints,
    ) -> Result<Vec<Rc<dyn MediaStreamTrack>>, Traced<Error>> {
        let constraints = serde_json::to_string(&constraints)
            .map_err(|e| Error::new("TypeError", e.to_string()))
            .map_err(tracerr::wrap!())?;
        let constraints = js_sys::JSON::parse(&constraints)
            .map_err(Error::from)
            .map_err(tracerr::wrap!())?
            .unchecked_into::<web_sys::MediaStreamConstraints>();

        let stream = JsFuture::from(
            media_devices()?
                .get_user_media_with_constraints(&constraints)
                .map_err(Error::from)
                .map_err(tracerr::wrap!())?,
        )
        .await
        .map(web_sys::MediaStream::from)
        .map_err(Error::from)
        .map_err(tracerr::wrap!())?;

        Ok(stream
            .get_tracks()
            .iter()
            .map(|track| {
                Rc::new(WebMediaStreamTrack::from(
                    track.unchecked_into::<web_sys::MediaStreamTrack>(),
                )) as Rc<dyn MediaStreamTrack>
            })
            .collect())
    }

    async fn delay_for(&self, delay: Duration) {
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let window = match window() {
            Ok(w) => w,
            Err(_) => return,
        };
        let _ = JsFuture::from(Promise::new(&mut |resolve, _| {
            let scheduled = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve, delay_ms,
                );
            if scheduled.is_err() {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }))
        .await;
    }
}
