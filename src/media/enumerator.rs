//! Uniform device enumeration over whichever API the host exposes.

use tracerr::Traced;

use crate::{
    errors::{BrowserCompatibility, CameraError},
    platform::{EnumerationApi, MediaDevices},
};

use super::{InputDeviceInfo, MediaDeviceKind};

/// Lists media devices via the most preferred [`EnumerationApi`] the host
/// supports.
///
/// Legacy [`EnumerationApi::GetSources`] results are narrowed to video
/// sources only, as nothing else can be told apart reliably there.
///
/// # Errors
///
/// With [`CameraError::UnsupportedBrowser`] if the host has no enumeration
/// API at all.
///
/// With a normalized [`CameraError`] if the enumeration itself fails.
pub async fn list_devices(
    media_devices: &dyn MediaDevices,
) -> Result<Vec<InputDeviceInfo>, Traced<CameraError>> {
    let api = media_devices
        .features()
        .preferred_enumeration_api()
        .ok_or_else(|| {
            tracerr::new!(CameraError::UnsupportedBrowser(
                BrowserCompatibility::missing_media_devices()
            ))
        })?;

    let devices = media_devices
        .enumerate_devices(api)
        .await
        .map_err(tracerr::map_from_and_wrap!(=> CameraError))?
        .into_iter()
        .map(InputDeviceInfo::from);

    Ok(if api == EnumerationApi::GetSources {
        devices
            .filter(|d| d.kind == MediaDeviceKind::VideoInput)
            .collect()
    } else {
        devices.collect()
    })
}
