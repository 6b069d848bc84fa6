use crate::{
    media::{FacingMode, MediaKind},
    platform,
};

use super::get_property_by_name;

/// Wrapper around [MediaStreamTrack][1] received from a
/// [getUserMedia()][2] request.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#mediastreamtrack
/// [2]: https://w3.org/TR/mediacapture-streams/#dom-mediadevices-getusermedia
#[derive(Clone, Debug)]
pub struct WebMediaStreamTrack {
    sys_track: web_sys::MediaStreamTrack,
    kind: MediaKind,
}

impl From<web_sys::MediaStreamTrack> for WebMediaStreamTrack {
    #[inline]
    fn from(sys_track: web_sys::MediaStreamTrack) -> Self {
        let kind = if sys_track.kind() == "audio" {
            MediaKind::Audio
        } else {
            MediaKind::Video
        };
        Self { sys_track, kind }
    }
}

impl platform::MediaStreamTrack for WebMediaStreamTrack {
    fn id(&self) -> String {
        self.sys_track.id()
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn label(&self) -> String {
        self.sys_track.label()
    }

    fn device_id(&self) -> Option<String> {
        get_property_by_name(&self.sys_track.get_settings(), "deviceId", |v| {
            v.as_string()
        })
    }

    fn facing_mode(&self) -> Option<FacingMode> {
        let facing_mode = get_property_by_name(
            &self.sys_track.get_settings(),
            "facingMode",
            |v| v.as_string(),
        )?;
        let parsed = FacingMode::from_dom_str(&facing_mode);
        if parsed.is_none() {
            log::warn!("Unknown facingMode: {}", facing_mode);
        }
        parsed
    }

    fn stop(&self) {
        self.sys_track.stop();
    }
}
