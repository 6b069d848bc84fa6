//! Facing direction heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::media::InputDeviceInfo;

use super::{Camera, CameraType, DeviceRegistry, InaccessibleDevices};

/// Localized words meaning "back"/"rear" met in camera labels.
///
/// Covers English, German, French, Spanish, Portuguese (both Brazilian and
/// European), Italian, Chinese (both simplified and traditional), Japanese,
/// Russian, Arabic, Korean, Turkish, Dutch, Thai, Swedish, Danish,
/// Vietnamese, Norwegian, Polish, Finnish, Indonesian, Hebrew, Greek,
/// Romanian, Hungarian, Czech, Catalan, Slovak, Ukrainian, Croatian, Malay
/// and Hindi.
const BACK_CAMERA_KEYWORDS: &[&str] = &[
    "rear",
    "back",
    "rück",
    "arrière",
    "trasera",
    "trás",
    "traseira",
    "posteriore",
    "后面",
    "後面",
    "背面",
    "后置",
    "後置",
    "背置",
    "задней",
    "الخلفية",
    "후",
    "arka",
    "achterzijde",
    "หลัง",
    "baksidan",
    "bagside",
    "sau",
    "bak",
    "tylny",
    "takakamera",
    "belakang",
    "אחורית",
    "πίσω",
    "spate",
    "hátsó",
    "zadní",
    "darrere",
    "zadná",
    "задня",
    "stražnja",
    "बैक",
];

/// Infrared sensors, which often fail to open and are useless for scanning.
static INFRARED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)(?:ir|infrared)(?-u:\b)").unwrap()
});

/// Megapixel count embedded into a label, like `"12MP"`.
///
/// Word boundaries are ASCII ones, so adjacent non-Latin letters don't hide
/// a match.
static RESOLUTION_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)([0-9]+)MP?(?-u:\b)").unwrap()
});

/// Indicates whether the provided label mentions a back-facing camera in any
/// of the supported languages.
#[must_use]
pub fn is_back_camera_label(label: &str) -> bool {
    let label = label.to_lowercase();
    BACK_CAMERA_KEYWORDS.iter().any(|kw| label.contains(kw))
}

/// Indicates whether the provided label denotes an infrared camera.
#[inline]
#[must_use]
pub fn is_infrared_camera_label(label: &str) -> bool {
    INFRARED_LABEL.is_match(label)
}

/// Extracts a megapixel resolution hint from the provided label.
#[must_use]
pub fn resolution_hint(label: &str) -> Option<u64> {
    RESOLUTION_HINT
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Guesses [`CameraType`] of a camera by its position in the unlabeled
/// `videoinput` list of `total` devices.
///
/// The first half is assumed to face the user. An odd count leans towards
/// back cameras, as devices usually have more of them.
#[inline]
#[must_use]
pub fn positional_camera_type(index: usize, total: usize) -> CameraType {
    if total == 1 || (index + 1) * 2 <= total {
        CameraType::Front
    } else {
        CameraType::Back
    }
}

/// Classifies the `videoinput` devices of the provided enumeration result,
/// registers them, and returns the ones that may be accessed.
///
/// Cameras already known by the [`DeviceRegistry`] are reused as is, keeping
/// their identity and previous classification. Infrared cameras (if
/// `filter_infrared` is set) and [`InaccessibleDevices`] are left out.
///
/// If more than one camera remains and none of them is a back one, one of
/// them is promoted to [`CameraType::Back`]: the highest megapixel one if
/// every label carries a hint, or the last one otherwise.
pub fn classify(
    devices: &[InputDeviceInfo],
    registry: &mut DeviceRegistry,
    inaccessible: &InaccessibleDevices,
    filter_infrared: bool,
) -> Vec<Camera> {
    let video_devices: Vec<_> =
        devices.iter().filter(|d| d.is_video_input()).collect();
    let all_unlabeled = video_devices
        .iter()
        .all(|d| d.label.is_empty() && !registry.contains(&d.device_id));

    let cameras: Vec<_> = video_devices
        .iter()
        .enumerate()
        .map(|(i, device)| {
            if let Some(camera) = registry.get(&device.device_id) {
                return camera;
            }
            let camera_type = if all_unlabeled {
                positional_camera_type(i, video_devices.len())
            } else if is_back_camera_label(&device.label) {
                CameraType::Back
            } else {
                CameraType::Front
            };
            Camera::new(
                device.device_id.clone(),
                device.label.clone(),
                camera_type,
            )
        })
        .collect();
    for camera in &cameras {
        registry.insert(camera.clone());
    }

    let cameras: Vec<_> = cameras
        .into_iter()
        .filter(|c| {
            !(filter_infrared && is_infrared_camera_label(&c.label()))
        })
        .filter(|c| !inaccessible.contains(&c.device_id()))
        .collect();

    if cameras.len() > 1
        && !cameras.iter().any(|c| c.camera_type() == CameraType::Back)
    {
        let hints: Option<Vec<_>> =
            cameras.iter().map(|c| resolution_hint(&c.label())).collect();
        let back_idx = hints
            .and_then(|hints| {
                let max = hints.iter().copied().max()?;
                hints.iter().rposition(|h| *h == max)
            })
            .unwrap_or(cameras.len() - 1);
        cameras[back_idx].set_camera_type(CameraType::Back);
    }

    cameras
}
