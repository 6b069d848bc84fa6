//! Priority of cameras for a wanted [`CameraType`].

use std::cmp::Ordering;

use crate::{media::FacingMode, platform::MediaStreamTrack};

use super::{is_back_camera_label, Camera, CameraType};

/// Compares two labels the way a human would sort them: case-insensitively
/// first, and only then by their exact characters.
fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Indicates whether none of the provided cameras has a label, meaning that
/// no access permission has been granted yet.
fn all_unlabeled(cameras: &[Camera]) -> bool {
    cameras.iter().all(|c| !c.has_label())
}

/// Returns the main camera of the wanted [`CameraType`].
///
/// Without labels, cameras are assumed to be enumerated from front to back,
/// so the first one is the main front camera and the last one is the main
/// back camera. Otherwise, the camera of the wanted type with the smallest
/// label is picked.
#[must_use]
pub fn get_main_camera_for_type(
    cameras: &[Camera],
    camera_type: CameraType,
) -> Option<Camera> {
    if all_unlabeled(cameras) {
        match camera_type {
            CameraType::Front => cameras.first(),
            CameraType::Back => cameras.last(),
        }
        .cloned()
    } else {
        cameras
            .iter()
            .filter(|c| c.camera_type() == camera_type)
            .min_by(|a, b| compare_labels(&a.label(), &b.label()))
            .cloned()
    }
}

/// Sorts the provided cameras in the order they should be tried for the
/// wanted [`CameraType`].
///
/// Without labels, cameras of the wanted type come first, with back cameras
/// reversed so the last enumerated one (most likely the main one) goes
/// first. Otherwise, cameras of the wanted type come first and ties are
/// ordered by label.
#[must_use]
pub fn sort_cameras_for_camera_type(
    cameras: &[Camera],
    camera_type: CameraType,
) -> Vec<Camera> {
    if all_unlabeled(cameras) {
        let front = cameras
            .iter()
            .filter(|c| c.camera_type() == CameraType::Front)
            .cloned();
        let back = cameras
            .iter()
            .rev()
            .filter(|c| c.camera_type() == CameraType::Back)
            .cloned();
        match camera_type {
            CameraType::Front => front.chain(back).collect(),
            CameraType::Back => back.chain(front).collect(),
        }
    } else {
        let mut sorted = cameras.to_vec();
        sorted.sort_by(|a, b| {
            let (a_type, b_type) = (a.camera_type(), b.camera_type());
            if a_type != b_type {
                if a_type == camera_type {
                    return Ordering::Less;
                } else if b_type == camera_type {
                    return Ordering::Greater;
                }
            }
            compare_labels(&a.label(), &b.label())
        });
        sorted
    }
}

/// Reclassifies the provided cameras basing on an active video track.
///
/// If the track comes from an environment-facing camera, that camera is
/// marked as [`CameraType::Back`] and all the other cameras, not labeled as
/// back ones, as [`CameraType::Front`]. Otherwise, the active camera is marked
/// as [`CameraType::Front`]. Nothing is reclassified without labels.
///
/// Returns the active [`Camera`] only if it's the main camera of the wanted
/// [`CameraType`] or the only one, so no further negotiation is needed.
pub fn adjust_cameras_from_camera_stream(
    track: &dyn MediaStreamTrack,
    cameras: &[Camera],
    camera_type: CameraType,
) -> Option<Camera> {
    let track_device_id = track.device_id();
    let track_label = track.label();
    let active = cameras
        .iter()
        .find(|c| {
            track_device_id.as_deref() == Some(c.device_id().as_str())
                || (c.has_label() && c.label() == track_label)
        })?
        .clone();

    if !all_unlabeled(cameras) {
        let is_back_facing = track.facing_mode()
            == Some(FacingMode::Environment)
            || is_back_camera_label(&track_label);
        if is_back_facing {
            for camera in cameras {
                if camera.device_id() == active.device_id() {
                    camera.set_camera_type(CameraType::Back);
                } else if !is_back_camera_label(&camera.label()) {
                    camera.set_camera_type(CameraType::Front);
                }
            }
        } else {
            active.set_camera_type(CameraType::Front);
        }
    }

    let main = get_main_camera_for_type(cameras, camera_type);
    let is_main = main.map_or(false, |m| m.device_id() == active.device_id());
    (cameras.len() == 1 || is_main).then(|| active)
}
