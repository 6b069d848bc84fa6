use medea_camera::{
    conf,
    media::{DeviceVideoTrackConstraints, FacingMode},
    platform::{self, Features, MediaDeviceInfo},
    BrowserCompatibility, CameraError, CameraType,
};

use crate::host::{access, access_with, FakeCamera, FakeMediaDevices};

fn types(cameras: &[medea_camera::Camera]) -> Vec<CameraType> {
    cameras.iter().map(medea_camera::Camera::camera_type).collect()
}

#[tokio::test]
async fn reveals_labels_with_throwaway_stream() {
    let host = FakeMediaDevices::phone();
    let access = access(&host);

    let cameras = access.get_cameras(false).await.unwrap();

    assert_eq!(host.requests().len(), 1);
    assert!(!host.requests()[0].audio);
    assert_eq!(host.requests()[0].video, DeviceVideoTrackConstraints::new());
    assert!(host.tracks().iter().all(|t| t.is_stopped()));
    assert_eq!(host.enumerations(), 2);

    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].label(), "Front Camera");
    assert_eq!(types(&cameras), vec![CameraType::Front, CameraType::Back]);
}

#[tokio::test]
async fn skips_throwaway_stream_when_labels_are_known() {
    let host = FakeMediaDevices::phone();
    host.grant();
    let access = access(&host);

    let cameras = access.get_cameras(false).await.unwrap();

    assert!(host.requests().is_empty());
    assert_eq!(host.enumerations(), 1);
    assert_eq!(types(&cameras), vec![CameraType::Front, CameraType::Back]);
}

#[tokio::test]
async fn skips_throwaway_stream_when_disabled() {
    let host = FakeMediaDevices::phone();
    let access = access_with(
        &host,
        conf::Camera {
            unlock_labels: false,
            ..conf::Camera::default()
        },
    );

    let cameras = access.get_cameras(false).await.unwrap();

    assert!(host.requests().is_empty());
    assert!(cameras.iter().all(|c| !c.has_label()));
}

#[tokio::test]
async fn falls_back_to_positions_when_permission_is_denied() {
    let host = FakeMediaDevices::new(vec![
        FakeCamera::new("a", "Camera A", None),
        FakeCamera::new("b", "Camera B", None),
        FakeCamera::new("c", "Camera C", None),
    ]);
    host.fail_next("NotAllowedError", "Permission denied");
    let access = access(&host);

    let cameras = access.get_cameras(false).await.unwrap();

    assert_eq!(host.requests().len(), 1);
    assert!(cameras.iter().all(|c| !c.has_label()));
    assert_eq!(
        types(&cameras),
        vec![CameraType::Front, CameraType::Back, CameraType::Back],
    );
}

#[tokio::test]
async fn is_idempotent_without_refresh() {
    let host = FakeMediaDevices::phone();
    let access = access(&host);

    let first = access.get_cameras(false).await.unwrap();
    let second = access.get_cameras(false).await.unwrap();

    assert_eq!(first, second);
    assert!(first[0].ptr_eq(&second[0]));
    assert_eq!(host.enumerations(), 2);
    assert_eq!(host.requests().len(), 1);
}

#[tokio::test]
async fn returns_independent_vecs() {
    let host = FakeMediaDevices::phone();
    let access = access(&host);

    let mut first = access.get_cameras(false).await.unwrap();
    first.clear();
    let second = access.get_cameras(false).await.unwrap();

    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn ignores_non_video_devices() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.add_device(MediaDeviceInfo {
        device_id: Some("mic".to_owned()),
        kind: "audioinput".to_owned(),
        label: Some("Microphone".to_owned()),
        group_id: String::new(),
    });
    let access = access(&host);

    let cameras = access.get_cameras(false).await.unwrap();

    assert_eq!(cameras.len(), 2);
    assert!(access.registered_camera("mic").is_none());
}

#[tokio::test]
async fn filters_infrared_cameras() {
    let host = FakeMediaDevices::new(vec![
        FakeCamera::new("rgb", "Integrated Camera", Some(FacingMode::User)),
        FakeCamera::new("ir", "Integrated IR Camera", None),
    ]);
    host.grant();

    let cameras = access(&host).get_cameras(false).await.unwrap();
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].device_id(), "rgb");

    let unfiltered = access_with(
        &host,
        conf::Camera {
            filter_infrared: false,
            ..conf::Camera::default()
        },
    )
    .get_cameras(false)
    .await
    .unwrap();
    assert_eq!(unfiltered.len(), 2);
}

#[tokio::test]
async fn reconciles_drifted_device_ids_on_refresh() {
    let host = FakeMediaDevices::phone();
    let access = access(&host);
    let before = access.get_cameras(false).await.unwrap();
    access.mark_camera_as_inaccessible(&before[0]);

    host.rename_all(|id| format!("{}-new", id));
    let after = access.get_cameras(true).await.unwrap();

    assert_eq!(after.len(), 1);
    assert!(after[0].ptr_eq(&before[1]));
    assert_eq!(before[1].device_id(), "back-new");
    assert_eq!(before[0].device_id(), "front-new");
    assert!(access.is_camera_inaccessible(&before[0]));
    assert!(access
        .registered_camera("back-new")
        .unwrap()
        .ptr_eq(&before[1]));
    assert!(access.registered_camera("back").is_none());
}

#[tokio::test]
async fn uses_cache_until_refresh() {
    let host = FakeMediaDevices::phone();
    host.grant();
    let access = access(&host);
    let _ = access.get_cameras(false).await.unwrap();

    host.rename_all(|id| format!("{}-new", id));
    let cached = access.get_cameras(false).await.unwrap();
    assert_eq!(cached[0].device_id(), "front");

    let refreshed = access.get_cameras(true).await.unwrap();
    assert_eq!(refreshed[0].device_id(), "front-new");
    assert!(refreshed[0].ptr_eq(&cached[0]));
}

#[tokio::test]
async fn reset_forgets_everything() {
    let host = FakeMediaDevices::phone();
    host.grant();
    let access = access(&host);
    let before = access.get_cameras(false).await.unwrap();
    access.mark_camera_as_inaccessible(&before[1]);

    access.reset();

    assert!(access.registered_camera("front").is_none());
    assert!(!access.is_camera_inaccessible(&before[1]));
    let after = access.get_cameras(false).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(!after[0].ptr_eq(&before[0]));
    assert_eq!(host.enumerations(), 2);
}

#[tokio::test]
async fn fails_on_unsupported_host() {
    let host = FakeMediaDevices::phone();
    host.set_features(Features::MEDIA_DEVICES_ENUMERATE_DEVICES);

    let err = access(&host).get_cameras(false).await.unwrap_err();

    assert_eq!(
        err.into_inner(),
        CameraError::UnsupportedBrowser(
            BrowserCompatibility::missing_media_devices()
        ),
    );
    assert_eq!(host.enumerations(), 0);
}

#[tokio::test]
async fn normalizes_enumeration_errors() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.fail_enumeration("SecurityError", "insecure");
    let access = access(&host);

    let err = access.get_cameras(false).await.unwrap_err();
    assert_eq!(err.into_inner(), CameraError::Security("insecure".to_owned()));

    let again = access.get_cameras(false).await.unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(host.enumerations(), 2);
}

#[tokio::test]
async fn stops_throwaway_stream_when_enumeration_fails() {
    let host = FakeMediaDevices::phone();
    host.script_enumerations(vec![
        None,
        Some(platform::Error::new("AbortError", "enumeration aborted")),
    ]);
    let access = access(&host);

    let err = access.get_cameras(false).await.unwrap_err();

    assert_eq!(
        err.into_inner(),
        CameraError::Abort("enumeration aborted".to_owned()),
    );
    assert_eq!(host.requests().len(), 1);
    assert_eq!(host.tracks().len(), 1);
    assert!(host.tracks().iter().all(|t| t.is_stopped()));
}

#[tokio::test]
async fn keeps_identities_across_failed_refresh() {
    let host = FakeMediaDevices::phone();
    let access = access(&host);
    let before = access.get_cameras(false).await.unwrap();

    host.fail_enumeration("AbortError", "enumeration aborted");
    assert!(access.get_cameras(true).await.is_err());

    host.rename_all(|id| format!("{}-new", id));
    let after = access.get_cameras(true).await.unwrap();

    assert_eq!(after.len(), 2);
    assert!(after[0].ptr_eq(&before[0]));
    assert!(after[1].ptr_eq(&before[1]));
    assert_eq!(before[0].device_id(), "front-new");
    assert!(access.registered_camera("front").is_none());
    assert!(access.registered_camera("back").is_none());
}
