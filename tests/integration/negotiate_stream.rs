use medea_camera::{
    media::FacingMode,
    platform::{self, Features},
    CameraError, CameraType, ResolutionFallbackLevel,
};

use crate::host::{access, FakeCamera, FakeMediaDevices};

fn overconstrained() -> Option<platform::Error> {
    Some(platform::Error::new("OverconstrainedError", "width"))
}

#[tokio::test]
async fn falls_back_through_resolutions() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.script(vec![overconstrained(), overconstrained(), None]);
    let access = access(&host);

    let negotiated = access.negotiate_stream(CameraType::Back).await.unwrap();

    assert_eq!(negotiated.level, ResolutionFallbackLevel::Hd);
    assert_eq!(negotiated.camera.device_id(), "back");
    assert_eq!(negotiated.camera.camera_type(), CameraType::Back);
    assert!(negotiated.is_main);
    assert_eq!(
        host.requested_device_ids(),
        vec![Some("back".to_owned()); 3],
    );
    let widths: Vec<_> = host
        .requests()
        .iter()
        .map(|r| r.video.width.map(|w| w.ideal))
        .collect();
    assert_eq!(widths, vec![Some(3840), Some(1920), Some(1280)]);
    assert!(!access.is_camera_inaccessible(&negotiated.camera));
}

#[tokio::test]
async fn moves_to_next_camera_on_failure() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.fail_next("NotReadableError", "Device in use");
    let access = access(&host);

    let negotiated = access.negotiate_stream(CameraType::Back).await.unwrap();

    assert_eq!(negotiated.camera.device_id(), "front");
    assert_eq!(negotiated.level, ResolutionFallbackLevel::Uhd4k);
    assert!(!negotiated.is_main);
    assert_eq!(
        host.requested_device_ids(),
        vec![Some("back".to_owned()), Some("front".to_owned())],
    );
    let back = access.registered_camera("back").unwrap();
    assert!(access.is_camera_inaccessible(&back));
}

#[tokio::test]
async fn walks_all_levels_before_next_camera() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.script(vec![overconstrained(); 5]);
    let access = access(&host);

    let negotiated = access.negotiate_stream(CameraType::Front).await.unwrap();

    assert_eq!(negotiated.camera.device_id(), "back");
    assert_eq!(negotiated.level, ResolutionFallbackLevel::Uhd4k);
    let ids = host.requested_device_ids();
    assert_eq!(ids.len(), 6);
    assert!(ids[..5].iter().all(|id| id.as_deref() == Some("front")));
    assert_eq!(host.requests()[4].video.width, None);
}

#[tokio::test]
async fn returns_last_error_when_nothing_works() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.fail_next("NotReadableError", "Device in use");
    host.fail_next("NotAllowedError", "Permission denied");
    let access = access(&host);

    let err = access.negotiate_stream(CameraType::Back).await.unwrap_err();

    assert_eq!(
        err.into_inner(),
        CameraError::NotAllowed("Permission denied".to_owned()),
    );
    assert!(access.get_cameras(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn tries_initial_camera_when_none_listed() {
    let host = FakeMediaDevices::new(Vec::new());
    let access = access(&host);

    let err = access.negotiate_stream(CameraType::Back).await.unwrap_err();

    assert_eq!(
        err.into_inner(),
        CameraError::NotFound("Requested device not found".to_owned()),
    );
    let last = host.requests().pop().unwrap();
    assert_eq!(last.video.device_id, None);
    assert_eq!(
        serde_json::to_value(&last.video.facing_mode).unwrap(),
        serde_json::json!({"ideal": "environment"}),
    );
}

#[tokio::test]
async fn stops_on_unsupported_host() {
    let host = FakeMediaDevices::phone();
    host.grant();
    host.fail_next("UnsupportedBrowserError", "");
    let access = access(&host);

    let err = access.negotiate_stream(CameraType::Front).await.unwrap_err();

    assert!(err.as_ref().is_unsupported());
    assert_eq!(host.requests().len(), 1);
}

#[tokio::test]
async fn fails_right_away_without_capabilities() {
    let host = FakeMediaDevices::phone();
    host.set_features(Features::GET_USER_MEDIA);
    let access = access(&host);

    let err = access.negotiate_stream(CameraType::Front).await.unwrap_err();

    assert!(err.as_ref().is_unsupported());
    assert!(host.requests().is_empty());
    assert_eq!(host.enumerations(), 0);
}

#[tokio::test]
async fn reclassifies_cameras_by_active_track() {
    let host = FakeMediaDevices::new(vec![
        FakeCamera::new("a", "Camera 1", Some(FacingMode::User)),
        FakeCamera::new("b", "Camera 2", Some(FacingMode::Environment)),
        FakeCamera::new("c", "Camera 3", None),
    ]);
    host.grant();
    let access = access(&host);
    let cameras = access.get_cameras(false).await.unwrap();
    assert_eq!(cameras[2].camera_type(), CameraType::Back);

    host.fail_next("NotReadableError", "Device in use");
    host.fail_next("NotReadableError", "Device in use");
    let negotiated = access.negotiate_stream(CameraType::Back).await.unwrap();

    assert_eq!(
        host.requested_device_ids(),
        vec![
            Some("c".to_owned()),
            Some("a".to_owned()),
            Some("b".to_owned()),
        ],
    );
    assert_eq!(negotiated.camera.device_id(), "b");
    assert_eq!(negotiated.camera.camera_type(), CameraType::Back);
    assert!(negotiated.is_main);
    assert_eq!(cameras[2].camera_type(), CameraType::Front);
}
