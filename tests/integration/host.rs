//! Scripted host environment.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};

use async_trait::async_trait;
use medea_camera::{
    conf,
    media::{
        ConstrainString, FacingMode, MediaKind, MediaStreamConstraints,
    },
    platform::{
        self, EnumerationApi, Features, MediaDeviceInfo, MediaDevices,
        MediaStreamTrack,
    },
    CameraAccess,
};
use tracerr::Traced;

/// Camera plugged into a [`FakeMediaDevices`].
#[derive(Clone, Debug)]
pub struct FakeCamera {
    pub device_id: String,
    pub label: String,
    pub facing_mode: Option<FacingMode>,
}

impl FakeCamera {
    pub fn new(
        device_id: &str,
        label: &str,
        facing_mode: Option<FacingMode>,
    ) -> Self {
        Self {
            device_id: device_id.to_owned(),
            label: label.to_owned(),
            facing_mode,
        }
    }
}

/// Track produced by a [`FakeMediaDevices`].
#[derive(Debug)]
pub struct FakeTrack {
    camera: FakeCamera,
    stopped: Cell<bool>,
}

impl FakeTrack {
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

impl MediaStreamTrack for FakeTrack {
    fn id(&self) -> String {
        format!("track-{}", self.camera.device_id)
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn label(&self) -> String {
        self.camera.label.clone()
    }

    fn device_id(&self) -> Option<String> {
        Some(self.camera.device_id.clone())
    }

    fn facing_mode(&self) -> Option<FacingMode> {
        self.camera.facing_mode
    }

    fn stop(&self) {
        self.stopped.set(true);
    }
}

/// [`MediaDevices`] with a fixed set of cameras, hiding their labels until
/// any stream is acquired, and failing the stream requests as scripted.
#[derive(Debug)]
pub struct FakeMediaDevices {
    features: Cell<Features>,
    cameras: RefCell<Vec<FakeCamera>>,
    extra_devices: RefCell<Vec<MediaDeviceInfo>>,
    granted: Cell<bool>,
    enumerations: Cell<usize>,
    enumeration_failures: RefCell<VecDeque<Option<platform::Error>>>,
    failures: RefCell<VecDeque<Option<platform::Error>>>,
    requests: RefCell<Vec<MediaStreamConstraints>>,
    delays: RefCell<Vec<Duration>>,
    tracks: RefCell<Vec<Rc<FakeTrack>>>,
}

impl FakeMediaDevices {
    pub fn new(cameras: Vec<FakeCamera>) -> Rc<Self> {
        Rc::new(Self {
            features: Cell::new(Features::all()),
            cameras: RefCell::new(cameras),
            extra_devices: RefCell::default(),
            granted: Cell::new(false),
            enumerations: Cell::new(0),
            enumeration_failures: RefCell::default(),
            failures: RefCell::default(),
            requests: RefCell::default(),
            delays: RefCell::default(),
            tracks: RefCell::default(),
        })
    }

    /// Front camera and back camera of a typical phone.
    pub fn phone() -> Rc<Self> {
        Self::new(vec![
            FakeCamera::new("front", "Front Camera", Some(FacingMode::User)),
            FakeCamera::new(
                "back",
                "Back Camera",
                Some(FacingMode::Environment),
            ),
        ])
    }

    pub fn set_features(&self, features: Features) {
        self.features.set(features);
    }

    pub fn add_device(&self, device: MediaDeviceInfo) {
        self.extra_devices.borrow_mut().push(device);
    }

    /// Marks labels as revealed, as if a permission was granted earlier.
    pub fn grant(&self) {
        self.granted.set(true);
    }

    /// Schedules outcomes of the next enumerations: [`None`] succeeds,
    /// [`Some`] fails with the given error.
    pub fn script_enumerations(
        &self,
        outcomes: Vec<Option<platform::Error>>,
    ) {
        self.enumeration_failures.borrow_mut().extend(outcomes);
    }

    /// Schedules a failure of the next enumeration.
    pub fn fail_enumeration(&self, name: &str, message: &str) {
        self.script_enumerations(vec![Some(platform::Error::new(
            name, message,
        ))]);
    }

    /// Schedules outcomes of the next stream requests: [`None`] succeeds,
    /// [`Some`] fails with the given error.
    pub fn script(&self, outcomes: Vec<Option<platform::Error>>) {
        self.failures.borrow_mut().extend(outcomes);
    }

    /// Schedules a failure of the next stream request.
    pub fn fail_next(&self, name: &str, message: &str) {
        self.script(vec![Some(platform::Error::new(name, message))]);
    }

    /// Changes `deviceId`s of all the cameras, keeping their order.
    pub fn rename_all(&self, rename: impl Fn(&str) -> String) {
        for camera in self.cameras.borrow_mut().iter_mut() {
            camera.device_id = rename(&camera.device_id);
        }
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.get()
    }

    pub fn requests(&self) -> Vec<MediaStreamConstraints> {
        self.requests.borrow().clone()
    }

    pub fn requested_device_ids(&self) -> Vec<Option<String>> {
        self.requests
            .borrow()
            .iter()
            .map(|c| match &c.video.device_id {
                Some(ConstrainString::Exact(id))
                | Some(ConstrainString::Ideal(id)) => Some(id.clone()),
                None => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }

    pub fn tracks(&self) -> Vec<Rc<FakeTrack>> {
        self.tracks.borrow().clone()
    }

    /// Picks the camera the provided constraints point to.
    fn select(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<FakeCamera, platform::Error> {
        let cameras = self.cameras.borrow();
        let selected = match &constraints.video.device_id {
            Some(ConstrainString::Exact(id)) => {
                cameras.iter().find(|c| &c.device_id == id)
            }
            _ => match &constraints.video.facing_mode {
                Some(ConstrainString::Ideal(facing_mode))
                | Some(ConstrainString::Exact(facing_mode)) => cameras
                    .iter()
                    .find(|c| c.facing_mode == Some(*facing_mode))
                    .or_else(|| cameras.first()),
                None => cameras.first(),
            },
        };
        selected.cloned().ok_or_else(|| {
            platform::Error::new("NotFoundError", "Requested device not found")
        })
    }
}

#[async_trait(?Send)]
impl MediaDevices for FakeMediaDevices {
    fn features(&self) -> Features {
        self.features.get()
    }

    async fn enumerate_devices(
        &self,
        _: EnumerationApi,
    ) -> Result<Vec<MediaDeviceInfo>, Traced<platform::Error>> {
        self.enumerations.set(self.enumerations.get() + 1);
        let failure =
            self.enumeration_failures.borrow_mut().pop_front().flatten();
        if let Some(err) = failure {
            return Err(tracerr::new!(err));
        }
        let granted = self.granted.get();
        let label = |c: &FakeCamera| {
            if granted {
                c.label.clone()
            } else {
                String::new()
            }
        };
        let mut devices: Vec<_> = self
            .cameras
            .borrow()
            .iter()
            .map(|c| MediaDeviceInfo {
                device_id: Some(c.device_id.clone()),
                kind: "videoinput".to_owned(),
                label: Some(label(c)),
                group_id: String::new(),
            })
            .collect();
        devices.extend(self.extra_devices.borrow().iter().cloned());
        Ok(devices)
    }

    async fn get_user_media(
        &self,
        constraints: MediaStreamConstraints,
    ) -> Result<Vec<Rc<dyn MediaStreamTrack>>, Traced<platform::Error>> {
        self.requests.borrow_mut().push(constraints.clone());
        let failure = self.failures.borrow_mut().pop_front().flatten();
        if let Some(err) = failure {
            return Err(tracerr::new!(err));
        }

        let camera = self.select(&constraints).map_err(tracerr::wrap!())?;
        self.granted.set(true);
        let track = Rc::new(FakeTrack {
            camera,
            stopped: Cell::new(false),
        });
        self.tracks.borrow_mut().push(Rc::clone(&track));
        Ok(vec![track as Rc<dyn MediaStreamTrack>])
    }

    async fn delay_for(&self, delay: Duration) {
        self.delays.borrow_mut().push(delay);
        tokio::task::yield_now().await;
    }
}

/// Creates a [`CameraAccess`] with default settings over the provided host.
pub fn access(host: &Rc<FakeMediaDevices>) -> CameraAccess {
    access_with(host, conf::Camera::default())
}

/// Creates a [`CameraAccess`] with the provided settings over the provided
/// host.
pub fn access_with(
    host: &Rc<FakeMediaDevices>,
    conf: conf::Camera,
) -> CameraAccess {
    CameraAccess::new(Rc::clone(host) as Rc<dyn MediaDevices>, conf)
}
