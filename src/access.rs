//! Camera discovery and stream negotiation service.

use std::{cell::RefCell, fmt, rc::Rc};

use tracerr::Traced;

use crate::{
    camera::{
        self, classifier, Camera, CameraType, DeviceRegistry,
        InaccessibleDevices,
    },
    conf,
    errors::{BrowserCompatibility, CameraError},
    media::{
        list_devices, DeviceVideoTrackConstraints, InputDeviceInfo,
        MediaStreamConstraints, MediaStreamHandle, ResolutionFallbackLevel,
        StopOnDrop,
    },
    platform::{self, Features, MediaDevices},
};

/// Successful outcome of [`CameraAccess::negotiate_stream`].
#[derive(Debug)]
pub struct NegotiatedStream {
    /// [`Camera`] the stream is acquired from.
    pub camera: Camera,

    /// [`ResolutionFallbackLevel`] the stream is acquired with.
    pub level: ResolutionFallbackLevel,

    /// Acquired stream.
    pub stream: MediaStreamHandle,

    /// Whether the [`Camera`] is the main one of the preferred
    /// [`CameraType`], so no further negotiation is worth trying.
    pub is_main: bool,
}

/// Actual data of a [`CameraAccess`].
struct Inner {
    /// Host media devices.
    media_devices: Rc<dyn MediaDevices>,

    /// Camera access settings.
    conf: conf::Camera,

    /// All the [`Camera`]s ever seen, by their current `deviceId`s.
    registry: RefCell<DeviceRegistry>,

    /// `deviceId`s excluded from negotiation.
    inaccessible: RefCell<InaccessibleDevices>,

    /// Most recent enumeration result, [`None`] until devices are
    /// enumerated.
    available_devices: RefCell<Option<Vec<InputDeviceInfo>>>,
}

/// Entry point for discovering cameras and acquiring streams from them.
///
/// Owns all the camera bookkeeping of a session, so a single instance should
/// be created and shared (it's cheap to [`Clone`]). Operations are expected
/// to be awaited one after another.
#[derive(Clone)]
pub struct CameraAccess(Rc<Inner>);

impl fmt::Debug for CameraAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraAccess")
            .field("conf", &self.0.conf)
            .field("registry", &self.0.registry)
            .field("inaccessible", &self.0.inaccessible)
            .finish()
    }
}

impl CameraAccess {
    /// Creates a new [`CameraAccess`] over the provided host
    /// [`MediaDevices`].
    #[must_use]
    pub fn new(
        media_devices: Rc<dyn MediaDevices>,
        conf: conf::Camera,
    ) -> Self {
        Self(Rc::new(Inner {
            media_devices,
            conf,
            registry: RefCell::default(),
            inaccessible: RefCell::default(),
            available_devices: RefCell::default(),
        }))
    }

    /// Returns the currently accessible [`Camera`]s.
    ///
    /// Devices are enumerated on the first call, or if `refresh_devices` is
    /// set. If no device label is known at that moment, access to any camera
    /// is requested first to reveal them. Identifier changes detected by a
    /// refresh are applied to the already known [`Camera`]s.
    ///
    /// Returns a new [`Vec`] on every call.
    ///
    /// # Errors
    ///
    /// With [`CameraError::UnsupportedBrowser`] if the host lacks device
    /// enumeration or stream acquisition.
    ///
    /// With a normalized [`CameraError`] if the enumeration fails.
    pub async fn get_cameras(
        &self,
        refresh_devices: bool,
    ) -> Result<Vec<Camera>, Traced<CameraError>> {
        let compatibility = BrowserCompatibility::check(self.features());
        if !compatibility.full_support {
            return Err(tracerr::new!(CameraError::UnsupportedBrowser(
                compatibility
            )));
        }

        let cached = self.0.available_devices.borrow().clone();
        let devices = match cached {
            Some(devices) if !refresh_devices => devices,
            old_devices => {
                // Replaced only after a successful enumeration.
                let old_devices = old_devices.unwrap_or_default();
                let new_devices = self
                    .enumerate_with_labels()
                    .await
                    .map_err(tracerr::wrap!())?;
                log::debug!("Camera list (devices): {:?}", new_devices);

                let _ = self.0.registry.borrow_mut().reconcile(
                    &old_devices,
                    &new_devices,
                    &mut self.0.inaccessible.borrow_mut(),
                );
                *self.0.available_devices.borrow_mut() =
                    Some(new_devices.clone());
                new_devices
            }
        };

        let cameras = classifier::classify(
            &devices,
            &mut self.0.registry.borrow_mut(),
            &self.0.inaccessible.borrow(),
            self.0.conf.filter_infrared,
        );
        log::debug!("Camera list (cameras): {:?}", cameras);

        Ok(cameras)
    }

    /// Requests a video stream from the provided [`Camera`] at the provided
    /// [`ResolutionFallbackLevel`].
    ///
    /// An initial [`Camera`] (see [`Camera::initial`]) is requested by its
    /// facing direction, any other one by its exact `deviceId`.
    ///
    /// If the request fails with anything but an
    /// [`CameraError::Overconstrained`], the [`Camera`] is marked as
    /// inaccessible.
    ///
    /// # Errors
    ///
    /// With [`CameraError::UnsupportedBrowser`] if the host can't acquire
    /// streams at all.
    ///
    /// With a normalized [`CameraError`] if the request fails.
    pub async fn access_camera_stream(
        &self,
        level: ResolutionFallbackLevel,
        camera: &Camera,
    ) -> Result<MediaStreamHandle, Traced<CameraError>> {
        if !self.features().contains(Features::GET_USER_MEDIA) {
            return Err(tracerr::new!(CameraError::UnsupportedBrowser(
                BrowserCompatibility::missing_media_devices()
            )));
        }

        let mut video = DeviceVideoTrackConstraints::for_level(level);
        if camera.is_initial() {
            video.ideal_facing_mode(camera.camera_type().into());
        } else {
            video.device_id(camera.device_id());
        }
        log::debug!(
            "Attempt to access camera {:?} with constraints: {}",
            camera,
            serde_json::to_string(&video).unwrap_or_default(),
        );

        self.0.media_devices.delay_for(self.0.conf.acquire_delay).await;
        let tracks = self
            .0
            .media_devices
            .get_user_media(MediaStreamConstraints::video(video))
            .await
            .map_err(tracerr::map_from_and_wrap!())
            .map_err(|e: Traced<CameraError>| {
                if !e.as_ref().is_overconstrained() {
                    self.mark_camera_as_inaccessible(camera);
                }
                e
            })?;

        Ok(MediaStreamHandle::new(tracks))
    }

    /// Excludes the provided [`Camera`] from the listed ones.
    ///
    /// Does nothing for an initial [`Camera`].
    pub fn mark_camera_as_inaccessible(&self, camera: &Camera) {
        if camera.is_initial() {
            return;
        }
        log::debug!("Camera marked to be inaccessible: {:?}", camera);
        self.0.inaccessible.borrow_mut().insert(camera.device_id());
    }

    /// Indicates whether the provided [`Camera`] is excluded from the listed
    /// ones.
    #[must_use]
    pub fn is_camera_inaccessible(&self, camera: &Camera) -> bool {
        self.0.inaccessible.borrow().contains(&camera.device_id())
    }

    /// Returns the [`Camera`] registered under the provided `deviceId`.
    #[must_use]
    pub fn registered_camera(&self, device_id: &str) -> Option<Camera> {
        self.0.registry.borrow().get(device_id)
    }

    /// Forgets everything known about cameras, so the next
    /// [`CameraAccess::get_cameras`] call starts from scratch.
    ///
    /// [`Camera`]s returned earlier are not affected.
    pub fn reset(&self) {
        *self.0.registry.borrow_mut() = DeviceRegistry::default();
        *self.0.inaccessible.borrow_mut() = InaccessibleDevices::default();
        drop(self.0.available_devices.borrow_mut().take());
    }

    /// Returns the main [`Camera`] of the provided [`CameraType`].
    ///
    /// See [`camera::get_main_camera_for_type`].
    #[inline]
    #[must_use]
    pub fn get_main_camera_for_type(
        cameras: &[Camera],
        camera_type: CameraType,
    ) -> Option<Camera> {
        camera::get_main_camera_for_type(cameras, camera_type)
    }

    /// Orders the provided [`Camera`]s for the provided [`CameraType`].
    ///
    /// See [`camera::sort_cameras_for_camera_type`].
    #[inline]
    #[must_use]
    pub fn sort_cameras_for_camera_type(
        cameras: &[Camera],
        camera_type: CameraType,
    ) -> Vec<Camera> {
        camera::sort_cameras_for_camera_type(cameras, camera_type)
    }

    /// Reclassifies the provided [`Camera`]s basing on an active track.
    ///
    /// See [`camera::adjust_cameras_from_camera_stream`].
    #[inline]
    pub fn adjust_cameras_from_camera_stream(
        track: &dyn platform::MediaStreamTrack,
        cameras: &[Camera],
        camera_type: CameraType,
    ) -> Option<Camera> {
        camera::adjust_cameras_from_camera_stream(track, cameras, camera_type)
    }

    /// Acquires a working video stream, preferring [`Camera`]s of the
    /// provided [`CameraType`].
    ///
    /// Every listed [`Camera`] is tried in the
    /// [`CameraAccess::sort_cameras_for_camera_type`] order, walking
    /// resolutions from the finest to the coarsest while the [`Camera`]
    /// reports being overconstrained. Any other failure moves on to the next
    /// [`Camera`]. If no [`Camera`] is listed, an initial one is tried.
    ///
    /// # Errors
    ///
    /// With [`CameraError::UnsupportedBrowser`] right away if the host lacks
    /// required capabilities.
    ///
    /// With the error of the last attempt if nothing succeeded.
    pub async fn negotiate_stream(
        &self,
        preferred: CameraType,
    ) -> Result<NegotiatedStream, Traced<CameraError>> {
        let cameras =
            self.get_cameras(false).await.map_err(tracerr::wrap!())?;
        let mut ranked =
            camera::sort_cameras_for_camera_type(&cameras, preferred);
        let last = ranked.pop().unwrap_or_else(|| {
            log::debug!("No camera listed, trying initial {} one", preferred);
            Camera::initial(preferred)
        });

        for camera in &ranked {
            match self.negotiate_camera(camera, &cameras, preferred).await {
                Ok(negotiated) => return Ok(negotiated),
                Err(e) if e.as_ref().is_unsupported() => {
                    return Err(tracerr::new!(e));
                }
                Err(e) => {
                    log::debug!(
                        "Failed to access camera {:?}: {}, falling back to \
                         next camera",
                        camera,
                        e.as_ref(),
                    );
                }
            }
        }
        self.negotiate_camera(&last, &cameras, preferred)
            .await
            .map_err(tracerr::wrap!())
    }

    /// Walks [`ResolutionFallbackLevel`]s of a single [`Camera`] from the
    /// finest to the coarsest while it reports being overconstrained.
    ///
    /// The active track of an acquired stream is used to reclassify the
    /// listed `cameras`.
    async fn negotiate_camera(
        &self,
        camera: &Camera,
        cameras: &[Camera],
        preferred: CameraType,
    ) -> Result<NegotiatedStream, Traced<CameraError>> {
        let mut level = ResolutionFallbackLevel::Uhd4k;
        loop {
            match self.access_camera_stream(level, camera).await {
                Ok(stream) => {
                    let adjusted = stream.first_video_track().and_then(|t| {
                        camera::adjust_cameras_from_camera_stream(
                            &*t, cameras, preferred,
                        )
                    });
                    log::debug!("Camera {:?} accessed at {:?}", camera, level);
                    return Ok(NegotiatedStream {
                        is_main: adjusted.is_some(),
                        camera: adjusted.unwrap_or_else(|| camera.clone()),
                        level,
                        stream,
                    });
                }
                Err(e) => match level.coarser() {
                    Some(coarser) if e.as_ref().is_overconstrained() => {
                        log::debug!(
                            "Camera {:?} is overconstrained at {:?}: {}, \
                             falling back to {:?}",
                            camera,
                            level,
                            e.as_ref(),
                            coarser,
                        );
                        level = coarser;
                    }
                    _ => return Err(tracerr::new!(e)),
                },
            }
        }
    }

    /// Returns host [`Features`].
    fn features(&self) -> Features {
        self.0.media_devices.features()
    }

    /// Enumerates devices, opening a throwaway stream first if none of the
    /// cameras has a label yet.
    ///
    /// Failure to open the throwaway stream is not an error: the unlabeled
    /// enumeration result is returned then.
    async fn enumerate_with_labels(
        &self,
    ) -> Result<Vec<InputDeviceInfo>, Traced<CameraError>> {
        let media_devices = Rc::clone(&self.0.media_devices);
        let devices = list_devices(media_devices.as_ref())
            .await
            .map_err(tracerr::wrap!())?;
        if !self.0.conf.unlock_labels || !self.needs_label_unlock(&devices) {
            return Ok(devices);
        }

        let constraints =
            MediaStreamConstraints::video(DeviceVideoTrackConstraints::new());
        match media_devices.get_user_media(constraints).await {
            Ok(tracks) => {
                let _stream = StopOnDrop::new(MediaStreamHandle::new(tracks));
                log::debug!("Accessed stream to reveal camera labels");
                list_devices(media_devices.as_ref())
                    .await
                    .map_err(tracerr::wrap!())
            }
            Err(e) => {
                log::warn!(
                    "Failed to access stream to reveal labels: {}",
                    e.as_ref(),
                );
                Ok(devices)
            }
        }
    }

    /// Indicates whether none of the provided video devices has a label or
    /// is known yet.
    fn needs_label_unlock(&self, devices: &[InputDeviceInfo]) -> bool {
        let registry = self.0.registry.borrow();
        devices
            .iter()
            .filter(|d| d.is_video_input())
            .all(|d| d.label.is_empty() && !registry.contains(&d.device_id))
    }
}
