//! Cameras as understood by this crate.

pub mod classifier;
pub mod ordering;
pub mod registry;

use std::{cell::RefCell, fmt, rc::Rc};

use derive_more::Display;
use serde::Serialize;

#[doc(inline)]
pub use self::{
    classifier::{is_back_camera_label, is_infrared_camera_label},
    ordering::{
        adjust_cameras_from_camera_stream, get_main_camera_for_type,
        sort_cameras_for_camera_type,
    },
    registry::{DeviceRegistry, InaccessibleDevices},
};

/// Facing direction of a camera.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraType {
    /// User-facing camera.
    #[display(fmt = "front")]
    Front,

    /// Scene-facing camera.
    #[display(fmt = "back")]
    Back,
}

/// Plain value snapshot of a [`Camera`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraInfo {
    /// Opaque identifier of the device. Empty for an initial camera.
    pub device_id: String,

    /// Human-readable label, empty until access has been granted once.
    pub label: String,

    /// Heuristic facing direction.
    pub camera_type: CameraType,
}

/// Single physical video-input device.
///
/// [`Camera`] is a shared handle: all its clones observe the same device, so
/// the classification and identifier updates made by [`CameraAccess`] are
/// visible through every handle given out earlier. Use [`Camera::ptr_eq`] to
/// check identity, and `==` to compare values.
///
/// [`CameraAccess`]: crate::CameraAccess
#[derive(Clone)]
pub struct Camera(Rc<RefCell<CameraInfo>>);

impl Camera {
    /// Creates a new [`Camera`].
    #[must_use]
    pub fn new<I: Into<String>, L: Into<String>>(
        device_id: I,
        label: L,
        camera_type: CameraType,
    ) -> Self {
        Self(Rc::new(RefCell::new(CameraInfo {
            device_id: device_id.into(),
            label: label.into(),
            camera_type,
        })))
    }

    /// Creates an initial [`Camera`] with an empty `deviceId`.
    ///
    /// Accessing it requests any camera facing the given direction, which is
    /// the only option before a permission has been granted.
    #[inline]
    #[must_use]
    pub fn initial(camera_type: CameraType) -> Self {
        Self::new("", "", camera_type)
    }

    /// Indicates whether this is an initial [`Camera`].
    #[inline]
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.0.borrow().device_id.is_empty()
    }

    /// Returns the current `deviceId` of this [`Camera`].
    #[inline]
    #[must_use]
    pub fn device_id(&self) -> String {
        self.0.borrow().device_id.clone()
    }

    /// Returns the label of this [`Camera`].
    #[inline]
    #[must_use]
    pub fn label(&self) -> String {
        self.0.borrow().label.clone()
    }

    /// Indicates whether this [`Camera`] has a non-empty label.
    #[inline]
    #[must_use]
    pub fn has_label(&self) -> bool {
        !self.0.borrow().label.is_empty()
    }

    /// Returns the [`CameraType`] of this [`Camera`].
    #[inline]
    #[must_use]
    pub fn camera_type(&self) -> CameraType {
        self.0.borrow().camera_type
    }

    /// Reclassifies this [`Camera`].
    #[inline]
    pub fn set_camera_type(&self, camera_type: CameraType) {
        self.0.borrow_mut().camera_type = camera_type;
    }

    /// Returns a value snapshot of this [`Camera`].
    #[inline]
    #[must_use]
    pub fn info(&self) -> CameraInfo {
        self.0.borrow().clone()
    }

    /// Indicates whether both handles point to the same [`Camera`].
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Moves this [`Camera`] to a new `deviceId`.
    pub(crate) fn set_device_id(&self, device_id: String) {
        self.0.borrow_mut().device_id = device_id;
    }
}

impl PartialEq for Camera {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl Eq for Camera {}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.0.borrow();
        f.debug_struct("Camera")
            .field("device_id", &info.device_id)
            .field("label", &info.label)
            .field("camera_type", &info.camera_type)
            .finish()
    }
}

impl From<CameraInfo> for Camera {
    #[inline]
    fn from(info: CameraInfo) -> Self {
        Self(Rc::new(RefCell::new(info)))
    }
}
