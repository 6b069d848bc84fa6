//! Media devices and streams related objects.

mod constraints;
mod device_info;
pub mod enumerator;
mod stream;

#[doc(inline)]
pub use self::{
    constraints::{
        ConstrainString, ConstrainU32, DeviceVideoTrackConstraints,
        FacingMode, MediaStreamConstraints, ResizeMode,
        ResolutionFallbackLevel,
    },
    device_info::{InputDeviceInfo, MediaDeviceKind, MediaKind},
    enumerator::list_devices,
    stream::{MediaStreamHandle, StopOnDrop},
};
