//! Camera discovery, classification and stream negotiation for
//! [Medea] clients.
//!
//! Browsers expose cameras as opaque devices: labels are hidden until a
//! permission is granted, identifiers may change between grants, and the
//! facing direction is rarely reported. [`CameraAccess`] hides all of that
//! behind a few operations:
//! - [`CameraAccess::get_cameras`] lists cameras classified as front or back
//!   ones;
//! - [`CameraAccess::access_camera_stream`] acquires a stream from a single
//!   camera at a single resolution;
//! - [`CameraAccess::negotiate_stream`] walks cameras and resolutions until a
//!   stream is acquired.
//!
//! Host access is abstracted by the [`platform::MediaDevices`] trait, which
//! is implemented for browsers by `platform::WebMediaDevices` on `wasm32`.
//!
//! [Medea]: https://github.com/instrumentisto/medea

#![allow(clippy::module_name_repetitions)]
#![warn(missing_debug_implementations, missing_docs, unused_results)]

pub mod access;
pub mod camera;
pub mod conf;
pub mod errors;
pub mod media;
pub mod platform;

#[doc(inline)]
pub use self::{
    access::{CameraAccess, NegotiatedStream},
    camera::{Camera, CameraInfo, CameraType},
    conf::Conf,
    errors::{BrowserCompatibility, BrowserFeature, CameraError},
    media::{MediaStreamHandle, ResolutionFallbackLevel},
};
