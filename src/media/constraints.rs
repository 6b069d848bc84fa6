//! Media tracks and streams constraints functionality.

use serde::Serialize;

use crate::camera::CameraType;

/// Describes the directions that the camera can face, as seen from the
/// user's perspective. Representation of [VideoFacingModeEnum][1].
///
/// [1]: https://w3.org/TR/mediacapture-streams/#dom-videofacingmodeenum
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Facing toward the user (a self-view camera).
    User,

    /// Facing away from the user (viewing the environment).
    Environment,

    /// Facing to the left of the user.
    Left,

    /// Facing to the right of the user.
    Right,
}

impl FacingMode {
    /// Parses a [`FacingMode`] from its DOM string representation.
    #[must_use]
    pub fn from_dom_str(val: &str) -> Option<Self> {
        match val {
            "user" => Some(Self::User),
            "environment" => Some(Self::Environment),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

impl From<CameraType> for FacingMode {
    #[inline]
    fn from(ty: CameraType) -> Self {
        match ty {
            CameraType::Front => Self::User,
            CameraType::Back => Self::Environment,
        }
    }
}

/// Representation of the [ConstrainDOMString][1].
///
/// Can set exact (must be the parameter's value) and ideal (should be used if
/// possible) constraints.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#dom-constraindomstring
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstrainString<T> {
    /// The parameter's value must match exactly.
    Exact(T),

    /// The parameter's value should match if possible.
    Ideal(T),
}

/// Range constraint for a [ConstrainULong][1] setting.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#dom-constrainulong
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ConstrainU32 {
    /// Lowest acceptable value.
    pub min: u32,

    /// Preferred value.
    pub ideal: u32,

    /// Highest acceptable value.
    pub max: u32,
}

impl ConstrainU32 {
    /// Creates a new [`ConstrainU32`] range.
    #[inline]
    #[must_use]
    pub const fn range(min: u32, ideal: u32, max: u32) -> Self {
        Self { min, ideal, max }
    }
}

/// Value of the [`resizeMode`][1] constraint.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#def-constraint-resizeMode
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeMode {
    /// Frames are delivered as produced by the camera, never cropped or
    /// downscaled.
    None,

    /// The user agent may crop and downscale the frames.
    CropAndScale,
}

/// Resolution tier requested from a camera.
///
/// Variants are ordered from the finest to the coarsest, and negotiation
/// always walks them in this order.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ResolutionFallbackLevel {
    /// Around `3840x2160`.
    Uhd4k = 0,

    /// Around `1920x1080`.
    FullHd = 1,

    /// Around `1280x720`.
    Hd = 2,

    /// Around `640x480`.
    Vga = 3,

    /// No resolution constraints, the platform picks one.
    Unconstrained = 4,
}

impl ResolutionFallbackLevel {
    /// All levels in the negotiation order.
    pub const ALL: [Self; 5] = [
        Self::Uhd4k,
        Self::FullHd,
        Self::Hd,
        Self::Vga,
        Self::Unconstrained,
    ];

    /// Returns the next coarser level, if any.
    #[must_use]
    pub fn coarser(self) -> Option<Self> {
        match self {
            Self::Uhd4k => Some(Self::FullHd),
            Self::FullHd => Some(Self::Hd),
            Self::Hd => Some(Self::Vga),
            Self::Vga => Some(Self::Unconstrained),
            Self::Unconstrained => None,
        }
    }

    /// Returns `(width, height)` constraints of this level, or [`None`] if
    /// resolution is left to the platform.
    #[must_use]
    pub fn dimensions(self) -> Option<(ConstrainU32, ConstrainU32)> {
        match self {
            Self::Uhd4k => Some((
                ConstrainU32::range(3200, 3840, 4096),
                ConstrainU32::range(1800, 2160, 2400),
            )),
            Self::FullHd => Some((
                ConstrainU32::range(1400, 1920, 2160),
                ConstrainU32::range(900, 1080, 1440),
            )),
            Self::Hd => Some((
                ConstrainU32::range(960, 1280, 1440),
                ConstrainU32::range(480, 720, 960),
            )),
            Self::Vga => Some((
                ConstrainU32::range(640, 640, 800),
                ConstrainU32::range(480, 480, 600),
            )),
            Self::Unconstrained => None,
        }
    }
}

impl From<u8> for ResolutionFallbackLevel {
    /// Any value above `3` maps to [`ResolutionFallbackLevel::Unconstrained`].
    fn from(level: u8) -> Self {
        match level {
            0 => Self::Uhd4k,
            1 => Self::FullHd,
            2 => Self::Hd,
            3 => Self::Vga,
            _ => Self::Unconstrained,
        }
    }
}

/// Constraints applicable to a video track sourced from a camera.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceVideoTrackConstraints {
    /// Identifier of the device generating the content for the track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<ConstrainString<String>>,

    /// Describes the directions that the camera can face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_mode: Option<ConstrainString<FacingMode>>,

    /// Width of the video in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<ConstrainU32>,

    /// Height of the video in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<ConstrainU32>,

    /// Whether the user agent may crop and scale the camera output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_mode: Option<ResizeMode>,
}

impl DeviceVideoTrackConstraints {
    /// Creates new [`DeviceVideoTrackConstraints`] with none constraints
    /// configured, which is equivalent to `video: true`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates constraints for the given [`ResolutionFallbackLevel`].
    ///
    /// [`ResizeMode::None`] is always applied, so the camera output is never
    /// cropped implicitly.
    #[must_use]
    pub fn for_level(level: ResolutionFallbackLevel) -> Self {
        let mut this = Self {
            resize_mode: Some(ResizeMode::None),
            ..Self::default()
        };
        if let Some((width, height)) = level.dimensions() {
            this.width = Some(width);
            this.height = Some(height);
        }
        this
    }

    /// Sets an exact [`deviceId`][1] constraint.
    ///
    /// [1]: https://w3.org/TR/mediacapture-streams/#def-constraint-deviceId
    #[inline]
    pub fn device_id(&mut self, device_id: String) {
        self.device_id = Some(ConstrainString::Exact(device_id));
    }

    /// Sets an ideal [`facingMode`][1] constraint.
    ///
    /// [1]: https://w3.org/TR/mediacapture-streams/#dom-constraindomstring
    #[inline]
    pub fn ideal_facing_mode(&mut self, facing_mode: FacingMode) {
        self.facing_mode = Some(ConstrainString::Ideal(facing_mode));
    }
}

/// [MediaStreamConstraints][1] of a camera request. Audio is never requested.
///
/// [1]: https://w3.org/TR/mediacapture-streams/#dom-mediastreamconstraints
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MediaStreamConstraints {
    /// Whether an audio track is requested.
    pub audio: bool,

    /// Constraints of the requested video track.
    pub video: DeviceVideoTrackConstraints,
}

impl MediaStreamConstraints {
    /// Creates new [`MediaStreamConstraints`] requesting video only.
    #[inline]
    #[must_use]
    pub fn video(video: DeviceVideoTrackConstraints) -> Self {
        Self {
            audio: false,
            video,
        }
    }
}
