//! Camera access settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Camera access settings.
#[derive(Clone, Debug, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct Camera {
    /// Delay before every stream acquisition request. The request is always
    /// issued on a next host macrotask, even with the zero delay.
    ///
    /// Defaults to `0ms`.
    #[default(Duration::from_millis(0))]
    #[serde(with = "humantime_serde")]
    pub acquire_delay: Duration,

    /// Whether infrared cameras are excluded from the listed cameras.
    ///
    /// Defaults to `true`.
    #[default(true)]
    pub filter_infrared: bool,

    /// Whether a throwaway stream may be opened to reveal device labels when
    /// none of them is known yet.
    ///
    /// Defaults to `true`.
    #[default(true)]
    pub unlock_labels: bool,
}
