//! Long-lived bookkeeping of known cameras.

use std::collections::{HashMap, HashSet};

use crate::media::InputDeviceInfo;

use super::Camera;

/// Set of `deviceId`s which failed to be accessed and are excluded from
/// further negotiation.
#[derive(Clone, Debug, Default)]
pub struct InaccessibleDevices(HashSet<String>);

impl InaccessibleDevices {
    /// Marks the provided `deviceId` as inaccessible.
    #[inline]
    pub fn insert(&mut self, device_id: String) {
        let _ = self.0.insert(device_id);
    }

    /// Indicates whether the provided `deviceId` is inaccessible.
    #[inline]
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.0.contains(device_id)
    }

    /// Returns the count of inaccessible `deviceId`s.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether no `deviceId` is marked as inaccessible.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Mapping from `deviceId`s to their [`Camera`]s.
///
/// Holds at most one [`Camera`] per physical device: when a device changes
/// its `deviceId`, the existing [`Camera`] is updated and re-keyed by
/// [`DeviceRegistry::reconcile`].
#[derive(Debug, Default)]
pub struct DeviceRegistry(HashMap<String, Camera>);

impl DeviceRegistry {
    /// Returns the [`Camera`] registered under the provided `deviceId`.
    #[inline]
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<Camera> {
        self.0.get(device_id).cloned()
    }

    /// Indicates whether the provided `deviceId` is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.0.contains_key(device_id)
    }

    /// Registers the provided [`Camera`] under its current `deviceId`.
    #[inline]
    pub fn insert(&mut self, camera: Camera) {
        let _ = self.0.insert(camera.device_id(), camera);
    }

    /// Returns the count of registered `deviceId`s.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Detects `deviceId` changes between two enumerations and applies them
    /// to the registered [`Camera`]s.
    ///
    /// Devices are expected to keep their order, so if both lists have the
    /// same non-zero length, the device at the same index is the same
    /// physical device as long as its label is unchanged. Such [`Camera`]s
    /// get the new `deviceId` and are re-keyed, and exclusions of the old
    /// `deviceId`s are carried over to the new ones.
    ///
    /// Returns the applied `old -> new` changes. Nothing is changed if the
    /// lists have different lengths.
    pub fn reconcile(
        &mut self,
        old_devices: &[InputDeviceInfo],
        new_devices: &[InputDeviceInfo],
        inaccessible: &mut InaccessibleDevices,
    ) -> Vec<(String, String)> {
        if new_devices.is_empty()
            || old_devices.len() != new_devices.len()
            || old_devices
                .iter()
                .zip(new_devices)
                .all(|(old, new)| old.device_id == new.device_id)
        {
            return Vec::new();
        }

        let renamed: Vec<_> = old_devices
            .iter()
            .zip(new_devices)
            .filter(|(old, new)| old.device_id != new.device_id)
            .filter_map(|(old, new)| {
                let camera = self.get(&old.device_id)?;
                (camera.label() == new.label)
                    .then(|| (camera, new.device_id.clone()))
            })
            .collect();

        for (camera, _) in &renamed {
            let _ = self.0.remove(&camera.device_id());
        }
        let mut changes = Vec::with_capacity(renamed.len());
        for (camera, new_id) in renamed {
            let old_id = camera.device_id();
            if inaccessible.contains(&old_id) {
                inaccessible.insert(new_id.clone());
            }
            camera.set_device_id(new_id.clone());
            self.insert(camera);
            changes.push((old_id, new_id));
        }

        if !changes.is_empty() {
            log::debug!(
                "Detected updated camera deviceId information and updated \
                 it accordingly: {:?}",
                changes,
            );
        }
        changes
    }
}
