//! Handles to acquired media streams.

use std::{fmt, rc::Rc};

use crate::platform::MediaStreamTrack;

use super::MediaKind;

/// Live media stream acquired from a camera.
///
/// Dropping a [`MediaStreamHandle`] doesn't release the camera: the only way
/// to do so is to [`MediaStreamHandle::stop`] it.
#[derive(Clone)]
pub struct MediaStreamHandle {
    tracks: Vec<Rc<dyn MediaStreamTrack>>,
}

impl MediaStreamHandle {
    /// Wraps the provided tracks into a new [`MediaStreamHandle`].
    #[inline]
    #[must_use]
    pub fn new(tracks: Vec<Rc<dyn MediaStreamTrack>>) -> Self {
        Self { tracks }
    }

    /// Returns all the tracks of this stream.
    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[Rc<dyn MediaStreamTrack>] {
        &self.tracks
    }

    /// Returns the video tracks of this stream.
    pub fn video_tracks(
        &self,
    ) -> impl Iterator<Item = &Rc<dyn MediaStreamTrack>> + '_ {
        self.tracks.iter().filter(|t| t.kind() == MediaKind::Video)
    }

    /// Returns the first video track of this stream, if any.
    #[must_use]
    pub fn first_video_track(&self) -> Option<Rc<dyn MediaStreamTrack>> {
        self.video_tracks().next().cloned()
    }

    /// Stops all the tracks of this stream, releasing the camera.
    pub fn stop(&self) {
        self.tracks.iter().for_each(|t| t.stop());
    }
}

impl fmt::Debug for MediaStreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStreamHandle")
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

/// Guard stopping all the video tracks of a temporary stream once dropped.
#[derive(Debug)]
pub struct StopOnDrop(MediaStreamHandle);

impl StopOnDrop {
    /// Guards the provided [`MediaStreamHandle`].
    #[inline]
    #[must_use]
    pub fn new(stream: MediaStreamHandle) -> Self {
        Self(stream)
    }
}

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        let mut stopped = 0;
        for track in self.0.video_tracks() {
            track.stop();
            stopped += 1;
        }
        log::debug!("Stopped {} temporary video track(s)", stopped);
    }
}
