use std::fmt;

use lesson_core::model::{VideoDescriptor, VideoId, VideoList};

use crate::error::PlaylistError;

/// Cyclic playback cursor over a fixed lesson playlist.
///
/// The cursor always points at a valid video while the list is non-empty.
/// `advance` wraps from the last video back to the first; there is no
/// "playlist complete" state. Playback transport is the caller's concern.
#[derive(Clone, Default)]
pub struct PlaylistSession {
    list: VideoList,
    current: usize,
}

impl PlaylistSession {
    #[must_use]
    pub fn new(list: VideoList) -> Self {
        Self { list, current: 0 }
    }

    /// Replace the list wholesale and reset the cursor to the first video.
    pub fn initialize(&mut self, list: VideoList) {
        self.list = list;
        self.current = 0;
    }

    #[must_use]
    pub fn list(&self) -> &VideoList {
        &self.list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Cursor position, or `None` for an empty playlist.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (!self.list.is_empty()).then_some(self.current)
    }

    #[must_use]
    pub fn current(&self) -> Option<&VideoDescriptor> {
        self.list.get(self.current)
    }

    /// Jump to the video at `index`.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistError::OutOfRange` and leaves the cursor unchanged
    /// if `index` is not a valid position.
    pub fn select_index(&mut self, index: usize) -> Result<&VideoDescriptor, PlaylistError> {
        let len = self.list.len();
        if index >= len {
            return Err(PlaylistError::OutOfRange { index, len });
        }
        self.current = index;
        self.list
            .get(index)
            .ok_or(PlaylistError::OutOfRange { index, len })
    }

    /// Jump to the first video carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistError::UnknownVideo` and leaves the cursor unchanged
    /// if no video matches.
    pub fn select_video(&mut self, id: &VideoId) -> Result<&VideoDescriptor, PlaylistError> {
        let index = self
            .list
            .position_of(id)
            .ok_or_else(|| PlaylistError::UnknownVideo(id.clone()))?;
        self.select_index(index)
    }

    /// Move to the next video, wrapping to the first after the last.
    ///
    /// Also the handler for "playback ended". No-op on an empty playlist.
    pub fn advance(&mut self) -> Option<&VideoDescriptor> {
        let len = self.list.len();
        if len == 0 {
            return None;
        }
        self.current = (self.current + 1) % len;
        self.list.get(self.current)
    }
}

impl fmt::Debug for PlaylistSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistSession")
            .field("len", &self.list.len())
            .field("current", &self.current_index())
            .finish()
    }
}
