use thiserror::Error;
use url::Url;

use crate::model::ids::VideoId;

/// Query parameter that carries the video identifier in a watch URL.
const VIDEO_ID_PARAM: &str = "v";

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VideoError {
    #[error("video url has no extractable identifier: {url}")]
    InvalidVideoReference { url: String },
}

//
// ─── IDENTIFIER EXTRACTION ─────────────────────────────────────────────────────
//

/// Extract the video identifier from a watch URL.
///
/// Returns `None` when the URL does not parse or has no non-empty `v` parameter.
#[must_use]
pub fn extract_identifier(url: &str) -> Option<VideoId> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == VIDEO_ID_PARAM)
        .and_then(|(_, value)| VideoId::new(value.into_owned()))
}

/// Thumbnail image URL for a video identifier.
#[must_use]
pub fn thumbnail_url(id: &VideoId) -> String {
    format!("{THUMBNAIL_BASE}/{}/0.jpg", id.as_str())
}

//
// ─── VIDEO DESCRIPTOR ──────────────────────────────────────────────────────────
//

/// Metadata for one playable video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDescriptor {
    url: String,
    title: String,
    channel: String,
    is_fun: bool,
}

impl VideoDescriptor {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        channel: impl Into<String>,
        is_fun: bool,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            channel: channel.into(),
            is_fun,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn is_fun(&self) -> bool {
        self.is_fun
    }

    /// Identifier extracted from the URL, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<VideoId> {
        extract_identifier(&self.url)
    }

    /// Identifier extracted from the URL.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::InvalidVideoReference` if the URL carries no identifier.
    pub fn require_identifier(&self) -> Result<VideoId, VideoError> {
        self.identifier()
            .ok_or_else(|| VideoError::InvalidVideoReference {
                url: self.url.clone(),
            })
    }

    /// Thumbnail URL, or `None` when a placeholder should be shown instead.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<String> {
        self.identifier().as_ref().map(thumbnail_url)
    }
}

//
// ─── VIDEO LIST ────────────────────────────────────────────────────────────────
//

/// Ordered, immutable sequence of videos for one lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoList {
    videos: Vec<VideoDescriptor>,
}

impl VideoList {
    #[must_use]
    pub fn new(videos: Vec<VideoDescriptor>) -> Self {
        Self { videos }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VideoDescriptor> {
        self.videos.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VideoDescriptor> {
        self.videos.iter()
    }

    /// Index of the first video whose URL carries `id`.
    #[must_use]
    pub fn position_of(&self, id: &VideoId) -> Option<usize> {
        self.videos
            .iter()
            .position(|video| video.identifier().as_ref() == Some(id))
    }
}

impl From<Vec<VideoDescriptor>> for VideoList {
    fn from(videos: Vec<VideoDescriptor>) -> Self {
        Self::new(videos)
    }
}

impl<'a> IntoIterator for &'a VideoList {
    type Item = &'a VideoDescriptor;
    type IntoIter = std::slice::Iter<'a, VideoDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.videos.iter()
    }
}
