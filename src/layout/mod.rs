//! Layout variants and the pure derivations the careers page renderer
//! relies on: position-based fallback for unset layouts, card splitting,
//! and the video fallback chain.

pub mod video;

pub use video::VideoSource;

use serde::{Deserialize, Serialize};

use crate::database::models::company::Branding;

/// Rendering mode of a section.
///
/// Stored as declared; `Default` is resolved to a concrete side by list
/// position at render time and is never persisted as anything else.
/// Unknown strings are rejected at the JSON boundary by serde, which is
/// the variant validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "section_layout", rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Default,
    ImageLeft,
    ImageRight,
    FullWidth,
    TextOnly,
    Cards,
    VideoBg,
    VideoSplitLeft,
    VideoSplitRight,
}

impl Layout {
    /// Layouts that render a video and therefore want a resolvable video URL.
    pub fn is_video(self) -> bool {
        matches!(
            self,
            Layout::VideoBg | Layout::VideoSplitLeft | Layout::VideoSplitRight
        )
    }

    /// Resolve `Default` by position in the visible list: even rows put the
    /// image on the left, odd rows mirror it. Concrete variants map to
    /// themselves.
    pub fn resolved(self, index: usize) -> Layout {
        match self {
            Layout::Default => {
                if index % 2 == 0 {
                    Layout::ImageLeft
                } else {
                    Layout::ImageRight
                }
            }
            other => other,
        }
    }
}

/// Card units for the `cards` layout: one card per non-empty line of
/// `content`, trimmed, in input order.
pub fn cards(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The video URL a section renders with: the section's own URL when set,
/// else the company-wide culture video. `None` disables the preview; there
/// is no error path.
pub fn resolve_video_url<'a>(
    section_video_url: &'a str,
    branding: &'a Branding,
) -> Option<&'a str> {
    if !section_video_url.is_empty() {
        return Some(section_video_url);
    }
    branding
        .culture_video_url
        .as_deref()
        .filter(|url| !url.is_empty())
}

/// Classified embed for a section, following the fallback chain.
pub fn resolve_video(section_video_url: &str, branding: &Branding) -> Option<VideoSource> {
    resolve_video_url(section_video_url, branding).map(VideoSource::classify)
}
