//! Video URL classification for section previews and embeds.

use url::Url;

/// A classified video reference.
///
/// Classification never fails: anything that is not recognizably YouTube,
/// Vimeo, or Google Drive is treated as a directly playable media URL.
/// Only the absence of a URL disables a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Vimeo { id: String },
    GoogleDrive { id: String },
    Direct { url: String },
}

impl VideoSource {
    pub fn classify(raw: &str) -> VideoSource {
        if let Ok(parsed) = Url::parse(raw) {
            if let Some(host) = parsed.host_str() {
                let host = host.strip_prefix("www.").unwrap_or(host);
                match host {
                    "youtu.be" => {
                        if let Some(id) = first_segment(&parsed).and_then(youtube_id) {
                            return VideoSource::YouTube { id };
                        }
                    }
                    "youtube.com" | "m.youtube.com" | "youtube-nocookie.com" => {
                        if let Some(id) = youtube_id_from_url(&parsed) {
                            return VideoSource::YouTube { id };
                        }
                    }
                    "vimeo.com" | "player.vimeo.com" => {
                        if let Some(id) = numeric_segment(&parsed) {
                            return VideoSource::Vimeo { id };
                        }
                    }
                    "drive.google.com" => {
                        if let Some(id) = drive_id(&parsed) {
                            return VideoSource::GoogleDrive { id };
                        }
                    }
                    _ => {}
                }
            }
        }

        VideoSource::Direct {
            url: raw.to_string(),
        }
    }

    /// Provider embed URL for iframe/video tags.
    pub fn embed_url(&self) -> String {
        match self {
            VideoSource::YouTube { id } => format!("https://www.youtube.com/embed/{}", id),
            VideoSource::Vimeo { id } => format!("https://player.vimeo.com/video/{}", id),
            VideoSource::GoogleDrive { id } => {
                format!("https://drive.google.com/file/d/{}/preview", id)
            }
            VideoSource::Direct { url } => url.clone(),
        }
    }
}

fn first_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.find(|segment| !segment.is_empty())
}

/// YouTube ids are exactly 11 URL-safe characters; shorter candidates mean
/// the URL is not a video link and falls through to Direct.
fn youtube_id(candidate: &str) -> Option<String> {
    let id: String = candidate
        .chars()
        .take_while(|c| !matches!(c, '"' | '&' | '?' | '/') && !c.is_whitespace())
        .take(11)
        .collect();

    (id.chars().count() == 11).then_some(id)
}

fn youtube_id_from_url(url: &Url) -> Option<String> {
    // Watch-style links carry the id in the v query parameter
    if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "v") {
        if let Some(id) = youtube_id(&value) {
            return Some(id);
        }
    }

    // Embed-style links carry it as the segment after /embed, /v or /e
    let mut segments = url.path_segments()?;
    while let Some(segment) = segments.next() {
        if matches!(segment, "embed" | "v" | "e") {
            return segments.next().and_then(youtube_id);
        }
    }

    None
}

fn numeric_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

fn drive_id(url: &Url) -> Option<String> {
    // Share links: /file/d/{id}/view
    let mut segments = url.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "d" {
            return segments.next().map(str::to_string).filter(|s| !s.is_empty());
        }
    }

    // Legacy links: /open?id={id}
    if url.path() == "/open" {
        if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "id") {
            if !value.is_empty() {
                return Some(value.into_owned());
            }
        }
    }

    None
}
