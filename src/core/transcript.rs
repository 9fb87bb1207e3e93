use async_trait::async_trait;
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::config::TranscriptConfig;
use crate::error::{Error, Result};

/// Source of plain-text transcripts for a video id.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// `None` means no transcript could be obtained; the provider error is
    /// logged here, never surfaced to the caller.
    async fn fetch_transcript(&self, video_id: &str) -> Option<String>;
}

#[derive(Clone)]
pub struct TranscriptResolver {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl TranscriptResolver {
    pub fn new(config: TranscriptConfig) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::upstream(format!("failed to set up transcript client: {e}")))?;
        Ok(Self {
            api,
            languages: config.languages,
        })
    }
}

#[async_trait]
impl TranscriptSource for TranscriptResolver {
    async fn fetch_transcript(&self, video_id: &str) -> Option<String> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        match self.api.fetch_transcript(video_id, &languages, false).await {
            Ok(transcript) => {
                let text = transcript
                    .snippets
                    .iter()
                    .map(|snippet| snippet.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(text)
            }
            Err(e) => {
                log::warn!("failed to fetch transcript for {video_id}: {e}");
                None
            }
        }
    }
}

const SHORT_HOST: &str = "youtu.be";
const CANONICAL_HOST: &str = "youtube.com";

/// Extracts the video id from the two supported YouTube URL shapes:
/// `youtu.be/<id>` and `youtube.com` with `/watch?v=<id>`, `/embed/<id>`
/// or `/v/<id>`. Anything else is a normal negative, not an error.
pub fn extract_video_id(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let raw_id = match host {
        SHORT_HOST => parsed.path_segments()?.next()?.to_string(),
        CANONICAL_HOST => {
            let path = parsed.path();
            if path == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?
            } else if path.starts_with("/embed/") || path.starts_with("/v/") {
                parsed.path_segments()?.nth(1)?.to_string()
            } else {
                return None;
            }
        }
        _ => return None,
    };

    sanitize_video_id(&raw_id).ok()
}

const MAX_VIDEO_ID_LEN: usize = 128;

/// Ensure a video identifier is safe for downstream use (API calls, log
/// lines). Only ASCII alphanumeric characters plus `_` and `-` are allowed.
pub fn sanitize_video_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::validation("video id cannot be empty"));
    }

    if trimmed.len() > MAX_VIDEO_ID_LEN {
        return Err(Error::validation("video id is unexpectedly long"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::validation(
            "video id contains unsupported characters; expected only letters, numbers, '-' or '_'",
        ));
    }

    Ok(trimmed.to_string())
}
