pub mod generator;
pub mod markup;
pub mod transcript;

pub use generator::{ContentGenerator, TextGenerator};
pub use transcript::{TranscriptResolver, TranscriptSource, extract_video_id};
