use async_openai::config::OpenAIConfig;
use async_openai::types::responses::{
    CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
    OutputMessageContent, Role,
};
use async_trait::async_trait;

use crate::config::GeneratorConfig;
use crate::error::Result;

const MAX_OUTPUT_TOKENS: u32 = 4096;

const SYSTEM_PROMPT: &str =
    "You are a professional content writer who turns video transcripts into publishable articles.";

/// Turns a transcript into article text. One attempt per call; provider
/// errors propagate to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, transcript_text: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct ContentGenerator {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
}

impl ContentGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let client =
            async_openai::Client::with_config(OpenAIConfig::new().with_api_key(config.api_key));
        Self {
            client,
            model: config.model,
        }
    }
}

#[async_trait]
impl TextGenerator for ContentGenerator {
    async fn generate(&self, transcript_text: &str) -> Result<String> {
        let request = CreateResponseArgs::default()
            .max_output_tokens(MAX_OUTPUT_TOKENS)
            .model(self.model.as_str())
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(SYSTEM_PROMPT)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(format!(
                            "### Task
Based on the transcript of a video, write a complete article.

First decide which category the video belongs to: educational/tutorial,
music, sports, or other. Then write the output for that category:

- educational/tutorial: a structured blog article with headings, short
  paragraphs and bullet lists of key takeaways
- music: a summary of the song or performance covering mood, themes and
  notable moments
- sports: a match or event summary covering the sides, the key moments
  and the outcome
- other: a brief description of what the video is about

### Rules
1. Use only what appears between the <TRANSCRIPT> tags; add no outside
   context.
2. Format with '#'..'####' headings, **bold** for emphasis and '-' list
   items; no other markup.
3. Do not mention the transcript or that the text was generated.

<TRANSCRIPT>
{}
</TRANSCRIPT>
",
                            transcript_text
                        ))
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(message) = output {
                for part in message.content {
                    match part {
                        OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                        other => {
                            log::debug!("skipping non-text output item: {other:?}");
                            continue;
                        }
                    }
                }
            }
        }

        Ok(content.trim().to_string())
    }
}
