//! Batch API request lines.

use serde::Serialize;

use crate::config::BatchConfig;

/// One line of a batch input file: a single chat completion request.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    /// Echoed back in the response so results can be matched to posts
    pub custom_id: &'a str,
    pub method: &'static str,
    pub url: &'a str,
    pub body: RequestBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl<'a> BatchRequest<'a> {
    /// A request asking the model about a single post.
    pub fn for_post(post_id: &'a str, prompt: String, config: &'a BatchConfig) -> Self {
        Self {
            custom_id: post_id,
            method: "POST",
            url: &config.url,
            body: RequestBody {
                model: &config.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                max_tokens: config.max_tokens,
            },
        }
    }
}

/// Join the prompt template and a post body, trimming the result.
pub fn build_prompt(template: &str, html: &str) -> String {
    format!("{template}\n\n{html}").trim().to_string()
}
