//! Image acquisition: one generation request per card, answered with an image URL.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::concepts::CardConcept;
use crate::constants::{GENERATION_TIMEOUT, PROMPT_PREVIEW_CHARS};
use crate::error::AcquireError;
use crate::prompt::{ArtStyle, build_prompt};

static URL_TOKEN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)\]"'<>]+"#));

/// Request body sent to the generation service.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    /// The image prompt
    pub query: &'a str,
    /// Model name
    pub model: &'a str,
    /// Always square
    pub aspect_ratio: &'a str,
    /// Reference images, unused
    pub image_urls: Vec<String>,
    /// Human readable description of the task
    pub task_summary: String,
}

/// Something that turns a prompt into a free-form text answer mentioning an image URL.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends one generation request and returns the raw text answer.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AcquireError>;
}

/// Talks to an HTTP image generation endpoint.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpImageGenerator {
    /// Builds a client with the generation timeout applied.
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self, AcquireError> {
        let client = reqwest::Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AcquireError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(api_key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AcquireError::Status { status, body });
        }
        Ok(body)
    }
}

/// Finds the first well-formed http(s) URL in a free-form answer.
pub fn extract_image_url(text: &str) -> Option<Url> {
    let pattern = URL_TOKEN.as_ref().ok()?;
    pattern
        .find_iter(text)
        .find_map(|token| Url::parse(token.as_str()).ok())
}

fn preview(prompt: &str) -> String {
    if prompt.chars().count() <= PROMPT_PREVIEW_CHARS {
        prompt.to_string()
    } else {
        let mut short: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        short.push_str("...");
        short
    }
}

/// Wraps an [`ImageGenerator`] with prompt building and URL extraction.
pub struct ImageAcquirer {
    generator: Box<dyn ImageGenerator>,
    model: String,
}

impl ImageAcquirer {
    /// Uses `model` for every request.
    pub fn new(generator: Box<dyn ImageGenerator>, model: &str) -> Self {
        Self {
            generator,
            model: model.to_string(),
        }
    }

    /// Generates an image for the concept. Exactly one request is made.
    pub async fn acquire(
        &self,
        concept: &CardConcept,
        style: ArtStyle,
    ) -> Result<Url, AcquireError> {
        let prompt = build_prompt(
            &concept.name,
            &concept.description,
            concept.rarity,
            style,
        );
        info!("Generating {}: {}", concept.name, preview(&prompt));
        self.acquire_prompt(&prompt, &concept.name).await
    }

    /// Generates an image for an already built prompt.
    pub async fn acquire_prompt(&self, prompt: &str, card_name: &str) -> Result<Url, AcquireError> {
        let request = GenerationRequest {
            query: prompt,
            model: &self.model,
            aspect_ratio: "1:1",
            image_urls: Vec::new(),
            task_summary: format!("Generate card: {card_name}"),
        };
        let answer = self.generator.generate(&request).await?;
        debug!("Generation answer for {card_name}: {answer}");
        match extract_image_url(&answer) {
            Some(url) => Ok(url),
            None => {
                warn!("Could not extract an image URL for {card_name}");
                Err(AcquireError::NoUrl)
            }
        }
    }
}
