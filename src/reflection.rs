//! Devotional reflections for a hymn.
//!
//! [`ReflectionSource`] is the only thing the UI sees. The Gemini-backed
//! implementation talks to the network; [`OfflineReflection`] never does. Both
//! always hand back a [`Reflection`]: failures are logged and replaced with a
//! fixed fallback text.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::Reflection;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Used when the model answers but leaves the reflection out.
pub const DEFAULT_REFLECTION: &str =
    "গানের কথাগুলোর ওপর ধ্যান করুন এবং ঈশ্বরের সান্নিধ্য অনুভব করুন।";
/// Used when no reflection could be generated at all.
pub const UNAVAILABLE_REFLECTION: &str =
    "বর্তমানে আত্মিক ধ্যান তৈরি করা সম্ভব হচ্ছে না। গানের কথাগুলোর মাধ্যমে শান্তি খুঁজে নিন।";
/// Psalm 119:105, used whenever the verse is missing.
pub const DEFAULT_BIBLE_VERSE: &str =
    "গীতসংহিতা ১১৯:১০৫ - তোমার বাক্য আমার চরণের প্রদীপ, ও আমার পথের আলো।";

/// Something that can write a reflection for a hymn. Implementations must not
/// fail; they fall back to fixed text instead.
pub trait ReflectionSource: Send + Sync {
    fn reflect(&self, title: &str, lyrics: &str) -> Reflection;
}

/// The pair returned whenever generation fails.
pub fn unavailable_reflection() -> Reflection {
    Reflection {
        reflection: UNAVAILABLE_REFLECTION.to_string(),
        bible_verse: DEFAULT_BIBLE_VERSE.to_string(),
    }
}

/// Pick the Gemini client when an API key is configured, the offline source
/// otherwise.
pub fn from_config(config: &Config) -> Box<dyn ReflectionSource> {
    let Some(api_key) = config.api_key.clone() else {
        info!("no API key configured, reflections are offline");
        return Box::new(OfflineReflection);
    };

    match GeminiReflection::new(api_key, config.model.clone()) {
        Ok(client) => {
            info!(model = %config.model, "reflections use Gemini");
            Box::new(client)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "falling back to offline reflections");
            Box::new(OfflineReflection)
        }
    }
}

/// Reflection source that never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineReflection;

impl ReflectionSource for OfflineReflection {
    fn reflect(&self, _title: &str, _lyrics: &str) -> Reflection {
        unavailable_reflection()
    }
}

#[derive(Debug, Error)]
pub enum ReflectionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered with status {0}")]
    Status(StatusCode),
    #[error("model output is not the expected JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Reflections generated by Google's Gemini `generateContent` API.
pub struct GeminiReflection {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiReflection {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint: GEMINI_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different API base, e.g. a local proxy.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn try_reflect(&self, title: &str, lyrics: &str) -> Result<Reflection, ReflectionError> {
        let url = format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(title, lyrics) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "reflection": {
                            "type": "STRING",
                            "description": "A spiritual reflection in Bengali (2-3 sentences)."
                        },
                        "bibleVerse": {
                            "type": "STRING",
                            "description": "A relevant Bible verse in Bengali with reference."
                        }
                    },
                    "required": ["reflection", "bibleVerse"]
                }
            }
        });

        debug!(model = %self.model, "requesting reflection");
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            return Err(ReflectionError::Status(response.status()));
        }

        let generated: GenerateResponse = response.json()?;
        parse_model_output(&generated.text())
    }
}

impl ReflectionSource for GeminiReflection {
    fn reflect(&self, title: &str, lyrics: &str) -> Reflection {
        match self.try_reflect(title, lyrics) {
            Ok(reflection) => reflection,
            Err(err) => {
                warn!(error = %err, "reflection request failed");
                unavailable_reflection()
            }
        }
    }
}

fn build_prompt(title: &str, lyrics: &str) -> String {
    format!(
        "You are a Christian theologian. Provide a devotional reflection and one highly \
relevant Bible verse (reference + text) for the following Bengali Christian hymn.

Song Title: {title}
Song Lyrics: {lyrics}

Instructions:
1. Provide the 'reflection' in 2-3 deep, poetic, and encouraging sentences in BENGALI.
2. Provide the 'bibleVerse' including both the reference and the full verse text in BENGALI.
3. Ensure the JSON format is strictly followed."
    )
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, or an empty JSON object when the model
    /// returned nothing.
    fn text(&self) -> String {
        let text: String = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            "{}".to_string()
        } else {
            text
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReflectionPayload {
    reflection: Option<String>,
    bible_verse: Option<String>,
}

/// Decode the model's JSON answer, filling blank or missing fields with the
/// default texts.
fn parse_model_output(text: &str) -> Result<Reflection, ReflectionError> {
    let payload: ReflectionPayload = serde_json::from_str(text)?;
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    Ok(Reflection {
        reflection: non_blank(payload.reflection)
            .unwrap_or_else(|| DEFAULT_REFLECTION.to_string()),
        bible_verse: non_blank(payload.bible_verse)
            .unwrap_or_else(|| DEFAULT_BIBLE_VERSE.to_string()),
    })
}
