use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODEL: &str = "model";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ROLE_USER, text)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Empty marker object; the API enables search grounding when the key is present.
#[derive(Serialize, Clone, Debug, Default)]
pub struct GoogleSearch {}

#[derive(Serialize, Clone, Debug, Default)]
pub struct Tool {
    #[serde(rename = "googleSearch", skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    pub fn new(
        contents: Vec<Content>,
        system_prompt: &str,
        temperature: Option<f32>,
        search: bool,
    ) -> Self {
        let system_instruction = (!system_prompt.trim().is_empty()).then(|| SystemInstruction {
            parts: vec![Part {
                text: system_prompt.to_string(),
            }],
        });

        let tools = if search {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        };

        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig { temperature },
            tools,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Visible text carried by the first candidate. Thought parts are skipped.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Why the first candidate stopped, once the model reports it.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }

    pub fn web_sources(&self) -> impl Iterator<Item = &WebSource> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.grounding_metadata.as_ref())
            .flat_map(|metadata| metadata.grounding_chunks.iter())
            .filter_map(|chunk| chunk.web.as_ref())
    }
}

/// One SSE `data:` payload. Errors are checked first since an error body
/// would otherwise deserialize as an empty response.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum StreamPayload {
    Failure { error: Value },
    Response(GenerateContentResponse),
}
