/*
chat.rs

Copyright 2025 Hervé Quatremain

This file is part of Turtle Tail.

Turtle Tail is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Turtle Tail is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Turtle Tail. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Ask a chat-completion REST API to design a level.
//!
//! The request follows the OpenAI `v1/chat/completions` format. The API key is sent as a bearer
//! token.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::Agent;
use ureq::config::Config;

use super::response::parse_level;
use super::{GenerationError, GenerationRequest, LevelGenerator};
use crate::puzzle::Puzzle;

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are a game level designer. \
    Return only valid JSON without any markdown formatting or explanations.";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 2000;

/// Chat message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Body of the chat-completion request.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Body of the chat-completion response. Only the fields that Turtle Tail uses are kept.
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

/// One answer of the model.
#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: Message,
}

impl ChatResponse {
    /// Return the content of the first answer.
    pub fn first_content(&self) -> Result<&str, GenerationError> {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(GenerationError::NoChoice)
    }
}

/// Build the level-design prompt.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let rows: i32 = request.grid.rows;
    let cols: i32 = request.grid.cols;
    format!(
        r#"Generate a new level for a turtle coding game.
The game teaches kids how to build algorithms and basic programming logic.
Level: {level}
Grid size: {rows}x{cols} (rows x cols)

Rules:
- Create exactly 3 games for this level
- Paths in the same game don't intersect
- No diagonal paths allowed
- Coordinates must be within bounds: x=[0-{max_x}], y=[0-{max_y}]
- Each path must have a unique string ID like "p1", "p2", "b1", etc.
- Paths should connect: one path's endCell should match the next path's startCell
- The first path of a game starts on the game's startCell

Difficulty progression based on level and the game:
- Game 1: Simple (3 paths)
- Game 2: Medium (5 paths)
- Game 3: Complex (7 paths)

Return ONLY valid JSON with this EXACT structure (no markdown, no explanations):
{{
    "games": [
        {{
            "startCell": {{"x": 0, "y": 0}},
            "allPaths": [
                {{"id": "p1", "startCell": {{"x": 0, "y": 0}}, "endCell": {{"x": 6, "y": 0}}}},
                {{"id": "p2", "startCell": {{"x": 6, "y": 0}}, "endCell": {{"x": 6, "y": 3}}}}
            ]
        }}
    ]
}}

Randomize the path coordinates and IDs. Do not reuse patterns from previous levels."#,
        level = request.level(),
        max_x = cols - 1,
        max_y = rows - 1,
    )
}

/// Level generator that calls a chat-completion REST API.
#[derive(Debug, Clone)]
pub struct ChatLevelGenerator {
    /// Base URL of the API, without the trailing slash.
    base_url: String,

    /// Secret key. Without a key, generation always fails.
    api_key: Option<String>,

    /// Model name.
    model: String,

    /// Global timeout for one request.
    timeout: Duration,
}

impl ChatLevelGenerator {
    /// Create a [`ChatLevelGenerator`] object.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            timeout,
        }
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the request body.
    pub fn chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_prompt(request),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    fn agent(&self) -> Agent {
        Config::builder()
            .timeout_global(Some(self.timeout))
            .https_only(self.base_url.starts_with("https"))
            .build()
            .into()
    }
}

impl LevelGenerator for ChatLevelGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<Puzzle>, GenerationError> {
        let api_key: &str = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        info!("Requesting level {} from {}", request.level(), self.base_url);
        let response: ChatResponse = self
            .agent()
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .send_json(self.chat_request(request))?
            .into_body()
            .read_json()?;

        let content: &str = response.first_content()?;
        debug!("Generated level: {content}");
        parse_level(content, &request.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;

    fn request() -> GenerationRequest {
        GenerationRequest {
            previous_level: 2,
            grid: GridConfig::default(),
        }
    }

    #[test]
    fn test_prompt() {
        let prompt: String = build_prompt(&request());
        assert!(prompt.contains("Level: 3"));
        assert!(prompt.contains("Grid size: 7x13"));
        assert!(prompt.contains("x=[0-12], y=[0-6]"));
        assert!(prompt.contains(r#""startCell": {"x": 0, "y": 0}"#));
    }

    #[test]
    fn test_request_body() {
        let generator: ChatLevelGenerator = ChatLevelGenerator::new(
            "https://example.com/",
            Some("k".to_string()),
            DEFAULT_REQUEST_TIMEOUT,
        );
        let body: serde_json::Value =
            serde_json::to_value(generator.chat_request(&request())).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(generator.base_url, "https://example.com");
    }

    #[test]
    fn test_missing_api_key() {
        let generator: ChatLevelGenerator = ChatLevelGenerator::new(
            DEFAULT_API_URL,
            Some("  ".to_string()),
            DEFAULT_REQUEST_TIMEOUT,
        );
        assert!(!generator.has_api_key());
        assert!(matches!(
            generator.generate(&request()),
            Err(GenerationError::MissingApiKey)
        ));
    }

    #[test]
    fn test_response_without_choice() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"id": "x", "choices": []}"#).unwrap();
        assert!(matches!(
            response.first_content(),
            Err(GenerationError::NoChoice)
        ));

        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content().unwrap(), "{}");
    }
}
