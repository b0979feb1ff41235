use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    constants::quiz_prompt::QUIZ_GENERATION_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
};

use super::{GeneratedQuizPayload, QuestionDraft, QuestionGenerator};

static PAYLOAD_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(GeneratedQuizPayload);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
});

pub struct OpenAiQuestionGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiQuestionGenerator {
    pub fn from_config(config: &Config) -> Self {
        let openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());
        Self {
            client: Client::with_config(openai_config),
            model: config.generation_model.clone(),
            timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }

    fn build_user_prompt(source_text: &str, question_count: i32, difficulty_level: i32) -> String {
        format!(
            "Generate {count} questions at difficulty {difficulty} (1-5) from the material below.\n\
             \n\
             MATERIAL:\n---\n{material}\n---\n\
             \n\
             JSON schema for your response:\n{schema}",
            count = question_count,
            difficulty = difficulty_level,
            material = source_text,
            schema = PAYLOAD_SCHEMA.as_str(),
        )
    }

    /// Models occasionally wrap JSON in markdown fences despite instructions.
    fn strip_fences(content: &str) -> &str {
        let trimmed = content.trim();
        trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .map(str::trim)
            .unwrap_or(trimmed)
    }

    fn parse_drafts(content: &str) -> AppResult<Vec<QuestionDraft>> {
        let payload: GeneratedQuizPayload = serde_json::from_str(Self::strip_fences(content))
            .map_err(|err| AppError::GenerationParseError(err.to_string()))?;
        Ok(payload.questions)
    }
}

fn map_openai_error(err: OpenAIError) -> AppError {
    match err {
        OpenAIError::JSONDeserialize(err, _) => AppError::GenerationParseError(err.to_string()),
        other => AppError::GenerationTransportError(other.to_string()),
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiQuestionGenerator {
    async fn generate(
        &self,
        source_text: &str,
        question_count: i32,
        difficulty_level: i32,
    ) -> AppResult<Vec<QuestionDraft>> {
        let user_prompt = Self::build_user_prompt(source_text, question_count, difficulty_level);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(QUIZ_GENERATION_SYSTEM_PROMPT)
                    .build()
                    .map_err(map_openai_error)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(map_openai_error)?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(map_openai_error)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                AppError::GenerationTransportError(format!(
                    "generation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::GenerationParseError("completion contained no message content".into())
            })?;

        Self::parse_drafts(&content)
    }
}
