//! HTTP-backed [`TextModel`] implementations.
//!
//! The engine's model seam is synchronous; this module owns the bridge to
//! reqwest, the per-call timeout, and the provider wire formats. Keys come
//! from the environment (`ANTHROPIC_API_KEY` / `OPENAI_API_KEY`), never from
//! the config file.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mentor_core::{ModelError, ModelRequest, NullModel, TextModel};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Anthropic,
    OpenAI,
}

pub struct HttpTextModel {
    provider: Provider,
    model: String,
    base_url: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

/// Build the model the config asks for. `provider = "none"` wires in the
/// [`NullModel`], which keeps every engine flow on its deterministic path.
/// A named provider without its key in the environment is a configuration
/// error worth failing loudly on.
pub fn build_model(config: &Config) -> Result<Arc<dyn TextModel>> {
    let section = &config.model;
    let timeout = config.engine.model_timeout();

    match section.provider.trim().to_lowercase().as_str() {
        "" | "none" => {
            debug!("no model provider configured, deterministic paths only");
            Ok(Arc::new(NullModel))
        }
        "anthropic" => {
            let api_key = match std::env::var("ANTHROPIC_API_KEY") {
                Ok(key) if !key.trim().is_empty() => key,
                _ => bail!("provider is \"anthropic\" but ANTHROPIC_API_KEY is not set"),
            };
            let base_url = if section.base_url.is_empty() {
                "https://api.anthropic.com".to_string()
            } else {
                section.base_url.trim_end_matches('/').to_string()
            };
            Ok(Arc::new(HttpTextModel {
                provider: Provider::Anthropic,
                model: section.model.clone(),
                base_url,
                api_key,
                max_tokens: section.max_tokens,
                temperature: section.temperature,
                timeout,
            }))
        }
        "openai" => {
            let api_key = match std::env::var("OPENAI_API_KEY") {
                Ok(key) if !key.trim().is_empty() => key,
                _ => bail!("provider is \"openai\" but OPENAI_API_KEY is not set"),
            };
            let base_url = if section.base_url.is_empty() {
                "https://api.openai.com".to_string()
            } else {
                section.base_url.trim_end_matches('/').to_string()
            };
            Ok(Arc::new(HttpTextModel {
                provider: Provider::OpenAI,
                model: section.model.clone(),
                base_url,
                api_key,
                max_tokens: section.max_tokens,
                temperature: section.temperature,
                timeout,
            }))
        }
        other => bail!("unknown model provider: {other} (expected anthropic, openai, or none)"),
    }
}

impl TextModel for HttpTextModel {
    fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        // The CLI runs under #[tokio::main], so we're usually already inside
        // a runtime; block_on there would panic. Outside one (library use,
        // plain tests) we make our own.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.generate_async(request)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| ModelError::Transport(e.to_string()))?;
            rt.block_on(self.generate_async(request))
        }
    }
}

impl HttpTextModel {
    async fn generate_async(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let text = match self.provider {
            Provider::Anthropic => self.anthropic(request).await?,
            Provider::OpenAI => self.openai(request).await?,
        };
        if text.trim().is_empty() {
            return Err(ModelError::EmptyReply);
        }
        Ok(text)
    }

    async fn anthropic(&self, request: &ModelRequest) -> Result<String, ModelError> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            max_tokens: u32,
            temperature: f32,
            system: String,
            messages: Vec<Msg>,
        }

        #[derive(Deserialize)]
        struct Resp {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            t: String,
            text: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: request.system.clone(),
            messages: vec![Msg { role: "user".to_string(), content: request.prompt.clone() }],
        };

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::UnexpectedStatus { status: status.as_u16(), body });
        }

        let out: Resp = resp.json().await.map_err(map_reqwest_error)?;
        let mut text = String::new();
        for block in out.content {
            if block.t == "text" {
                if let Some(t) = block.text {
                    text.push_str(&t);
                }
            }
        }
        Ok(text.trim().to_string())
    }

    async fn openai(&self, request: &ModelRequest) -> Result<String, ModelError> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            messages: Vec<Msg>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            messages: vec![
                Msg { role: "system".to_string(), content: request.system.clone() },
                Msg { role: "user".to_string(), content: request.prompt.clone() },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::UnexpectedStatus { status: status.as_u16(), body });
        }

        let out: Resp = resp.json().await.map_err(map_reqwest_error)?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }
}

fn map_reqwest_error(error: reqwest::Error) -> ModelError {
    if error.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_provider(provider: &str) -> Config {
        let mut config = Config::default();
        config.model.provider = provider.to_string();
        config
    }

    #[test]
    fn test_none_provider_builds_null_model() {
        let model = build_model(&config_with_provider("none")).unwrap();
        let request = ModelRequest { system: String::new(), prompt: "hi".to_string() };
        assert!(matches!(model.generate(&request), Err(ModelError::Disabled)));
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        assert!(build_model(&config_with_provider("petstore")).is_err());
    }
}
