use anyhow::Result;
use async_trait::async_trait;

use crate::traits::PromptBuilder;

use super::types::*;
use super::OpenAi;

pub struct OpenAiPromptBuilder {
    agent: OpenAi,
    input: String,
    preamble: Option<String>,
    temperature: Option<f32>,
    json_object: bool,
}

impl OpenAiPromptBuilder {
    pub(crate) fn new(agent: OpenAi, input: String) -> Self {
        Self {
            agent,
            input,
            preamble: None,
            temperature: None,
            json_object: false,
        }
    }

    pub(crate) fn build_request(&self) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(ref preamble) = self.preamble {
            messages.push(WireMessage::system(preamble));
        }

        if !self.input.is_empty() {
            messages.push(WireMessage::user(&self.input));
        }

        let mut request = ChatRequest::new(&self.agent.model).messages(messages);

        // Reasoning models reject a custom temperature.
        if let Some(temp) = self.temperature {
            if !is_reasoning_model(&self.agent.model) {
                request = request.temperature(temp);
            }
        }

        if self.json_object {
            request = request.json_object();
        }

        request
    }
}

#[async_trait]
impl PromptBuilder for OpenAiPromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn json_object(mut self) -> Self {
        self.json_object = true;
        self
    }

    async fn send(self) -> Result<String> {
        let request = self.build_request();
        self.agent.client().chat_text(&request).await
    }
}
