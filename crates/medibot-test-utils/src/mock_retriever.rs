// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock answer retriever with a FIFO script.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use medibot_core::{
    AdapterType, AnswerResult, AnswerRetriever, HealthStatus, MedibotError, PluginAdapter,
};

/// One scripted reaction to `retrieve`.
#[derive(Debug, Clone)]
pub enum Scripted {
    Answer(String),
    Fail(String),
    /// Panics inside `retrieve`, for exercising the handler's panic boundary.
    Panic(String),
}

/// Pops one [`Scripted`] step per call; answers "mock answer" once the
/// script runs out. Every question is recorded.
pub struct MockRetriever {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(steps: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answering(text: impl Into<String>) -> Self {
        Self::with_script(vec![Scripted::Answer(text.into())])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(vec![Scripted::Fail(message.into())])
    }

    pub async fn questions(&self) -> Vec<String> {
        self.questions.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.questions.lock().await.len()
    }
}

impl Default for MockRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRetriever {
    fn name(&self) -> &str {
        "mock-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retriever
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AnswerRetriever for MockRetriever {
    async fn retrieve(&self, question: &str) -> Result<AnswerResult, MedibotError> {
        self.questions.lock().await.push(question.to_string());
        let step = self.script.lock().await.pop_front();
        match step {
            None => Ok(AnswerResult::new("mock answer")),
            Some(Scripted::Answer(text)) => Ok(AnswerResult::new(text)),
            Some(Scripted::Fail(message)) => Err(MedibotError::Retrieval {
                message,
                source: None,
            }),
            Some(Scripted::Panic(message)) => panic!("{message}"),
        }
    }
}
