// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be held as `Arc<dyn Trait>`.

pub mod adapter;
pub mod completion;
pub mod directory;
pub mod embedding;
pub mod messenger;
pub mod retriever;
pub mod vector;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use directory::UserDirectory;
pub use embedding::EmbeddingAdapter;
pub use messenger::Messenger;
pub use retriever::AnswerRetriever;
pub use vector::VectorIndex;
