// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Medibot's collaborator traits.
//!
//! - [`MockMessenger`] - captures outbound sends, optionally failing them
//! - [`MockRetriever`] - replays scripted answers, errors or panics
//! - [`MockUserDirectory`] - in-memory user directory

pub mod mock_directory;
pub mod mock_messenger;
pub mod mock_retriever;

pub use mock_directory::MockUserDirectory;
pub use mock_messenger::{MockMessenger, SentMessage};
pub use mock_retriever::{MockRetriever, Scripted};
