// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The auxiliary generative-service contract.
//!
//! The client itself is an external collaborator. Only the call boundary is
//! defined here.

use thiserror::Error;

/// A request for generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The prompt text.
    pub prompt: String,
    /// Upper bound on the length of the answer, in backend units.
    pub max_tokens: u32,
}

/// Errors raised by a generative service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No service is configured in this build.
    #[error("generative service '{0}' is unavailable")]
    Unavailable(&'static str),
    /// The service rejected or failed the request.
    #[error("generation request failed: {0}")]
    Request(String),
}

/// A client for a text-generation service.
pub trait GenerativeService: Send + Sync {
    /// A short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Generates text for the request.
    fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError>;
}
