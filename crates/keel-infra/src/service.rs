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

//! The fallback generative service.

use keel_core::{
    BindingKind, CapabilityRegistry, FromRegistry, GenerationRequest, GenerativeService,
    RegistryError, ServiceError,
};

/// A generative service that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGenerativeService;

impl GenerativeService for NullGenerativeService {
    fn name(&self) -> &'static str {
        "null"
    }

    fn generate(&self, _request: &GenerationRequest) -> Result<String, ServiceError> {
        Err(ServiceError::Unavailable(self.name()))
    }
}

impl FromRegistry for NullGenerativeService {
    const KIND: BindingKind = BindingKind::Null;

    fn from_registry(_registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self)
    }
}
