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

//! Graphics backends.

mod null;
pub use null::NullGraphicsApi;

#[cfg(feature = "wgpu")]
mod wgpu_backend;
#[cfg(feature = "wgpu")]
pub use wgpu_backend::WgpuGraphicsApi;

/// The graphics backend compiled into this build.
#[cfg(feature = "wgpu")]
pub type DefaultGraphicsApi = WgpuGraphicsApi;

/// The graphics backend compiled into this build.
#[cfg(not(feature = "wgpu"))]
pub type DefaultGraphicsApi = NullGraphicsApi;

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{BindingKind, FromRegistry};

    #[test]
    fn default_graphics_kind_follows_features() {
        let expected = if cfg!(feature = "wgpu") {
            BindingKind::Real
        } else {
            BindingKind::Null
        };
        assert_eq!(<DefaultGraphicsApi as FromRegistry>::KIND, expected);
    }
}
