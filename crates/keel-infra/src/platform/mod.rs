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

//! Platform backends.

mod null;
pub use null::NullPlatform;

#[cfg(feature = "headless")]
mod headless;
#[cfg(feature = "headless")]
pub use headless::HeadlessPlatform;

/// The platform backend compiled into this build.
#[cfg(feature = "headless")]
pub type DefaultPlatform = HeadlessPlatform;

/// The platform backend compiled into this build.
#[cfg(not(feature = "headless"))]
pub type DefaultPlatform = NullPlatform;

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{BindingKind, FromRegistry};

    #[test]
    fn default_platform_kind_follows_features() {
        let expected = if cfg!(feature = "headless") {
            BindingKind::Real
        } else {
            BindingKind::Null
        };
        assert_eq!(<DefaultPlatform as FromRegistry>::KIND, expected);
    }
}
