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

//! The graphics backend contract.

use crate::error::BackendError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// The depth comparison used for every pipeline the backend builds.
///
/// Shaders and pipelines are compiled against this mode, so it should be set
/// once before the first shader is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthTestingMode {
    /// No depth test. Later draws always win.
    Disabled,
    /// Passes if the incoming depth is less than the stored depth.
    #[default]
    Less,
    /// Passes if the incoming depth is less than or equal to the stored depth.
    LessEqual,
    /// Passes if the incoming depth is greater than the stored depth (reverse-Z).
    Greater,
    /// Always passes, but depth is still written.
    Always,
}

impl fmt::Display for DepthTestingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepthTestingMode::Disabled => "disabled",
            DepthTestingMode::Less => "less",
            DepthTestingMode::LessEqual => "less_equal",
            DepthTestingMode::Greater => "greater",
            DepthTestingMode::Always => "always",
        };
        f.write_str(name)
    }
}

impl FromStr for DepthTestingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            "less" => Ok(Self::Less),
            "less_equal" | "lequal" => Ok(Self::LessEqual),
            "greater" => Ok(Self::Greater),
            "always" => Ok(Self::Always),
            other => Err(format!("unknown depth testing mode '{other}'")),
        }
    }
}

/// Caller-supplied settings for the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsApiSettings {
    /// Applied once during wiring, before any shader compilation.
    pub depth_testing_mode: DepthTestingMode,
}

/// Source code for a shader module.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// A descriptive label used in diagnostics.
    pub label: Cow<'static, str>,
    /// WGSL source text.
    pub wgsl: Cow<'static, str>,
}

/// An opaque handle to a compiled shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u64);

/// Abstracts a graphics API (GPU device, command submission).
pub trait GraphicsApi: Send + Sync {
    /// A short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Sets the depth comparison used by subsequently compiled shaders.
    fn set_depth_testing_mode(&self, mode: DepthTestingMode);

    /// Returns the active depth comparison.
    fn depth_testing_mode(&self) -> DepthTestingMode;

    /// Compiles a shader module against the active depth mode.
    fn compile_shader(&self, source: &ShaderSource) -> Result<ShaderId, BackendError>;

    /// Returns `false` if `shader` is unknown or was invalidated by a later
    /// depth mode change. Backends that never invalidate shaders keep the default.
    fn is_shader_compiled(&self, _shader: ShaderId) -> bool {
        true
    }

    /// Starts recording a frame.
    fn begin_frame(&self) -> Result<(), BackendError>;

    /// Records a draw of `instance_count` instances with `shader`.
    fn draw(&self, shader: ShaderId, instance_count: u32) -> Result<(), BackendError>;

    /// Submits the recorded frame.
    fn end_frame(&self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_mode_parses_aliases() {
        assert_eq!("off".parse::<DepthTestingMode>(), Ok(DepthTestingMode::Disabled));
        assert_eq!("LEQUAL".parse::<DepthTestingMode>(), Ok(DepthTestingMode::LessEqual));
        assert!("sideways".parse::<DepthTestingMode>().is_err());
    }

    #[test]
    fn depth_mode_display_round_trips() {
        for mode in [
            DepthTestingMode::Disabled,
            DepthTestingMode::Less,
            DepthTestingMode::LessEqual,
            DepthTestingMode::Greater,
            DepthTestingMode::Always,
        ] {
            assert_eq!(mode.to_string().parse::<DepthTestingMode>(), Ok(mode));
        }
    }
}
