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

//! Warns when a capability is served by a null fallback.
//!
//! Backend selection itself is static (cargo features pick the type aliases in
//! `keel-infra`). This module only reports the outcome so that a session
//! running on fallbacks is visible in the log.

use keel_core::{
    emit, BindingKind, CapabilityRegistry, CompositeLogger, ConfigStore, GenerativeService,
    GraphicsApi, Platform,
};
use log::Level;

/// Config key that silences fallback warnings.
pub const SUPPRESS_WARNINGS_KEY: &str = "bootstrap.suppress_warnings";

/// One fallback that was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackNotice {
    /// The human-readable capability label, e.g. `Platform`.
    pub capability: &'static str,
    /// The name of the null implementation in use.
    pub implementation: &'static str,
    /// The level the notice was logged at.
    pub level: Level,
}

/// Inspects the registry for null bindings after the logger is available.
pub struct FallbackPolicy<'a> {
    registry: &'a CapabilityRegistry,
    logger: &'a CompositeLogger,
    suppressed: bool,
    config_warning: Option<String>,
}

impl<'a> FallbackPolicy<'a> {
    /// Creates the policy. Warnings are suppressed when `suppress` is set or
    /// when the config enables [`SUPPRESS_WARNINGS_KEY`].
    ///
    /// A malformed [`SUPPRESS_WARNINGS_KEY`] value does not suppress anything;
    /// it is kept as a config warning and logged by [`check`](Self::check).
    pub fn new(
        registry: &'a CapabilityRegistry,
        logger: &'a CompositeLogger,
        config: &ConfigStore,
        suppress: bool,
    ) -> Self {
        let (from_config, config_warning) = match config.parse_or(SUPPRESS_WARNINGS_KEY, false) {
            Ok(value) => (value, None),
            Err(e) => (false, Some(e.to_string())),
        };
        Self {
            registry,
            logger,
            suppressed: suppress || from_config,
            config_warning,
        }
    }

    /// Returns `true` if warnings are suppressed for this session.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// The problem with [`SUPPRESS_WARNINGS_KEY`], if its value was malformed.
    pub fn config_warning(&self) -> Option<&str> {
        self.config_warning.as_deref()
    }

    /// Checks the fallback-capable contracts and returns what was logged.
    ///
    /// Platform and graphics fallbacks are warnings. A null generative service
    /// is expected in most sessions and only noted at info level.
    pub fn check(&self) -> Vec<FallbackNotice> {
        if let Some(warning) = &self.config_warning {
            emit!(self.logger, Warn, "Bootstrap configuration: {}", warning);
        }
        [
            self.check_contract::<dyn Platform>("Platform", Level::Warn),
            self.check_contract::<dyn GraphicsApi>("GraphicsApi", Level::Warn),
            self.check_contract::<dyn GenerativeService>("GenerativeService", Level::Info),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Checks one contract. Logs at most one notice for it.
    ///
    /// Returns `None` when the contract is unbound, bound to a real
    /// implementation, or when a warning-level notice is suppressed.
    pub fn check_contract<C: ?Sized + 'static>(
        &self,
        capability: &'static str,
        level: Level,
    ) -> Option<FallbackNotice> {
        if self.registry.binding_kind::<C>()? != BindingKind::Null {
            return None;
        }
        if self.suppressed && level <= Level::Warn {
            return None;
        }
        let implementation = self.registry.implementation_name::<C>().unwrap_or("unknown");

        let message = if level <= Level::Warn {
            format!(
                "{capability} capability is not available; running on the no-op fallback `{implementation}`. \
                 Add a {capability} backend (enable its cargo feature or register one) for real output."
            )
        } else {
            format!("{capability} capability uses the no-op fallback `{implementation}`.")
        };
        self.logger
            .emit(level, module_path!(), format_args!("{message}"));

        Some(FallbackNotice {
            capability,
            implementation,
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_infra::{MemoryLog, NullGenerativeService, NullGraphicsApi, NullPlatform};
    use log::LevelFilter;
    use std::sync::Arc;

    fn null_registry() -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        registry.register_null::<dyn Platform, _>("NullPlatform", |_| {
            Ok(Arc::new(NullPlatform::new()) as Arc<dyn Platform>)
        });
        registry.register_null::<dyn GraphicsApi, _>("NullGraphicsApi", |_| {
            Ok(Arc::new(NullGraphicsApi::new()) as Arc<dyn GraphicsApi>)
        });
        registry.register_null::<dyn GenerativeService, _>("NullGenerativeService", |_| {
            Ok(Arc::new(NullGenerativeService) as Arc<dyn GenerativeService>)
        });
        registry
    }

    #[test]
    fn warns_once_per_null_backend() {
        let registry = null_registry();
        let memory = MemoryLog::new();
        let logger = CompositeLogger::new(LevelFilter::Trace).with_sink(Box::new(memory.sink()));
        let config = ConfigStore::parse_inline("").unwrap();

        let notices = FallbackPolicy::new(&registry, &logger, &config, false).check();

        assert_eq!(notices.len(), 3);
        assert_eq!(memory.count_at(Level::Warn), 2);
        assert_eq!(memory.count_at(Level::Info), 1);
        assert!(memory.contains("Platform capability is not available"));
    }

    #[test]
    fn config_key_suppresses_warnings() {
        let registry = null_registry();
        let memory = MemoryLog::new();
        let logger = CompositeLogger::new(LevelFilter::Trace).with_sink(Box::new(memory.sink()));
        let config =
            ConfigStore::parse_inline("[bootstrap]\nsuppress_warnings = true").unwrap();

        let policy = FallbackPolicy::new(&registry, &logger, &config, false);
        let notices = policy.check();

        assert!(policy.is_suppressed());
        assert_eq!(memory.count_at(Level::Warn), 0);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].capability, "GenerativeService");
    }

    #[test]
    fn malformed_suppress_value_is_reported_and_not_applied() {
        let registry = null_registry();
        let memory = MemoryLog::new();
        let logger = CompositeLogger::new(LevelFilter::Trace).with_sink(Box::new(memory.sink()));
        let config = ConfigStore::parse_inline("[bootstrap]\nsuppress_warnings = \"maybe\"").unwrap();

        let policy = FallbackPolicy::new(&registry, &logger, &config, false);
        assert!(!policy.is_suppressed());
        assert!(policy
            .config_warning()
            .is_some_and(|w| w.contains(SUPPRESS_WARNINGS_KEY)));

        let notices = policy.check();
        assert_eq!(notices.len(), 3);
        // Two fallback warnings plus the config problem.
        assert_eq!(memory.count_at(Level::Warn), 3);
        assert!(memory.contains("Bootstrap configuration"));
    }

    #[test]
    fn real_and_unbound_contracts_are_silent() {
        let registry = CapabilityRegistry::new();
        let memory = MemoryLog::new();
        let logger = CompositeLogger::new(LevelFilter::Trace).with_sink(Box::new(memory.sink()));
        let config = ConfigStore::parse_inline("").unwrap();

        assert!(FallbackPolicy::new(&registry, &logger, &config, false)
            .check()
            .is_empty());
        assert!(memory.records().is_empty());
    }
}
