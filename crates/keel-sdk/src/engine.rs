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

//! Engine assembly and the startup entry point.

use crate::error::BootstrapError;
use crate::fallback::{FallbackNotice, FallbackPolicy};
use crate::game::DefaultGame;
use crate::logging::{LoggingComposer, LoggingReport};
use crate::runtime::DefaultRuntime;
use crate::wiring::{wire, Wiring};
use keel_core::{
    emit, BindingKind, CapabilityRegistry, CompositeLogger, ConfigStore, EntityManager,
    FromRegistry, Game, GenerativeService, GraphicsApi, GraphicsApiSettings, InputMapper,
    LifecycleState, LogSink, MessageHandler, Platform, PlatformSettings, Registration,
    RenderSystem, Runtime, SharedGame, StorageSystem,
};
use keel_infra::{
    ActionInputMapper, BasicRenderSystem, DefaultGraphicsApi, DefaultPlatform, FileStorage,
    NullGenerativeService, QueuedMessageHandler, SimpleEntityManager,
};
use log::Log;
use std::any::type_name;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Binds contract `$contract` to the [`FromRegistry`] type `$ty`, unless the
/// caller already bound it.
macro_rules! bind_default {
    ($registry:expr, $outcomes:expr, dyn $contract:ident, $ty:ty) => {{
        let outcome = $registry.register_if_absent::<dyn $contract, _>(
            type_name::<$ty>(),
            <$ty as FromRegistry>::KIND,
            |registry| Ok(Arc::new(<$ty>::from_registry(registry)?) as Arc<dyn $contract>),
        );
        $outcomes.push((stringify!($contract), outcome));
    }};
}

/// The public entry point of the engine.
pub struct Engine;

impl Engine {
    /// Starts configuring an engine session with the default implementations.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

/// Configures which implementations an engine session is assembled from.
///
/// The type parameters select the implementation bound to each replaceable
/// contract. Every other contract can be overridden by binding it in a
/// registry passed to [`with_registry`](Self::with_registry); bindings found
/// there always win over the defaults.
pub struct EngineBuilder<
    G = DefaultGame,
    R = DefaultRuntime,
    P = DefaultPlatform,
    RS = BasicRenderSystem,
    GA = DefaultGraphicsApi,
> {
    platform_settings: Option<PlatformSettings>,
    graphics_settings: GraphicsApiSettings,
    registry: Option<CapabilityRegistry>,
    suppress_warnings: bool,
    config_path: Option<PathBuf>,
    extra_sinks: Vec<Box<dyn LogSink>>,
    _types: PhantomData<fn() -> (G, R, P, RS, GA)>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Creates a builder with default implementations and settings.
    pub fn new() -> Self {
        Self {
            platform_settings: None,
            graphics_settings: GraphicsApiSettings::default(),
            registry: None,
            suppress_warnings: false,
            config_path: None,
            extra_sinks: Vec::new(),
            _types: PhantomData,
        }
    }
}

impl<G, R, P, RS, GA> EngineBuilder<G, R, P, RS, GA> {
    fn retype<G2, R2, P2, RS2, GA2>(self) -> EngineBuilder<G2, R2, P2, RS2, GA2> {
        EngineBuilder {
            platform_settings: self.platform_settings,
            graphics_settings: self.graphics_settings,
            registry: self.registry,
            suppress_warnings: self.suppress_warnings,
            config_path: self.config_path,
            extra_sinks: self.extra_sinks,
            _types: PhantomData,
        }
    }

    /// Selects the game implementation.
    pub fn game<T: Game + FromRegistry>(self) -> EngineBuilder<T, R, P, RS, GA> {
        self.retype()
    }

    /// Selects the runtime implementation.
    pub fn runtime<T: Runtime + FromRegistry>(self) -> EngineBuilder<G, T, P, RS, GA> {
        self.retype()
    }

    /// Selects the platform backend.
    pub fn platform<T: Platform + FromRegistry>(self) -> EngineBuilder<G, R, T, RS, GA> {
        self.retype()
    }

    /// Selects the render system.
    pub fn render_system<T: RenderSystem + FromRegistry>(self) -> EngineBuilder<G, R, P, T, GA> {
        self.retype()
    }

    /// Selects the graphics backend.
    pub fn graphics_api<T: GraphicsApi + FromRegistry>(self) -> EngineBuilder<G, R, P, RS, T> {
        self.retype()
    }

    /// Sets the settings handed to the platform when the runtime starts.
    ///
    /// Without this, the defaults are used with the title from `platform.title`.
    #[must_use]
    pub fn platform_settings(mut self, settings: PlatformSettings) -> Self {
        self.platform_settings = Some(settings);
        self
    }

    /// Sets the settings applied to the graphics backend during wiring.
    #[must_use]
    pub fn graphics_settings(mut self, settings: GraphicsApiSettings) -> Self {
        self.graphics_settings = settings;
        self
    }

    /// Assembles into a caller-provided registry. Its bindings take precedence.
    #[must_use]
    pub fn with_registry(mut self, registry: CapabilityRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Silences fallback warnings for this session.
    #[must_use]
    pub fn suppress_bootstrap_warnings(mut self, suppress: bool) -> Self {
        self.suppress_warnings = suppress;
        self
    }

    /// Loads configuration from `path` instead of the conventional location.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Adds a log sink next to the ones derived from configuration.
    #[must_use]
    pub fn with_log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.extra_sinks.push(sink);
        self
    }
}

impl<G, R, P, RS, GA> EngineBuilder<G, R, P, RS, GA>
where
    G: Game + FromRegistry,
    R: Runtime + FromRegistry,
    P: Platform + FromRegistry,
    RS: RenderSystem + FromRegistry,
    GA: GraphicsApi + FromRegistry,
{
    /// Assembles the session without starting the frame loop.
    ///
    /// # Errors
    ///
    /// Returns the first assembly-fatal error: a broken configuration source
    /// or a capability that cannot be constructed.
    pub fn assemble(self) -> Result<AssembledEngine, BootstrapError> {
        let mut registry = self.registry.unwrap_or_default();

        // 1. Configuration, before any capability exists.
        let config = if registry.contains::<ConfigStore>() {
            registry.resolve::<ConfigStore>()?
        } else {
            let store = match &self.config_path {
                Some(path) => ConfigStore::load(path)?,
                None => ConfigStore::load_default()?,
            };
            let store = Arc::new(store);
            registry.register_instance(Arc::clone(&store));
            store
        };

        // 2. Default bindings for every contract the caller left open.
        let mut outcomes: Vec<(&'static str, Registration)> = Vec::new();
        bind_default!(registry, outcomes, dyn Platform, P);
        bind_default!(registry, outcomes, dyn GraphicsApi, GA);
        bind_default!(registry, outcomes, dyn RenderSystem, RS);
        bind_default!(registry, outcomes, dyn EntityManager, SimpleEntityManager);
        bind_default!(registry, outcomes, dyn MessageHandler, QueuedMessageHandler);
        bind_default!(registry, outcomes, dyn InputMapper, ActionInputMapper);
        bind_default!(registry, outcomes, dyn StorageSystem, FileStorage);
        bind_default!(registry, outcomes, dyn GenerativeService, NullGenerativeService);
        bind_default!(registry, outcomes, dyn Runtime, R);
        let game_outcome = registry.register_if_absent::<Mutex<dyn Game>, _>(
            type_name::<G>(),
            G::KIND,
            |registry| Ok(Arc::new(Mutex::new(G::from_registry(registry)?)) as SharedGame),
        );
        outcomes.push(("Game", game_outcome));

        // 3. The session logger. Everything from here on logs through it.
        let (logger, logging) = if registry.contains::<CompositeLogger>() {
            (registry.resolve::<CompositeLogger>()?, LoggingReport::default())
        } else {
            let (logger, report) = LoggingComposer::new()
                .with_sinks(self.extra_sinks)
                .compose(&config);
            let logger = Arc::new(logger);
            registry.register_instance(Arc::clone(&logger));
            (logger, report)
        };
        emit!(logger, Info, "Keel engine: assembling session...");
        emit!(logger, Info, "Configuration loaded from {}", config.source());
        for warning in &logging.warnings {
            emit!(logger, Warn, "Logging configuration: {}", warning);
        }
        for skipped in &logging.skipped {
            emit!(logger, Debug, "Log sink '{}' not attached: {}", skipped.sink, skipped.reason);
        }
        for (contract, outcome) in &outcomes {
            if *outcome == Registration::Kept {
                emit!(logger, Debug, "Using the caller's binding for {}", contract);
            }
        }

        // 4. Fallback report.
        let notices =
            FallbackPolicy::new(&registry, &logger, &config, self.suppress_warnings).check();

        // 5. Capability summary.
        emit!(logger, Info, "--- Capability Summary ---");
        for binding in registry.report() {
            let kind = match binding.kind {
                BindingKind::Real => "real",
                BindingKind::Null => "null",
            };
            emit!(
                logger,
                Info,
                "  {} => {} ({})",
                binding.contract,
                binding.implementation,
                kind
            );
        }
        emit!(logger, Info, "--------------------------");

        // 6. Wiring, then the game.
        let wiring = wire(&registry, &self.graphics_settings, &logger)?;
        let game = registry.resolve::<Mutex<dyn Game>>()?;

        let platform_settings = self.platform_settings.unwrap_or_else(|| PlatformSettings {
            title: config.get_or("platform.title", "Keel").to_string(),
            ..PlatformSettings::default()
        });

        Ok(AssembledEngine {
            registry,
            logger,
            wiring,
            game,
            platform_settings,
            notices,
            logging,
        })
    }

    /// Assembles the session and runs it until the runtime terminates.
    ///
    /// # Errors
    ///
    /// See [`assemble`](Self::assemble) and [`AssembledEngine::run`].
    pub fn run(self) -> Result<SessionSummary, BootstrapError> {
        self.assemble()?.run()
    }
}

/// A fully wired session that has not started yet.
pub struct AssembledEngine {
    registry: CapabilityRegistry,
    logger: Arc<CompositeLogger>,
    wiring: Wiring,
    game: SharedGame,
    platform_settings: PlatformSettings,
    notices: Vec<FallbackNotice>,
    logging: LoggingReport,
}

impl AssembledEngine {
    /// The registry holding every binding of the session.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// The session logger.
    pub fn logger(&self) -> &Arc<CompositeLogger> {
        &self.logger
    }

    /// The runtime that [`run`](Self::run) will start.
    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.wiring.runtime
    }

    /// The resolved and linked subsystems.
    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// The fallback notices logged during assembly.
    pub fn notices(&self) -> &[FallbackNotice] {
        &self.notices
    }

    /// What the logging composer attached.
    pub fn logging_report(&self) -> &LoggingReport {
        &self.logging
    }

    /// Starts the runtime. Blocks until the loop exits.
    pub fn run(self) -> Result<SessionSummary, BootstrapError> {
        let runtime = Arc::clone(&self.wiring.runtime);
        runtime.start_game(Arc::clone(&self.game), &self.platform_settings)?;

        let summary = SessionSummary {
            ticks: runtime.tick_count(),
            state: runtime.state(),
            notices: self.notices,
        };
        emit!(self.logger, Info, "Session finished after {} ticks.", summary.ticks);
        self.logger.flush();
        Ok(summary)
    }
}

/// The outcome of a finished session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Ticks executed by the runtime.
    pub ticks: u64,
    /// The final runtime state.
    pub state: LifecycleState,
    /// Fallback notices logged during assembly.
    pub notices: Vec<FallbackNotice>,
}
