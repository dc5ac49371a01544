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

//! The reference frame-loop runtime.

use keel_core::{
    emit, CapabilityRegistry, CompositeLogger, ConfigError, ConfigStore, FromRegistry, Game,
    LifecycleState, Platform, PlatformEvent, PlatformSettings, RegistryError, Runtime,
    RuntimeError, SharedGame,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Loop parameters read from the `[runtime]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Fixed simulation rate.
    pub ticks_per_second: u32,
    /// Stops the loop after this many ticks. `0` means unbounded.
    pub max_ticks: u64,
    /// Sleep out the remainder of each step.
    pub frame_pacing: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            max_ticks: 0,
            frame_pacing: true,
        }
    }
}

impl RuntimeSettings {
    /// Reads the settings, falling back to the defaults for absent keys.
    pub fn from_config(config: &ConfigStore) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ticks_per_second =
            config.parse_or("runtime.ticks_per_second", defaults.ticks_per_second)?;
        if ticks_per_second == 0 {
            return Err(ConfigError::invalid_value(
                "runtime.ticks_per_second",
                "0",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            ticks_per_second,
            max_ticks: config.parse_or("runtime.max_ticks", defaults.max_ticks)?,
            frame_pacing: config.parse_or("runtime.frame_pacing", defaults.frame_pacing)?,
        })
    }

    /// The length of one simulation step.
    pub fn step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.ticks_per_second.max(1)))
    }
}

/// Computes the interpolation factor for a render `elapsed` after the last update.
pub fn interpolation_alpha(elapsed: Duration, step: Duration) -> f64 {
    if step.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / step.as_secs_f64()).clamp(0.0, 1.0)
}

/// Runs a [`Game`] on the calling thread until terminated.
pub struct DefaultRuntime {
    platform: Arc<dyn Platform>,
    logger: Arc<CompositeLogger>,
    settings: RuntimeSettings,
    started: AtomicBool,
    terminate_requested: AtomicBool,
    state: Mutex<LifecycleState>,
    ticks: AtomicU64,
}

impl DefaultRuntime {
    /// Creates a runtime over `platform`.
    pub fn new(
        platform: Arc<dyn Platform>,
        logger: Arc<CompositeLogger>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            platform,
            logger,
            settings,
            started: AtomicBool::new(false),
            terminate_requested: AtomicBool::new(false),
            state: Mutex::new(LifecycleState::Uninitialized),
            ticks: AtomicU64::new(0),
        }
    }

    /// Returns the loop settings.
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    fn set_state(&self, state: LifecycleState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn is_terminate_requested(&self) -> bool {
        self.terminate_requested.load(Ordering::Acquire)
    }

    fn handle_platform_events(&self) {
        for event in self.platform.poll_events() {
            match event {
                PlatformEvent::CloseRequested => {
                    emit!(self.logger, Info, "Close requested by the platform.");
                    self.terminate();
                }
                PlatformEvent::Resized { width, height } => {
                    emit!(self.logger, Debug, "Platform resized to {}x{}", width, height);
                }
                PlatformEvent::FocusChanged(focused) => {
                    emit!(self.logger, Debug, "Platform focus changed: {}", focused);
                }
            }
        }
    }

    fn run_loop(&self, game: &SharedGame) {
        let step = self.settings.step();

        while !self.is_terminate_requested() {
            let tick_start = Instant::now();

            // 1. Platform events. A close request takes effect after this tick.
            self.handle_platform_events();

            // 2. Simulation.
            let update_start = Instant::now();
            lock_game(game).update();

            // 3. Rendering.
            let alpha = interpolation_alpha(update_start.elapsed(), step);
            lock_game(game).render(alpha);

            let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            emit!(self.logger, Trace, "Tick {} complete (alpha {:.3})", tick, alpha);

            if self.settings.max_ticks > 0 && tick >= self.settings.max_ticks {
                emit!(self.logger, Info, "Reached runtime.max_ticks ({}).", tick);
                self.terminate();
            }

            if self.settings.frame_pacing && !self.is_terminate_requested() {
                if let Some(remaining) = step.checked_sub(tick_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }
    }
}

fn lock_game(game: &SharedGame) -> MutexGuard<'_, dyn Game + 'static> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Runtime for DefaultRuntime {
    fn start_game(&self, game: SharedGame, settings: &PlatformSettings) -> Result<(), RuntimeError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::AlreadyStarted(self.state()));
        }

        emit!(
            self.logger,
            Info,
            "Starting runtime on platform '{}' at {} ticks/s",
            self.platform.name(),
            self.settings.ticks_per_second
        );
        if let Err(e) = self.platform.open(settings) {
            self.set_state(LifecycleState::Terminated);
            return Err(e.into());
        }

        lock_game(&game).initialize();
        self.set_state(LifecycleState::Running);

        self.run_loop(&game);

        lock_game(&game).terminate();
        self.platform.close();
        self.set_state(LifecycleState::Terminated);
        emit!(
            self.logger,
            Info,
            "Runtime terminated after {} ticks.",
            self.tick_count()
        );
        Ok(())
    }

    fn terminate(&self) {
        self.terminate_requested.store(true, Ordering::Release);
    }

    fn state(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl FromRegistry for DefaultRuntime {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        let config = registry.resolve::<ConfigStore>()?;
        let settings =
            RuntimeSettings::from_config(&config).map_err(RegistryError::construction::<Self>)?;
        Ok(Self::new(
            registry.resolve::<dyn Platform>()?,
            registry.resolve::<CompositeLogger>()?,
            settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_infra::NullPlatform;
    use log::LevelFilter;

    #[derive(Default)]
    struct Counter {
        initialized: u32,
        updates: u32,
        renders: u32,
        terminated: u32,
    }

    impl Game for Counter {
        fn initialize(&mut self) {
            self.initialized += 1;
        }
        fn update(&mut self) {
            self.updates += 1;
        }
        fn render(&mut self, alpha: f64) {
            assert!((0.0..=1.0).contains(&alpha));
            self.renders += 1;
        }
        fn terminate(&mut self) {
            self.terminated += 1;
        }
    }

    fn runtime(max_ticks: u64) -> DefaultRuntime {
        DefaultRuntime::new(
            Arc::new(NullPlatform::new()),
            Arc::new(CompositeLogger::new(LevelFilter::Off)),
            RuntimeSettings {
                ticks_per_second: 1000,
                max_ticks,
                frame_pacing: false,
            },
        )
    }

    #[test]
    fn runs_until_max_ticks() {
        let runtime = runtime(5);
        let counter = Arc::new(Mutex::new(Counter::default()));

        runtime
            .start_game(counter.clone(), &PlatformSettings::default())
            .unwrap();

        let counter = counter.lock().unwrap();
        assert_eq!(counter.initialized, 1);
        assert_eq!(counter.updates, 5);
        assert_eq!(counter.renders, 5);
        assert_eq!(counter.terminated, 1);
        assert_eq!(runtime.tick_count(), 5);
        assert_eq!(runtime.state(), LifecycleState::Terminated);
    }

    #[test]
    fn second_start_is_rejected() {
        let runtime = runtime(1);
        let counter = Arc::new(Mutex::new(Counter::default()));
        runtime
            .start_game(counter.clone(), &PlatformSettings::default())
            .unwrap();

        let err = runtime
            .start_game(counter.clone(), &PlatformSettings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::AlreadyStarted(LifecycleState::Terminated)
        ));
        assert_eq!(counter.lock().unwrap().updates, 1);
    }

    #[test]
    fn terminate_before_start_skips_every_tick() {
        let runtime = runtime(0);
        runtime.terminate();
        let counter = Arc::new(Mutex::new(Counter::default()));

        runtime
            .start_game(counter.clone(), &PlatformSettings::default())
            .unwrap();

        let counter = counter.lock().unwrap();
        assert_eq!((counter.initialized, counter.updates, counter.terminated), (1, 0, 1));
    }

    #[test]
    fn settings_from_config() {
        let config = ConfigStore::parse_inline(
            "[runtime]\nticks_per_second = 30\nmax_ticks = 9\nframe_pacing = false",
        )
        .unwrap();
        let settings = RuntimeSettings::from_config(&config).unwrap();
        assert_eq!(settings.max_ticks, 9);
        assert_eq!(settings.step(), Duration::from_secs_f64(1.0 / 30.0));

        let zero = ConfigStore::parse_inline("[runtime]\nticks_per_second = 0").unwrap();
        assert!(RuntimeSettings::from_config(&zero).is_err());
    }

    #[test]
    fn alpha_is_clamped() {
        let step = Duration::from_millis(10);
        assert_eq!(interpolation_alpha(Duration::ZERO, step), 0.0);
        assert_eq!(interpolation_alpha(Duration::from_millis(5), step), 0.5);
        assert_eq!(interpolation_alpha(Duration::from_secs(1), step), 1.0);
    }
}
