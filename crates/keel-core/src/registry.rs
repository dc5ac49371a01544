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

//! A type-keyed container that binds capability contracts to implementations.
//!
//! The [`CapabilityRegistry`] maps a *contract* type (usually a trait object such
//! as `dyn Platform`, or a plain value type such as
//! [`ConfigStore`](crate::config::ConfigStore)) to exactly one binding. A binding
//! is either a factory, run lazily the first time the contract is resolved, or an
//! existing instance.
//!
//! # Semantics
//!
//! * **Register before resolve.** Resolving a contract with no binding fails with
//!   [`RegistryError::Unregistered`]; the registry never invents a default.
//! * **Singleton per registry.** The first successful resolution memoizes the
//!   `Arc`; every later call returns a clone of that same `Arc`.
//! * **Explicit dependencies.** A factory receives the registry and resolves the
//!   contracts it depends on itself. A contract that is re-entered while still
//!   under construction is reported as [`RegistryError::Cycle`].
//!
//! # Example
//!
//! ```rust
//! use keel_core::registry::CapabilityRegistry;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let mut registry = CapabilityRegistry::new();
//! registry.register::<dyn Greeter, _>("English", |_| Ok(Arc::new(English) as Arc<dyn Greeter>));
//!
//! let first = registry.resolve::<dyn Greeter>().unwrap();
//! let second = registry.resolve::<dyn Greeter>().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(first.greet(), "hello");
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// A boxed error produced by a capability constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Factory<C> = Box<dyn FnOnce(&CapabilityRegistry) -> Result<Arc<C>, RegistryError> + Send>;

/// Whether a binding is a real backend or an inert fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingKind {
    /// A functional implementation.
    #[default]
    Real,
    /// A no-op implementation standing in for a missing backend.
    Null,
}

/// Errors raised while resolving capabilities. All of them are assembly-fatal.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The contract was resolved without a prior binding.
    #[error("no binding registered for capability `{contract}`; register it before resolving")]
    Unregistered {
        /// The type name of the contract.
        contract: &'static str,
    },
    /// The contract was re-entered while it was still being constructed.
    #[error("capability dependency cycle: {}", .path.join(" -> "))]
    Cycle {
        /// The chain of contracts, starting and ending with the re-entered one.
        path: Vec<&'static str>,
    },
    /// A constructor failed.
    #[error("failed to construct `{implementation}`: {source}")]
    Construction {
        /// The type name of the implementation that failed.
        implementation: &'static str,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },
    /// An earlier attempt to construct this contract failed; bindings are not retried.
    #[error("capability `{contract}` failed to construct earlier and cannot be resolved")]
    Failed {
        /// The type name of the contract.
        contract: &'static str,
    },
}

impl RegistryError {
    /// Wraps a constructor failure of implementation `T`.
    pub fn construction<T: ?Sized>(source: impl Into<BoxError>) -> Self {
        Self::Construction {
            implementation: type_name::<T>(),
            source: source.into(),
        }
    }
}

/// A concrete type that can build itself from the capabilities it depends on.
///
/// Implementations resolve each dependency from the registry inside
/// [`from_registry`](FromRegistry::from_registry), which makes the dependency
/// graph explicit and type-checked.
pub trait FromRegistry: Sized + Send + Sync + 'static {
    /// The kind of binding this type forms. Fallback variants override this with
    /// [`BindingKind::Null`].
    const KIND: BindingKind = BindingKind::Real;

    /// Builds the value, resolving its dependencies from `registry`.
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError>;
}

/// The outcome of a registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The contract had no binding before.
    Added,
    /// A pending, never-resolved binding was replaced.
    Replaced,
    /// The contract already had a binding that was kept (`register_if_absent`).
    Kept,
    /// The contract is already resolved; the memoized instance stays authoritative.
    Ignored,
}

/// A snapshot of one binding, as returned by [`CapabilityRegistry::report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingReport {
    /// The type name of the contract.
    pub contract: &'static str,
    /// The name of the bound implementation.
    pub implementation: &'static str,
    /// Whether the implementation is real or a fallback.
    pub kind: BindingKind,
    /// Whether the contract has been resolved.
    pub resolved: bool,
}

enum Slot {
    Pending(Box<dyn Any + Send>),
    Constructing,
    Resolved(Box<dyn Any + Send + Sync>),
    Failed,
}

struct Entry {
    contract: &'static str,
    implementation: &'static str,
    kind: BindingKind,
    slot: Slot,
}

#[derive(Default)]
struct State {
    entries: HashMap<TypeId, Entry>,
    resolving: Vec<&'static str>,
}

/// The capability resolution container owned by the bootstrap routine.
///
/// Registration takes `&mut self` and happens during assembly. Resolution takes
/// `&self` so factories can resolve their own dependencies recursively. The
/// internal lock is never held while a factory runs.
#[derive(Default)]
pub struct CapabilityRegistry {
    state: Mutex<State>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds contract `C` to a factory producing a real implementation.
    pub fn register<C, F>(&mut self, implementation: &'static str, factory: F) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce(&CapabilityRegistry) -> Result<Arc<C>, RegistryError> + Send + 'static,
    {
        self.bind::<C, F>(implementation, BindingKind::Real, factory, false)
    }

    /// Binds contract `C` to a factory producing a fallback implementation.
    pub fn register_null<C, F>(&mut self, implementation: &'static str, factory: F) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce(&CapabilityRegistry) -> Result<Arc<C>, RegistryError> + Send + 'static,
    {
        self.bind::<C, F>(implementation, BindingKind::Null, factory, false)
    }

    /// Binds contract `C` with an explicit kind, unless it is already bound.
    ///
    /// Used by bootstrap so that bindings a caller placed in a pre-populated
    /// registry take precedence over the engine's defaults.
    pub fn register_if_absent<C, F>(
        &mut self,
        implementation: &'static str,
        kind: BindingKind,
        factory: F,
    ) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce(&CapabilityRegistry) -> Result<Arc<C>, RegistryError> + Send + 'static,
    {
        self.bind::<C, F>(implementation, kind, factory, true)
    }

    /// Binds contract `C` directly to an already-constructed value.
    ///
    /// The binding is recorded as [`BindingKind::Real`]. Use
    /// [`register_instance_as`](Self::register_instance_as) for a prebuilt
    /// fallback.
    pub fn register_instance<C>(&mut self, instance: Arc<C>) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.register_instance_as(type_name::<C>(), BindingKind::Real, instance)
    }

    /// Binds contract `C` to an already-constructed value under an explicit
    /// implementation name and kind.
    pub fn register_instance_as<C>(
        &mut self,
        implementation: &'static str,
        kind: BindingKind,
        instance: Arc<C>,
    ) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.insert_entry::<C>(
            implementation,
            kind,
            Slot::Resolved(Box::new(instance)),
            false,
        )
    }

    fn bind<C, F>(
        &mut self,
        implementation: &'static str,
        kind: BindingKind,
        factory: F,
        only_if_absent: bool,
    ) -> Registration
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce(&CapabilityRegistry) -> Result<Arc<C>, RegistryError> + Send + 'static,
    {
        let factory: Factory<C> = Box::new(factory);
        self.insert_entry::<C>(
            implementation,
            kind,
            Slot::Pending(Box::new(factory)),
            only_if_absent,
        )
    }

    fn insert_entry<C: ?Sized + 'static>(
        &mut self,
        implementation: &'static str,
        kind: BindingKind,
        slot: Slot,
        only_if_absent: bool,
    ) -> Registration {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        let entry = Entry {
            contract: type_name::<C>(),
            implementation,
            kind,
            slot,
        };

        match state.entries.get_mut(&TypeId::of::<C>()) {
            None => {
                state.entries.insert(TypeId::of::<C>(), entry);
                Registration::Added
            }
            Some(_) if only_if_absent => Registration::Kept,
            Some(existing) => {
                if matches!(existing.slot, Slot::Resolved(_) | Slot::Constructing) {
                    Registration::Ignored
                } else {
                    *existing = entry;
                    Registration::Replaced
                }
            }
        }
    }

    /// Resolves contract `C`, constructing it on first use.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::Unregistered`] if `C` has no binding.
    /// * [`RegistryError::Cycle`] if `C` is already being constructed further up
    ///   the call chain.
    /// * [`RegistryError::Failed`] if a previous construction of `C` failed.
    /// * Any error returned by the factory itself.
    pub fn resolve<C>(&self) -> Result<Arc<C>, RegistryError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let contract = type_name::<C>();

        let factory = {
            let mut state = self.lock();
            let State { entries, resolving } = &mut *state;
            let entry = entries
                .get_mut(&TypeId::of::<C>())
                .ok_or(RegistryError::Unregistered { contract })?;

            match std::mem::replace(&mut entry.slot, Slot::Constructing) {
                Slot::Resolved(instance) => {
                    // Keyed by `TypeId::of::<C>()`, so the downcast always matches.
                    let resolved = instance.downcast_ref::<Arc<C>>().cloned();
                    entry.slot = Slot::Resolved(instance);
                    return resolved.ok_or(RegistryError::Unregistered { contract });
                }
                Slot::Constructing => {
                    let start = resolving.iter().position(|c| *c == contract).unwrap_or(0);
                    let mut path = resolving[start..].to_vec();
                    path.push(contract);
                    return Err(RegistryError::Cycle { path });
                }
                Slot::Failed => {
                    entry.slot = Slot::Failed;
                    return Err(RegistryError::Failed { contract });
                }
                Slot::Pending(factory) => {
                    resolving.push(contract);
                    factory
                }
            }
        };

        let result = match factory.downcast::<Factory<C>>() {
            Ok(factory) => factory(self),
            Err(_) => Err(RegistryError::Unregistered { contract }),
        };

        let mut state = self.lock();
        let State { entries, resolving } = &mut *state;
        if let Some(position) = resolving.iter().rposition(|c| *c == contract) {
            resolving.remove(position);
        }
        if let Some(entry) = entries.get_mut(&TypeId::of::<C>()) {
            entry.slot = match &result {
                Ok(instance) => Slot::Resolved(Box::new(Arc::clone(instance))),
                Err(_) => Slot::Failed,
            };
        }
        result
    }

    /// Builds a `T` from the registry without binding it.
    pub fn construct<T: FromRegistry>(&self) -> Result<T, RegistryError> {
        T::from_registry(self)
    }

    /// Returns `true` if contract `C` has a binding.
    #[must_use]
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.lock().entries.contains_key(&TypeId::of::<C>())
    }

    /// Returns `true` if contract `C` has been resolved.
    #[must_use]
    pub fn is_resolved<C: ?Sized + 'static>(&self) -> bool {
        self.lock()
            .entries
            .get(&TypeId::of::<C>())
            .is_some_and(|entry| matches!(entry.slot, Slot::Resolved(_)))
    }

    /// Returns the kind of the binding for contract `C`, if any.
    #[must_use]
    pub fn binding_kind<C: ?Sized + 'static>(&self) -> Option<BindingKind> {
        self.lock()
            .entries
            .get(&TypeId::of::<C>())
            .map(|entry| entry.kind)
    }

    /// Returns the implementation name bound to contract `C`, if any.
    #[must_use]
    pub fn implementation_name<C: ?Sized + 'static>(&self) -> Option<&'static str> {
        self.lock()
            .entries
            .get(&TypeId::of::<C>())
            .map(|entry| entry.implementation)
    }

    /// Returns a snapshot of every binding, sorted by contract name.
    #[must_use]
    pub fn report(&self) -> Vec<BindingReport> {
        let state = self.lock();
        let mut report: Vec<_> = state
            .entries
            .values()
            .map(|entry| BindingReport {
                contract: entry.contract,
                implementation: entry.implementation,
                kind: entry.kind,
                resolved: matches!(entry.slot, Slot::Resolved(_)),
            })
            .collect();
        report.sort_by(|a, b| a.contract.cmp(b.contract));
        report
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("bindings", &self.report())
            .finish()
    }
}
