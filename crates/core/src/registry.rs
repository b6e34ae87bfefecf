//! Write-once binding of the process's single backend.
//!
//! A [`Registry`] is filled exactly once at startup and is read-only
//! afterwards. Registering twice, or asking for the backend before anything
//! was registered, is a configuration error: the panicking accessors abort
//! rather than continue without a usable picture.
//!
//! Every drawing primitive takes a [`Registered`] backend, and only a
//! registry hands those out, so nothing can reach the GPU before
//! registration.

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use thiserror::Error;

/// Misuse of a [`Registry`], as returned by the non-panicking accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("gg: backend already registered")]
    AlreadyRegistered,
    #[error("gg: no backend registered")]
    NotRegistered,
}

/// A backend borrowed out of a [`Registry`].
///
/// Only [`Registry`] constructs this, so holding one proves the backend was
/// registered. It is `Copy` and dereferences to the backend.
pub struct Registered<'a, B>(&'a B);

impl<'a, B> Registered<'a, B> {
    /// The backend itself, for the lifetime of the registry borrow.
    pub fn backend(self) -> &'a B {
        self.0
    }
}

impl<B> Clone for Registered<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for Registered<'_, B> {}

impl<B> Deref for Registered<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.0
    }
}

impl<B: fmt::Debug> fmt::Debug for Registered<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Registered").field(self.0).finish()
    }
}

/// Holds at most one backend, set once.
///
/// `Registry::new` is `const`, so a `Sync` backend can live in a `static`;
/// otherwise create one registry at startup and pass the returned
/// [`Registered`] handle into the drawing primitives.
pub struct Registry<B> {
    backend: OnceLock<B>,
}

impl<B> Registry<B> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            backend: OnceLock::new(),
        }
    }

    /// Registers `backend` and returns it as a [`Registered`] handle.
    ///
    /// # Panics
    ///
    /// Panics if a backend was already registered.
    pub fn register(&self, backend: B) -> Registered<'_, B> {
        match self.try_register(backend) {
            Ok(backend) => backend,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers `backend`, refusing to overwrite an earlier registration.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyRegistered` if a backend is already set.
    pub fn try_register(&self, backend: B) -> Result<Registered<'_, B>, RegistryError> {
        let mut fresh = false;
        let stored = self.backend.get_or_init(|| {
            fresh = true;
            backend
        });
        if fresh {
            log::debug!("gg: backend registered");
            Ok(Registered(stored))
        } else {
            Err(RegistryError::AlreadyRegistered)
        }
    }

    /// Returns the registered backend.
    ///
    /// # Panics
    ///
    /// Panics if no backend has been registered.
    pub fn backend(&self) -> Registered<'_, B> {
        match self.try_backend() {
            Ok(backend) => backend,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns the registered backend, if any.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotRegistered` before the first registration.
    pub fn try_backend(&self) -> Result<Registered<'_, B>, RegistryError> {
        self.backend
            .get()
            .map(Registered)
            .ok_or(RegistryError::NotRegistered)
    }

    pub fn is_registered(&self) -> bool {
        self.backend.get().is_some()
    }
}

impl<B> Default for Registry<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// A fresh recording backend in its own leaked registry.
#[cfg(test)]
pub(crate) fn recording() -> Registered<'static, crate::headless::RecordingBackend> {
    let registry: &'static Registry<_> = Box::leak(Box::new(Registry::new()));
    registry.register(crate::headless::RecordingBackend::new())
}
