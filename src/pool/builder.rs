use std::convert::Infallible;
use std::fmt;

use super::config::RecyclerConfig;
use super::recycler::{AllocateFn, DisposeFn, Recycler, RenewFn};
use crate::error::{Error, Result};

/// Collects the lifecycle callbacks and options of a [`Recycler`].
///
/// Plain setters (`allocate`, `renew`, `dispose`) take infallible closures;
/// the `try_` variants take closures returning `Result<_, E>`, whose errors
/// are handed back untouched by `acquire`/`release`.
pub struct RecyclerBuilder<T, A = (), E = Infallible> {
    allocate: Option<AllocateFn<T, A, E>>,
    renew: Option<RenewFn<T, A, E>>,
    dispose: Option<DisposeFn<T, E>>,
    config: RecyclerConfig,
}

impl<T: 'static, A: 'static, E: 'static> RecyclerBuilder<T, A, E> {
    pub fn new() -> Self {
        Self {
            allocate: None,
            renew: None,
            dispose: None,
            config: RecyclerConfig::default(),
        }
    }

    /// Constructor for brand-new instances.
    pub fn allocate<F>(mut self, mut allocate: F) -> Self
    where
        F: FnMut(A) -> T + 'static,
    {
        self.allocate = Some(Box::new(move |args: A| Ok(allocate(args))));
        self
    }

    pub fn try_allocate<F>(mut self, allocate: F) -> Self
    where
        F: FnMut(A) -> std::result::Result<T, E> + 'static,
    {
        self.allocate = Some(Box::new(allocate));
        self
    }

    /// Re-initializer for instances coming off the free list.
    pub fn renew<F>(mut self, mut renew: F) -> Self
    where
        F: FnMut(A, &mut T) + 'static,
    {
        self.renew = Some(Box::new(move |args: A, obj: &mut T| {
            renew(args, obj);
            Ok(())
        }));
        self
    }

    pub fn try_renew<F>(mut self, renew: F) -> Self
    where
        F: FnMut(A, &mut T) -> std::result::Result<(), E> + 'static,
    {
        self.renew = Some(Box::new(renew));
        self
    }

    /// Cleanup run on every released instance before it is stored.
    pub fn dispose<F>(mut self, mut dispose: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.dispose = Some(Box::new(move |obj: &mut T| {
            dispose(obj);
            Ok(())
        }));
        self
    }

    pub fn try_dispose<F>(mut self, dispose: F) -> Self
    where
        F: FnMut(&mut T) -> std::result::Result<(), E> + 'static,
    {
        self.dispose = Some(Box::new(dispose));
        self
    }

    pub fn config(mut self, config: RecyclerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn tracking(mut self, enabled: bool) -> Self {
        self.config.tracking = enabled;
        self
    }

    /// Build the recycler.
    ///
    /// Fails with [`Error::Configuration`] when `allocate` or `renew` was never
    /// supplied, or when the initial free-list storage cannot be reserved.
    pub fn build(self) -> Result<Recycler<T, A, E>> {
        let allocate = self
            .allocate
            .ok_or_else(|| Error::Configuration("allocate callback is required".into()))?;
        let renew = self
            .renew
            .ok_or_else(|| Error::Configuration("renew callback is required".into()))?;

        let mut free = Vec::new();
        free.try_reserve_exact(self.config.initial_capacity)
            .map_err(|e| {
                Error::Configuration(format!(
                    "cannot reserve {} free-list slots: {}",
                    self.config.initial_capacity, e
                ))
            })?;

        Ok(Recycler::from_parts(
            free,
            allocate,
            renew,
            self.dispose,
            &self.config,
        ))
    }
}

impl<T: 'static, A: 'static, E: 'static> Default for RecyclerBuilder<T, A, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A, E> fmt::Debug for RecyclerBuilder<T, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclerBuilder")
            .field("allocate", &self.allocate.is_some())
            .field("renew", &self.renew.is_some())
            .field("dispose", &self.dispose.is_some())
            .field("config", &self.config)
            .finish()
    }
}
