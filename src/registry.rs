//! Name → recycler directory.
//!
//! Applications that keep one recycler per object kind create or register
//! them here once at start-up, then hold on to the returned handles for
//! steady-state traffic. The registry never sits on the acquire/release path;
//! it exists for setup and diagnostics.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metrics::RecyclerStats;
use crate::pool::{shared, Recycler, RecyclerBuilder, SharedRecycler};

/// Type-erased read access used for diagnostics.
trait Inspect {
    /// `None` while the recycler is mutably borrowed.
    fn stats(&self) -> Option<RecyclerStats>;
    fn type_name(&self) -> &'static str;
}

impl<T: 'static, A: 'static, E: 'static> Inspect for RefCell<Recycler<T, A, E>> {
    fn stats(&self) -> Option<RecyclerStats> {
        self.try_borrow().ok().map(|recycler| recycler.stats())
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

struct Entry {
    handle: Rc<dyn Any>,
    inspect: Rc<dyn Inspect>,
}

/// Diagnostics line for one registered recycler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolReport {
    pub name: String,
    /// Pooled object type.
    pub type_name: &'static str,
    /// `None` if the recycler was borrowed while the report was taken.
    pub stats: Option<RecyclerStats>,
}

/// Directory of recyclers keyed by unique name.
#[derive(Default)]
pub struct Registry {
    pools: FxHashMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a recycler from `builder` and register it under `name`.
    ///
    /// Fails with [`Error::InvalidName`] or [`Error::DuplicateName`] before
    /// anything is built, then with [`Error::Configuration`] if the builder
    /// is incomplete. An existing registration is never touched.
    pub fn create_pool<T, A, E>(
        &mut self,
        name: &str,
        builder: RecyclerBuilder<T, A, E>,
    ) -> Result<SharedRecycler<T, A, E>>
    where
        T: 'static,
        A: 'static,
        E: 'static,
    {
        self.check_available(name)?;
        let recycler = shared(builder.build()?);
        self.insert(name, Rc::clone(&recycler));
        Ok(recycler)
    }

    /// Register a recycler built elsewhere under `name`.
    pub fn add_pool<T, A, E>(&mut self, name: &str, recycler: SharedRecycler<T, A, E>) -> Result<()>
    where
        T: 'static,
        A: 'static,
        E: 'static,
    {
        self.check_available(name)?;
        self.insert(name, recycler);
        Ok(())
    }

    /// Find the recycler registered under `name`.
    ///
    /// Returns `None` if the name is unknown or the recycler registered there
    /// has different type parameters.
    pub fn lookup<T, A, E>(&self, name: &str) -> Option<SharedRecycler<T, A, E>>
    where
        T: 'static,
        A: 'static,
        E: 'static,
    {
        let entry = self.pools.get(name)?;
        Rc::clone(&entry.handle)
            .downcast::<RefCell<Recycler<T, A, E>>>()
            .ok()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Stats of the recycler under `name`, if registered and not borrowed.
    pub fn stats(&self, name: &str) -> Option<RecyclerStats> {
        self.pools.get(name)?.inspect.stats()
    }

    /// One line per registered recycler, sorted by name.
    pub fn report(&self) -> Vec<PoolReport> {
        let mut report: Vec<PoolReport> = self
            .pools
            .iter()
            .map(|(name, entry)| PoolReport {
                name: name.clone(),
                type_name: entry.inspect.type_name(),
                stats: entry.inspect.stats(),
            })
            .collect();
        report.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        report
    }

    fn check_available(&self, name: &str) -> Result<()> {
        if !is_identifier(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.pools.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn insert<T, A, E>(&mut self, name: &str, recycler: SharedRecycler<T, A, E>)
    where
        T: 'static,
        A: 'static,
        E: 'static,
    {
        let handle: Rc<dyn Any> = recycler.clone();
        let inspect: Rc<dyn Inspect> = recycler;
        debug!(pool = name, object = inspect.type_name(), "registered recycler");
        self.pools.insert(name.to_string(), Entry { handle, inspect });
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pools", &self.names())
            .finish()
    }
}

/// Non-empty; leading ASCII letter or `_`; then ASCII alphanumerics, `_`, `-`, `.`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Recycler, RecyclerConfig};

    #[derive(Debug, Default)]
    struct Bullet {
        speed: u32,
    }

    fn bullets() -> RecyclerBuilder<Bullet, u32> {
        Recycler::builder()
            .allocate(|speed| Bullet { speed })
            .renew(|speed, bullet| bullet.speed = speed)
    }

    #[test]
    fn test_create_and_lookup() {
        let mut registry = Registry::new();
        let pool = registry.create_pool("BulletPool", bullets()).unwrap();

        let bullet = pool.borrow_mut().obtain(10);
        pool.borrow_mut().recycle(bullet);

        let found = registry.lookup::<Bullet, u32, _>("BulletPool").unwrap();
        assert!(Rc::ptr_eq(&pool, &found));
        assert_eq!(found.borrow().free_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        let first = registry.create_pool("X", bullets()).unwrap();
        first.borrow_mut().expand(2).unwrap();

        let err = registry.create_pool("X", bullets()).unwrap_err();
        assert_eq!(err, Error::DuplicateName("X".into()));

        // First registration untouched
        let found = registry.lookup::<Bullet, u32, _>("X").unwrap();
        assert!(Rc::ptr_eq(&first, &found));
        assert_eq!(found.borrow().free_count(), 2);
    }

    #[test]
    fn test_distinct_names_succeed() {
        let mut registry = Registry::new();
        registry.create_pool("X", bullets()).unwrap();
        registry.create_pool("Y", bullets()).unwrap();
        assert_eq!(registry.names(), vec!["X", "Y"]);
    }

    #[test]
    fn test_invalid_names() {
        let mut registry = Registry::new();
        for name in ["", "9lives", "has space", "tab\tname", "semi;colon"] {
            let err = registry.create_pool(name, bullets()).unwrap_err();
            assert_eq!(err, Error::InvalidName(name.to_string()));
        }
        assert!(registry.is_empty());

        for name in ["_private", "Pool.v2", "array-literal", "a"] {
            assert!(is_identifier(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_incomplete_builder_not_registered() {
        let mut registry = Registry::new();
        let builder = Recycler::<Bullet, u32>::builder().allocate(|speed| Bullet { speed });
        let err = registry.create_pool("Half", builder).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(!registry.contains("Half"));
    }

    #[test]
    fn test_add_pool() {
        let mut registry = Registry::new();
        let pool = shared(
            Recycler::new(|()| String::new(), |(), _| {}, RecyclerConfig::default()).unwrap(),
        );

        registry.add_pool("Strings", Rc::clone(&pool)).unwrap();
        assert!(registry.contains("Strings"));

        let err = registry.add_pool("Strings", Rc::clone(&pool)).unwrap_err();
        assert_eq!(err, Error::DuplicateName("Strings".into()));

        let err = registry.add_pool(" ", pool).unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_type_mismatch() {
        let mut registry = Registry::new();
        registry.create_pool("BulletPool", bullets()).unwrap();

        assert!(registry.lookup::<String, (), std::convert::Infallible>("BulletPool").is_none());
        assert!(registry.lookup::<Bullet, (), std::convert::Infallible>("BulletPool").is_none());
        assert!(registry.lookup::<Bullet, u32, std::convert::Infallible>("Missing").is_none());
    }

    #[test]
    fn test_report() {
        let mut registry = Registry::new();
        let b = registry.create_pool("B", bullets()).unwrap();
        registry.create_pool("A", bullets()).unwrap();
        b.borrow_mut().expand(3).unwrap();

        let report = registry.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "A");
        assert_eq!(report[1].name, "B");
        assert!(report[1].type_name.ends_with("Bullet"));
        assert_eq!(report[1].stats.unwrap().free, 3);

        // Borrowed recyclers report no stats instead of panicking
        let _held = b.borrow_mut();
        assert!(registry.stats("B").is_none());
        assert!(registry.stats("A").is_some());
    }

    #[test]
    fn test_report_serialize() {
        let mut registry = Registry::new();
        registry.create_pool("BulletPool", bullets()).unwrap();

        let json = serde_json::to_value(registry.report()).unwrap();
        assert_eq!(json[0]["name"], "BulletPool");
        assert!(json[0]["type_name"].as_str().unwrap().ends_with("Bullet"));
        assert_eq!(json[0]["stats"]["allocated"], 0);
        assert_eq!(json[0]["stats"]["size"], 0);
    }
}
