use std::{borrow::Borrow, collections::HashMap, fmt::Debug, hash::Hash, sync::Arc};

/// Handlers advertise the single key they own in a dispatch table
pub trait Keyed<K> {
    fn key(&self) -> K;
}

/// Error returned when two handlers claim the same key in one table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{table}: handler for key `{key}` is registered more than once")]
pub struct DuplicateKey {
    pub table: &'static str,
    pub key: String,
}

/// Collects handler registrations; duplicates are reported by `build`
pub struct DispatchTableBuilder<K, H: ?Sized> {
    name: &'static str,
    handlers: HashMap<K, Arc<H>>,
    duplicates: Vec<String>,
}

impl<K, H> DispatchTableBuilder<K, H>
where
    K: Hash + Eq + Debug,
    H: ?Sized,
{
    /// Register a handler under an explicit key
    pub fn register(mut self, key: K, handler: Arc<H>) -> Self {
        if self.handlers.contains_key(&key) {
            log::error!("{}: duplicate registration for {:?}", self.name, key);
            self.duplicates.push(format!("{:?}", key));
        } else {
            self.handlers.insert(key, handler);
        }
        self
    }

    /// Register a handler under the key it advertises
    pub fn register_keyed(self, handler: Arc<H>) -> Self
    where
        H: Keyed<K>,
    {
        let key = handler.key();
        self.register(key, handler)
    }

    /// Freeze the table. Fails on the first key that was registered twice.
    pub fn build(self) -> Result<DispatchTable<K, H>, DuplicateKey> {
        if let Some(key) = self.duplicates.into_iter().next() {
            return Err(DuplicateKey {
                table: self.name,
                key,
            });
        }
        log::debug!("{}: {} handlers registered", self.name, self.handlers.len());
        Ok(DispatchTable {
            handlers: self.handlers,
        })
    }
}

/// Immutable key -> handler lookup built once at startup
pub struct DispatchTable<K, H: ?Sized> {
    handlers: HashMap<K, Arc<H>>,
}

impl<K, H> DispatchTable<K, H>
where
    K: Hash + Eq + Debug,
    H: ?Sized,
{
    pub fn builder(name: &'static str) -> DispatchTableBuilder<K, H> {
        DispatchTableBuilder {
            name,
            handlers: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Find the handler registered for the key
    pub fn resolve<Q>(&self, key: &Q) -> Option<Arc<H>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.get(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.contains_key(key)
    }
}
