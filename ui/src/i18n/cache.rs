//! In-memory LRU cache of loaded dictionaries.
//!
//! Entries are keyed by `(language, namespace)` and ordered by a
//! monotonically increasing access counter. Capacity bounds the number of
//! entries, not their byte size. There is no TTL: entries live until they
//! are evicted or the cache is cleared.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::dictionary::Dictionary;

/// Cache handle shared between the loader, the translator and the facade.
pub type SharedCache = Rc<RefCell<ResourceCache>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub language: String,
    pub namespace: String,
}

impl CacheKey {
    pub fn new(language: &str, namespace: &str) -> Self {
        Self {
            language: language.to_string(),
            namespace: namespace.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.namespace)
    }
}

#[derive(Debug)]
struct CacheEntry {
    dictionary: Rc<Dictionary>,
    last_access: u64,
}

#[derive(Debug)]
pub struct ResourceCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    clock: u64,
}

impl ResourceCache {
    pub const DEFAULT_CAPACITY: usize = 50;

    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    pub fn shared(capacity: usize) -> SharedCache {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    pub fn get(&mut self, language: &str, namespace: &str) -> Option<Rc<Dictionary>> {
        let key = CacheKey::new(language, namespace);
        let stamp = self.tick();
        let entry = self.entries.get_mut(&key)?;
        entry.last_access = stamp;
        Some(Rc::clone(&entry.dictionary))
    }

    /// Store a copy of `dictionary`. Evicts the least recently used entry
    /// first when the cache is full and the key is new.
    pub fn set(&mut self, language: &str, namespace: &str, dictionary: &Dictionary) -> Rc<Dictionary> {
        let key = CacheKey::new(language, namespace);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        let stored = Rc::new(dictionary.clone());
        let last_access = self.tick();
        self.entries.insert(
            key,
            CacheEntry {
                dictionary: Rc::clone(&stored),
                last_access,
            },
        );
        stored
    }

    /// Membership test; does not count as an access.
    pub fn has(&self, language: &str, namespace: &str) -> bool {
        self.entries.contains_key(&CacheKey::new(language, namespace))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.clock = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached keys, least recently used first.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keyed: Vec<_> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_access, key.clone()))
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, key)| key).collect()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
            tracing::debug!(key = %key, capacity = self.capacity, "evicted least recently used dictionary");
        }
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(value: &str) -> Dictionary {
        let mut d = Dictionary::new();
        d.insert("title", value);
        d
    }

    #[test]
    fn get_returns_stored_dictionary() {
        let mut cache = ResourceCache::new(4);
        cache.set("it", "common", &dict("Ciao"));
        let hit = cache.get("it", "common").expect("cached");
        assert_eq!(hit.lookup("title"), Some("Ciao"));
        assert!(cache.get("en", "common").is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = ResourceCache::new(2);
        cache.set("it", "common", &dict("a"));
        cache.set("it", "auth", &dict("b"));
        // Touch `common` so `auth` becomes the oldest.
        cache.get("it", "common");
        cache.set("it", "dashboard", &dict("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.has("it", "common"));
        assert!(!cache.has("it", "auth"));
        assert!(cache.has("it", "dashboard"));
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut cache = ResourceCache::new(3);
        for i in 0..20 {
            cache.set("it", &format!("ns{i}"), &dict("x"));
            assert!(cache.len() <= 3);
        }
        let remaining: Vec<String> = cache.keys().into_iter().map(|k| k.namespace).collect();
        assert_eq!(remaining, vec!["ns17", "ns18", "ns19"]);
    }

    #[test]
    fn overwriting_existing_key_does_not_evict() {
        let mut cache = ResourceCache::new(2);
        cache.set("it", "common", &dict("a"));
        cache.set("it", "auth", &dict("b"));
        cache.set("it", "common", &dict("c"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("it", "common").unwrap().lookup("title"), Some("c"));
        assert!(cache.has("it", "auth"));
    }

    #[test]
    fn has_does_not_refresh_recency() {
        let mut cache = ResourceCache::new(2);
        cache.set("it", "common", &dict("a"));
        cache.set("it", "auth", &dict("b"));
        assert!(cache.has("it", "common"));
        cache.set("it", "items", &dict("c"));
        assert!(!cache.has("it", "common"));
    }

    #[test]
    fn stored_copy_is_isolated_from_caller() {
        let mut cache = ResourceCache::new(2);
        let mut original = dict("before");
        cache.set("it", "common", &original);
        original.insert("title", "after");
        assert_eq!(cache.get("it", "common").unwrap().lookup("title"), Some("before"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = ResourceCache::new(2);
        cache.set("it", "common", &dict("a"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("it", "common").is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut cache = ResourceCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.set("it", "a", &dict("a"));
        cache.set("it", "b", &dict("b"));
        assert_eq!(cache.len(), 1);
        assert!(cache.has("it", "b"));
    }
}
