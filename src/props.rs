//! Property store: project-level defaults in, task results out.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const ALIAS: &str = "drush.alias";
pub const ALIAS_PATH: &str = "drush.alias-path";
pub const ASSUME: &str = "drush.assume";
pub const BIN: &str = "drush.bin";
pub const COLOR: &str = "drush.color";
pub const CONFIG: &str = "drush.config";
pub const PIPE: &str = "drush.pipe";
pub const ROOT: &str = "drush.root";
pub const SIMULATE: &str = "drush.simulate";
pub const URI: &str = "drush.uri";
pub const VERBOSE: &str = "drush.verbose";

pub trait PropertyStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);

    /// Like `get`, but an empty value counts as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore { m: Rc<RefCell<HashMap<String, String>>> }

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn with(self, k: &str, v: &str) -> Self { self.m.borrow_mut().insert(k.into(), v.into()); self }
    pub fn contains(&self, k: &str) -> bool { self.m.borrow().contains_key(k) }
    pub fn snapshot(&self) -> HashMap<String, String> { self.m.borrow().clone() }
}

impl PropertyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> { self.m.borrow().get(key).cloned() }
    fn set(&self, key: &str, value: &str) { self.m.borrow_mut().insert(key.into(), value.into()); }
}

/// Boolean coercion for string-typed settings.
///
/// | input                                 | result |
/// |---------------------------------------|--------|
/// | `yes`, `true` (any case, trimmed)     | true   |
/// | anything else, including empty        | false  |
pub fn coerce_bool(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_truth_table() {
        for t in ["yes", "YES", "true", "True", " yes "] { assert!(coerce_bool(t), "{}", t); }
        for f in ["", "no", "false", "1", "on", "y"] { assert!(!coerce_bool(f), "{}", f); }
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryStore::new().with(ROOT, "/var/www");
        let b = a.clone();
        b.set("out", "done");
        assert_eq!(a.get("out").as_deref(), Some("done"));
        assert_eq!(b.get(ROOT).as_deref(), Some("/var/www"));
        assert_eq!(a.snapshot().len(), 2);
    }

    #[test]
    fn empty_counts_as_unset() {
        let s = MemoryStore::new().with(URI, "");
        assert!(s.contains(URI));
        assert_eq!(s.get_non_empty(URI), None);
    }
}
