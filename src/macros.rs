//! Terse macros for everyday usage

/// Build a `MemoryStore` from `key => value` pairs.
#[macro_export]
macro_rules! drush_props {
    ( $( $k:expr => $v:expr ),* $(,)? ) => {{
        let mut __s = $crate::props::MemoryStore::new();
        $( __s = __s.with($k, $v); )*
        __s
    }};
}
