//! Hash map used for pool lookups.
//!
//! The backend is picked by cargo feature: `std-hash` forces the standard
//! SipHash map, otherwise `rustc-hash` (the default) wins over `ahash`.

#[cfg(all(feature = "rustc-hash", not(feature = "std-hash")))]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(
    feature = "ahash",
    not(any(feature = "rustc-hash", feature = "std-hash"))
))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(any(
    feature = "std-hash",
    not(any(feature = "rustc-hash", feature = "ahash"))
))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
