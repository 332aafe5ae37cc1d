//! uvm-re: compile-once/match-many regex cache with glob translation
//!
//! This crate provides the string-matching service consumed by a hardware
//! simulator's DPI layer: a process-wide cache of compiled regular
//! expressions and a translator that rewrites shell-style globs into
//! anchored regular expressions.
//!
//! Patterns follow a delimiter convention: a pattern wrapped in `/` on both
//! ends (for example `/^uvm_.*$/`) is already a regular expression, while an
//! unwrapped pattern passed to [`glob_to_re`] is treated as a glob. Matching
//! never translates; it strips the delimiters if present and treats the rest
//! as regex syntax.
//!
//! # Example
//!
//! ```
//! use uvm_re::{ReCache, glob_to_re};
//!
//! let cache = ReCache::new();
//!
//! // Translate a glob, then match through the cache.
//! let re = glob_to_re("uvm_*");
//! assert_eq!(re, "/^uvm_.*$/");
//! assert!(cache.match_re(&re, "uvm_test_top").unwrap());
//! assert!(!cache.match_re(&re, "tb_top").unwrap());
//!
//! // The second match reuses the compiled pattern.
//! assert_eq!(cache.stats().compiled, 1);
//! ```
//!
//! # Shared instance
//!
//! Embedding layers that need one cache per process (the DPI entry points
//! do) use [`GLOBAL_CACHE`] or the [`re_match`] convenience wrapper. Code
//! under test constructs its own [`ReCache`] so state never leaks between
//! tests.

pub mod cache;
pub mod error;
pub mod glob;

pub use cache::{CacheStats, GLOBAL_CACHE, ReCache, re_match};
pub use error::{ReError, Result};
pub use glob::{RE_BRACKET_CHAR, glob_to_re, is_bracketed};
