//! Compiled-regex cache.
//!
//! This module provides [`ReCache`], a cache of compiled regular
//! expressions keyed by pattern text. The primary interface is
//! [`ReCache::match_re`], which strips the optional `/` delimiters, looks
//! the pattern up in the cache, compiles and inserts it on a miss, and runs
//! the compiled expression against the subject string.
//!
//! The cache is unbounded and never evicts: the pattern population comes
//! from testbench source code and is small and fixed for the life of the
//! process. A [`GLOBAL_CACHE`] instance serves the process-wide embedding;
//! tests construct their own instances.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use regex::Regex;

use crate::error::{ReError, Result};
use crate::glob::strip_brackets;

/// A cache of compiled regular expressions.
///
/// Entries are keyed by the exact (delimiter-stripped) pattern text. The
/// map is ordered so the diagnostic dump lists patterns in a stable,
/// sorted order.
pub struct ReCache {
    patterns: RwLock<BTreeMap<String, Arc<Regex>>>,
    /// Lookups answered from the cache.
    hits: AtomicUsize,
    /// Lookups that required a compilation attempt.
    misses: AtomicUsize,
    /// Successful compilations (failed patterns are never cached).
    compiled: AtomicUsize,
}

impl ReCache {
    /// Create a new, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(BTreeMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            compiled: AtomicUsize::new(0),
        }
    }

    /// Match a subject string against a regular expression.
    ///
    /// If `re` is wrapped in `/` on both ends the delimiters are stripped
    /// first; the remainder is regex syntax either way (globs must be
    /// translated with [`crate::glob_to_re`] before matching). The search
    /// is unanchored unless the pattern itself carries `^`/`$`.
    ///
    /// Returns `Ok(true)` on match and `Ok(false)` on a clean no-match, so
    /// a compile failure is always distinguishable from "did not match".
    ///
    /// # Errors
    ///
    /// Returns [`ReError::Compile`] if the stripped pattern is not a valid
    /// regular expression. The failed pattern is not cached; a later call
    /// with the same text recompiles and reports again.
    pub fn match_re(&self, re: &str, subject: &str) -> Result<bool> {
        let compiled = self.lookup_or_insert(strip_brackets(re), re)?;
        Ok(compiled.is_match(subject))
    }

    /// Get or compile a regular expression without running a match.
    ///
    /// `pattern` is used verbatim as both regex source and cache key; no
    /// delimiter stripping is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReError::Compile`] if the pattern is invalid.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>> {
        self.lookup_or_insert(pattern, pattern)
    }

    /// Cache probe, then compile-and-insert on a miss.
    ///
    /// `input` is the caller's original spelling of the pattern (delimiters
    /// included) and is what a compile error reports.
    ///
    /// Lock poisoning is recovered from: the map is only ever mutated by a
    /// single completed insert, so its contents stay consistent.
    fn lookup_or_insert(&self, pattern: &str, input: &str) -> Result<Arc<Regex>> {
        {
            let cache = self
                .patterns
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(re) = cache.get(pattern) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(pattern = %pattern, "re cache hit");
                return Ok(Arc::clone(re));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let compiled = match Regex::new(pattern) {
            Ok(re) => Arc::new(re),
            Err(source) => {
                let err = ReError::compile(input, source);
                // Exact wording preserved; simulator-side tooling greps for it.
                tracing::error!("{err}");
                return Err(err);
            }
        };

        let mut cache = self
            .patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Double-check under the write lock: a concurrent caller may have
        // compiled and inserted the same pattern after our read probe.
        if let Some(existing) = cache.get(pattern) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(existing));
        }

        self.compiled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(pattern = %pattern, "compiled and cached regex");
        cache.insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Check if a pattern text (already stripped) is cached.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        let cache = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        cache.contains_key(pattern)
    }

    /// Get the number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        let cache = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        cache.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            compiled: self.compiled.load(Ordering::Relaxed),
        }
    }

    /// Render the diagnostic cache listing.
    ///
    /// One stripped pattern per line, zero-based index, sorted by pattern
    /// text. The format is fixed:
    ///
    /// ```text
    ///  -- re cache dump --
    /// 0: ^first.*$
    /// 1: ^second$
    ///  -- end --
    /// ```
    #[must_use]
    pub fn dump(&self) -> String {
        let cache = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut out = String::from(" -- re cache dump --\n");
        for (idx, pattern) in cache.keys().enumerate() {
            let _ = writeln!(out, "{idx}: {pattern}");
        }
        out.push_str(" -- end --\n");
        out
    }
}

impl Default for ReCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a regex cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached patterns.
    pub size: usize,
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that required a compilation attempt.
    pub misses: usize,
    /// Successful compilations.
    pub compiled: usize,
}

impl CacheStats {
    /// Get the cache hit rate as a ratio (0.0 to 1.0).
    ///
    /// Returns 1.0 if no lookups have been made.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-wide cache consulted by the DPI entry points.
pub static GLOBAL_CACHE: LazyLock<ReCache> = LazyLock::new(ReCache::new);

/// Match against the global cache.
///
/// # Errors
///
/// Returns [`ReError::Compile`] if the pattern is invalid.
pub fn re_match(re: &str, subject: &str) -> Result<bool> {
    GLOBAL_CACHE.match_re(re, subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_hit_reuses_compiled_pattern() {
        let cache = ReCache::new();

        assert!(cache.match_re("/^a.*b$/", "aXXb").unwrap());
        assert!(cache.match_re("/^a.*b$/", "ab").unwrap());
        assert!(!cache.match_re("/^a.*b$/", "ba").unwrap());

        let stats = cache.stats();
        assert_eq!(stats.compiled, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn get_or_compile_returns_same_arc() {
        let cache = ReCache::new();
        let r1 = cache.get_or_compile(r"\d+").unwrap();
        let r2 = cache.get_or_compile(r"\d+").unwrap();
        assert!(Arc::ptr_eq(&r1, &r2));
    }

    #[test]
    fn delimiters_are_transparent() {
        let cache = ReCache::new();

        for subject in ["abc", "xabc", "abcx", "ab"] {
            let bare = cache.match_re("^abc$", subject).unwrap();
            let bracketed = cache.match_re("/^abc$/", subject).unwrap();
            assert_eq!(bare, bracketed, "subject: {subject}");
        }

        // Both spellings share one cache entry.
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("^abc$"));
    }

    #[test]
    fn unanchored_pattern_searches_anywhere() {
        let cache = ReCache::new();
        assert!(cache.match_re("/b+/", "aabba").unwrap());
        assert!(!cache.match_re("/b+/", "aaca").unwrap());
    }

    #[test]
    fn invalid_pattern_is_not_cached() {
        let cache = ReCache::new();

        let err = cache.match_re("[invalid(", "anything").unwrap_err();
        assert!(err.to_string().contains("[invalid("));
        assert!(cache.is_empty());

        // No negative caching: the same bad pattern recompiles and fails
        // again on every attempt.
        assert!(cache.match_re("[invalid(", "anything").is_err());
        let stats = cache.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.compiled, 0);
    }

    #[test]
    fn compile_error_reports_unstripped_input() {
        let cache = ReCache::new();
        let err = cache.match_re("/[invalid(/", "x").unwrap_err();
        assert_eq!(err.pattern(), "/[invalid(/");
    }

    #[test]
    fn dump_lists_each_pattern_once() {
        let cache = ReCache::new();

        cache.match_re("/x/", "x").unwrap();
        cache.match_re("/y/", "y").unwrap();
        cache.match_re("/x/", "xx").unwrap();

        assert_eq!(cache.dump(), " -- re cache dump --\n0: x\n1: y\n -- end --\n");
    }

    #[test]
    fn dump_of_empty_cache() {
        let cache = ReCache::new();
        assert_eq!(cache.dump(), " -- re cache dump --\n -- end --\n");
    }

    #[test]
    fn dump_order_is_stable() {
        let cache = ReCache::new();

        // Insert out of sorted order; the dump is sorted by pattern text.
        cache.match_re("/zz/", "zz").unwrap();
        cache.match_re("/aa/", "aa").unwrap();
        cache.match_re("/mm/", "mm").unwrap();

        let dump = cache.dump();
        assert_eq!(dump, " -- re cache dump --\n0: aa\n1: mm\n2: zz\n -- end --\n");
        assert_eq!(cache.dump(), dump);
    }

    #[test]
    fn stats_hit_rate() {
        let cache = ReCache::new();
        assert!((cache.stats().hit_rate() - 1.0).abs() < f64::EPSILON);

        cache.match_re("/p/", "p").unwrap();
        cache.match_re("/p/", "q").unwrap();
        cache.match_re("/p/", "pp").unwrap();
        cache.match_re("/q/", "q").unwrap();

        // 2 hits out of 4 lookups.
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn global_cache_convenience() {
        assert!(re_match("/^global_[a-z]+$/", "global_cache").unwrap());
        assert!(GLOBAL_CACHE.contains("^global_[a-z]+$"));
    }

    #[test]
    fn concurrent_matches_compile_once() {
        let cache = Arc::new(ReCache::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    assert!(cache.match_re("/^t[0-9]+$/", "t42").unwrap());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1);
        // Losers of a compile race throw their result away; only the
        // winning insert counts.
        assert_eq!(cache.stats().compiled, 1);
    }
}
