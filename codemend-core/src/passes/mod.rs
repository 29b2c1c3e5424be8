// codemend-core/src/passes/mod.rs
//! The four concrete rewrite passes and the cache that builds them.
//!
//! Each submodule exposes a `rules(...)` function returning its ordered rule
//! list. [`get_or_compile_pass`] turns a `PassKind` plus configuration into a
//! ready [`Pass`], compiling once per distinct configuration.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod corruption_repair;
pub mod debug_log;
pub mod error_cast;
pub mod optional_access;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::MendConfig;
use crate::injector::Injector;
use crate::pass::{Pass, PassKind};
use crate::rules::compiler::compile_rules;
use crate::rules::RuleSpec;

lazy_static! {
    /// Compiled passes keyed by a hash of (kind, configuration).
    static ref COMPILED_PASS_CACHE: RwLock<HashMap<u64, Arc<Pass>>> = RwLock::new(HashMap::new());
}

fn cache_key(kind: PassKind, config: &MendConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    config.hash(&mut hasher);
    hasher.finish()
}

/// The uncompiled, ordered rule list of a pass.
pub fn rule_specs(kind: PassKind, config: &MendConfig) -> Vec<RuleSpec> {
    match kind {
        PassKind::DebugLog => debug_log::rules(&config.debug_log),
        PassKind::ErrorCast => error_cast::rules(&config.error_cast),
        PassKind::OptionalAccess => optional_access::rules(&config.optional_access),
        PassKind::Repair => corruption_repair::rules(),
    }
}

/// Compiles a pass without consulting the cache.
pub fn build_pass(kind: PassKind, config: &MendConfig) -> Result<Pass> {
    let rules = compile_rules(rule_specs(kind, config))
        .with_context(|| format!("Failed to compile rules for the {} pass", kind))?;

    let (exclude_files, injector) = match kind {
        PassKind::DebugLog => (
            config.debug_log.exclude_files.clone(),
            Some(Injector::from_config(&config.debug_log)),
        ),
        _ => (Vec::new(), None),
    };

    Ok(Pass::new(kind, rules, exclude_files, injector))
}

/// Returns the compiled pass for `kind`, compiling it on first use.
pub fn get_or_compile_pass(kind: PassKind, config: &MendConfig) -> Result<Arc<Pass>> {
    let key = cache_key(kind, config);

    {
        let cache = COMPILED_PASS_CACHE
            .read()
            .map_err(|_| anyhow::anyhow!("compiled pass cache lock poisoned"))?;
        if let Some(pass) = cache.get(&key) {
            debug!("Serving the {} pass from cache for key: {}", kind, key);
            return Ok(Arc::clone(pass));
        }
    }

    debug!("The {} pass is not cached. Compiling now.", kind);
    let pass = Arc::new(build_pass(kind, config)?);
    COMPILED_PASS_CACHE
        .write()
        .map_err(|_| anyhow::anyhow!("compiled pass cache lock poisoned"))?
        .insert(key, Arc::clone(&pass));
    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pass_compiles_with_defaults() {
        let config = MendConfig::load_default().unwrap();
        for kind in PassKind::ALL {
            let pass = get_or_compile_pass(kind, &config).unwrap();
            assert_eq!(pass.kind(), kind);
            assert!(!pass.rules().is_empty());
        }
    }

    #[test]
    fn same_configuration_shares_one_compiled_pass() {
        let config = MendConfig::load_default().unwrap();
        let a = get_or_compile_pass(PassKind::Repair, &config).unwrap();
        let b = get_or_compile_pass(PassKind::Repair, &config).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn only_debug_log_has_a_denylist() {
        let config = MendConfig::load_default().unwrap();
        let path = std::path::Path::new("src/utils/logger.ts");
        assert!(!build_pass(PassKind::DebugLog, &config).unwrap().applies_to(path));
        assert!(build_pass(PassKind::OptionalAccess, &config).unwrap().applies_to(path));
    }
}
