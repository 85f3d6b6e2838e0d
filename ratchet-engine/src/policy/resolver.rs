//! Builds the effective verify configuration.

use std::path::Path;

use serde_json::json;

use ratchet_core::config::RatchetConfig;
use ratchet_core::constants::{DEFAULT_TASK_ID_ENV, DEFAULT_TASK_ID_PATTERN};
use ratchet_core::errors::RunError;

use super::merge::merge;
use super::packs::load_pack;
use super::types::{EffectiveVerifyConfig, PackRef, VerifyConfig};

/// Compiled-in defaults, the lowest merge layer.
pub fn default_verify_document() -> serde_json::Value {
    json!({
        "enabled": false,
        "task_id_pattern": DEFAULT_TASK_ID_PATTERN,
        "task_id_sources": ["cli", "env", "branch"],
        "task_id_env": DEFAULT_TASK_ID_ENV,
        "require_task_id": false,
        "gates": [],
    })
}

/// Merge defaults, each configured pack in order, then the repo-local
/// `verify` block, and type the result.
///
/// Any pack that cannot be resolved or parsed aborts resolution.
pub fn resolve_verify_config(
    root: &Path,
    config: &RatchetConfig,
) -> Result<EffectiveVerifyConfig, RunError> {
    let mut document = default_verify_document();
    let mut packs = Vec::with_capacity(config.policy_packs.len());

    for reference in &config.policy_packs {
        let pack = load_pack(root, reference)?;
        tracing::debug!(pack = %pack.reference, path = %pack.path, "merging policy pack");
        document = merge(&document, &pack.verify);
        packs.push(PackRef {
            reference: pack.reference,
            path: pack.path,
        });
    }

    if let Some(local) = &config.verify {
        let mut local = local.clone();
        if let Some(map) = local.as_object_mut() {
            map.remove("commands");
        }
        document = merge(&document, &local);
    }

    let typed = VerifyConfig::from_value(&document)?;
    let commands = config.commands.named();

    Ok(EffectiveVerifyConfig {
        config: typed,
        packs,
        commands,
        document,
    })
}
