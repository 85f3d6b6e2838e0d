//! Policy pack resolution and loading.

use std::path::{Path, PathBuf};

use ratchet_core::constants::BUILTIN_PACK_PREFIX;
use ratchet_core::errors::PackError;

/// Packs compiled into the binary, addressed as `builtin:<name>`.
const BUILTIN_PACKS: &[(&str, &str)] = &[
    ("baseline", include_str!("../../packs/baseline.toml")),
    ("evidence", include_str!("../../packs/evidence.toml")),
];

/// Where a resolved pack's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSource {
    Builtin {
        name: String,
        contents: &'static str,
    },
    File(PathBuf),
}

/// A pack reference resolved to a concrete source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPack {
    pub reference: String,
    pub source: PackSource,
}

impl ResolvedPack {
    /// Resolved location as recorded in the verification artifact.
    pub fn path(&self) -> String {
        match &self.source {
            PackSource::Builtin { name, .. } => format!("{BUILTIN_PACK_PREFIX}{name}"),
            PackSource::File(path) => path.display().to_string(),
        }
    }
}

/// A loaded pack: its verify document with `commands` stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPack {
    pub reference: String,
    pub path: String,
    pub verify: serde_json::Value,
}

/// Names of the packs compiled into the binary.
pub fn builtin_pack_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_PACKS.iter().map(|(name, _)| *name)
}

fn builtin(name: &str) -> Option<&'static str> {
    BUILTIN_PACKS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, contents)| *contents)
}

/// Resolve a pack reference to a builtin or a file under `root`.
///
/// `builtin:<name>` must name a compiled-in pack. Anything else is a path
/// relative to `root`; a bare builtin name is accepted when no such file exists.
pub fn resolve_pack(root: &Path, reference: &str) -> Result<ResolvedPack, PackError> {
    if let Some(name) = reference.strip_prefix(BUILTIN_PACK_PREFIX) {
        let Some(contents) = builtin(name) else {
            let available: Vec<&str> = builtin_pack_names().collect();
            tracing::warn!(name, ?available, "unknown builtin policy pack");
            return Err(PackError::UnknownBuiltin {
                name: name.to_string(),
            });
        };
        return Ok(ResolvedPack {
            reference: reference.to_string(),
            source: PackSource::Builtin {
                name: name.to_string(),
                contents,
            },
        });
    }

    let path = root.join(reference);
    if path.is_file() {
        return Ok(ResolvedPack {
            reference: reference.to_string(),
            source: PackSource::File(path),
        });
    }

    if let Some(contents) = builtin(reference) {
        return Ok(ResolvedPack {
            reference: reference.to_string(),
            source: PackSource::Builtin {
                name: reference.to_string(),
                contents,
            },
        });
    }

    Err(PackError::NotFound {
        reference: reference.to_string(),
    })
}

/// Resolve and parse a pack.
///
/// The document is TOML, or JSON for a `.json` file. Its `verify` table is
/// used when present, otherwise the whole document. Packs cannot define
/// commands, so a `commands` key is dropped.
pub fn load_pack(root: &Path, reference: &str) -> Result<LoadedPack, PackError> {
    let resolved = resolve_pack(root, reference)?;

    let document: serde_json::Value = match &resolved.source {
        PackSource::Builtin { contents, .. } => parse_toml(reference, contents)?,
        PackSource::File(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| PackError::Unreadable {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json {
                serde_json::from_str(&text).map_err(|e| PackError::Invalid {
                    reference: reference.to_string(),
                    message: e.to_string(),
                })?
            } else {
                parse_toml(reference, &text)?
            }
        }
    };

    let mut verify = match document.get("verify") {
        Some(v) => v.clone(),
        None => document,
    };
    let Some(map) = verify.as_object_mut() else {
        return Err(PackError::Invalid {
            reference: reference.to_string(),
            message: "pack must be a table".to_string(),
        });
    };
    if map.remove("commands").is_some() {
        tracing::warn!(pack = reference, "policy packs cannot define commands; ignoring");
    }

    Ok(LoadedPack {
        reference: reference.to_string(),
        path: resolved.path(),
        verify,
    })
}

fn parse_toml(reference: &str, text: &str) -> Result<serde_json::Value, PackError> {
    toml::from_str(text).map_err(|e| PackError::Invalid {
        reference: reference.to_string(),
        message: e.to_string(),
    })
}
