//! Policy merge resolver: builtin defaults, then policy packs, then the repo-local override.

pub mod merge;
pub mod packs;
pub mod resolver;
pub mod types;

pub use merge::merge;
pub use packs::{builtin_pack_names, load_pack, resolve_pack, LoadedPack, PackSource, ResolvedPack};
pub use resolver::{default_verify_document, resolve_verify_config};
pub use types::*;
