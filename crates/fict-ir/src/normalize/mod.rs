//! AST normalization (§4.1): destructuring-temp naming helpers, purity
//! directive detection, and macro-alias canonicalization. Macro aliases are
//! defined in [`crate::context`] since they are per-compilation
//! configuration rather than a stateless transform; re-exported here for
//! discoverability alongside the rest of the normalizer.

pub mod destructure;
pub mod purity;

pub use crate::context::MacroAliases;
pub use purity::{detect_purity, PurityFlags};
