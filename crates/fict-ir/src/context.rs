//! Ambient compilation state (§5).
//!
//! The macro-alias set and the warning callback are scoped to a single
//! compilation and threaded explicitly through the builder rather than kept
//! in a global — a nested compilation (an arrow-function body built while
//! its enclosing function is still being lowered, see [`crate::build`])
//! simply borrows the same [`CompileOptions`] its parent holds, so there is
//! nothing to save and restore across the recursion.
//!
//! The destructuring-temporary counter is the one piece of truly global
//! state (§6, §9): its names are only observed in diagnostics and printed
//! IR, so a collision-free but non-deterministic-across-runs counter is an
//! accepted tradeoff, not a bug.

use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// Canonical macro names. User configuration only ever adds *aliases* that
/// resolve to one of these; the canonical names are always recognized.
pub const CANONICAL_STATE_MACRO: &str = "$state";
pub const CANONICAL_EFFECT_MACRO: &str = "$effect";

/// Resolves user-chosen alias identifiers to the canonical macro name they
/// stand for (§4.1).
#[derive(Debug, Clone)]
pub struct MacroAliases {
    state: FxHashSet<String>,
    effect: FxHashSet<String>,
}

impl MacroAliases {
    pub fn new(state_alias: Option<&str>, effect_alias: Option<&str>) -> Self {
        let mut state = FxHashSet::default();
        state.insert(CANONICAL_STATE_MACRO.to_string());
        if let Some(alias) = state_alias {
            state.insert(alias.to_string());
        }

        let mut effect = FxHashSet::default();
        effect.insert(CANONICAL_EFFECT_MACRO.to_string());
        if let Some(alias) = effect_alias {
            effect.insert(alias.to_string());
        }

        Self { state, effect }
    }

    /// Returns the canonical name this identifier resolves to, or `None` if
    /// it names neither macro.
    pub fn canonicalize(&self, name: &str) -> Option<&'static str> {
        if self.state.contains(name) {
            Some(CANONICAL_STATE_MACRO)
        } else if self.effect.contains(name) {
            Some(CANONICAL_EFFECT_MACRO)
        } else {
            None
        }
    }
}

impl Default for MacroAliases {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Per-compilation options (§6's `macroAliases`, `inlineDerivedMemos`, and
/// the `CROSS_BLOCK_CONST_PROP` environment toggle).
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub macro_aliases: MacroAliases,
    pub inline_derived_memos: bool,
    pub cross_block_const_prop: bool,
    /// Source file name, attached to build errors for diagnostics.
    pub file: Option<String>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self {
            macro_aliases: MacroAliases::default(),
            inline_derived_memos: false,
            cross_block_const_prop: Self::cross_block_const_prop_from_env(),
            file: None,
        }
    }

    fn cross_block_const_prop_from_env() -> bool {
        std::env::var("CROSS_BLOCK_CONST_PROP")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_macro_aliases(mut self, aliases: MacroAliases) -> Self {
        self.macro_aliases = aliases;
        self
    }

    pub fn with_inline_derived_memos(mut self, enabled: bool) -> Self {
        self.inline_derived_memos = enabled;
        self
    }

    pub fn with_cross_block_const_prop(mut self, enabled: bool) -> Self {
        self.cross_block_const_prop = enabled;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-global destructuring-temporary counter (§6, §9): names are
/// `__destruct_<n>` with `n` monotonically increasing across the whole
/// process, not reset per function or per file.
static DESTRUCT_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn next_destructure_id() -> u32 {
    DESTRUCT_COUNTER.fetch_add(1, Ordering::Relaxed)
}
