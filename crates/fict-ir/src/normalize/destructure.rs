//! Naming and shape helpers for destructuring expansion (§4.1, §6).
//!
//! The actual expansion into `Assign` instructions lives in
//! [`crate::build::destructure`], where it has access to the builder's
//! current block and its expression-lowering logic; this module only holds
//! the pure, stateless pieces: synthesized name formats and the set of keys
//! an object rest-pattern must exclude.

use crate::context::next_destructure_id;
use fict_ast::ObjectPattern;

/// Rest-prop helper the emitter invokes as `rest = __fictPropsRest(tmp, [excluded_keys])`.
pub const REST_PROP_HELPER: &str = "__fictPropsRest";

/// A fresh `__destruct_<n>` temporary name, drawn from the process-global
/// counter (§6, §9).
pub fn fresh_destructure_temp() -> String {
    format!("__destruct_{}", next_destructure_id())
}

pub fn for_of_binding_name(block_id: u32) -> String {
    format!("__forOf_{block_id}")
}

pub fn for_in_binding_name(block_id: u32) -> String {
    format!("__forIn_{block_id}")
}

/// The bound (non-rest) keys of an object pattern, excluded from its rest
/// element.
pub fn excluded_keys(pattern: &ObjectPattern) -> Vec<String> {
    pattern.properties.iter().map(|p| p.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The counter is process-global (§6, §9), so this only checks that two
    /// calls in sequence never collide — not specific values, since other
    /// tests in this binary share the same counter.
    #[test]
    fn temp_names_never_collide() {
        let a = fresh_destructure_temp();
        let b = fresh_destructure_temp();
        assert_ne!(a, b);
        assert!(a.starts_with("__destruct_"));
        assert!(b.starts_with("__destruct_"));
    }
}
