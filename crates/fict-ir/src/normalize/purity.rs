//! Purity/no-memo directive detection (§4.1).

const PURE_DIRECTIVE: &str = "use pure";
const NO_MEMO_DIRECTIVE: &str = "use no memo";
const PURE_COMMENT_MARKERS: [&str; 2] = ["@__PURE__", "@#__PURE__"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurityFlags {
    pub pure: bool,
    pub no_memo: bool,
}

/// `pure`/`no_memo` is the OR of: an enclosing program-level directive, a
/// function-body directive, a leading purity comment, and an explicit
/// caller-supplied override (§4.1 (a)-(d)).
pub fn detect_purity(
    program_directives: &[String],
    function_directives: &[String],
    leading_comments: &[String],
    caller_override: PurityFlags,
) -> PurityFlags {
    let has_directive = |directives: &[String], needle: &str| {
        directives.first().map(|d| d.as_str()) == Some(needle)
            || directives.iter().any(|d| d == needle)
    };

    let pure = caller_override.pure
        || has_directive(program_directives, PURE_DIRECTIVE)
        || has_directive(function_directives, PURE_DIRECTIVE)
        || leading_comments
            .iter()
            .any(|c| PURE_COMMENT_MARKERS.iter().any(|m| c.contains(m)));

    let no_memo = caller_override.no_memo
        || has_directive(program_directives, NO_MEMO_DIRECTIVE)
        || has_directive(function_directives, NO_MEMO_DIRECTIVE);

    PurityFlags { pure, no_memo }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_directive_sets_pure() {
        let flags = detect_purity(&[], &["use pure".to_string()], &[], PurityFlags::default());
        assert!(flags.pure);
        assert!(!flags.no_memo);
    }

    #[test]
    fn pure_comment_sets_pure() {
        let flags = detect_purity(&[], &[], &["/* @__PURE__ */".to_string()], PurityFlags::default());
        assert!(flags.pure);
    }

    #[test]
    fn program_directive_propagates() {
        let flags = detect_purity(&["use no memo".to_string()], &[], &[], PurityFlags::default());
        assert!(flags.no_memo);
    }

    #[test]
    fn no_directive_no_flags() {
        let flags = detect_purity(&[], &[], &[], PurityFlags::default());
        assert_eq!(flags, PurityFlags::default());
    }
}
