//! `@fictReturn` annotation parsing (§4.6).
//!
//! The annotation lives in a leading comment on a function/declaration.
//! Accepted bodies: a quoted role (`'signal'`/`'memo'`), an object literal
//! of `key: role` pairs, or an array literal of `index: role` pairs.
//! Whitespace is insignificant; an unrecognized role anywhere in the body
//! causes the whole annotation to be ignored rather than partially applied.

use crate::ir::function::{AccessorRole, HookReturnInfo};
use rustc_hash::FxHashMap;

const MARKER: &str = "@fictReturn";

/// Tries each candidate comment in order and returns the first successfully
/// parsed annotation (§4.6: "accepts an array of candidate nodes").
pub fn parse_fict_return<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<HookReturnInfo> {
    candidates.into_iter().find_map(parse_comment)
}

fn parse_comment(comment: &str) -> Option<HookReturnInfo> {
    let idx = comment.find(MARKER)?;
    let body = comment[idx + MARKER.len()..].trim_start();
    parse_body(body)
}

fn parse_body(body: &str) -> Option<HookReturnInfo> {
    let body = body.trim_start();
    let mut chars = body.chars();
    match chars.next()? {
        '\'' | '"' => parse_direct_accessor(body),
        '{' => parse_object_props(body).map(HookReturnInfo::ObjectProps),
        '[' => parse_array_props(body).map(HookReturnInfo::ArrayProps),
        _ => None,
    }
}

fn parse_direct_accessor(body: &str) -> Option<HookReturnInfo> {
    let quote = body.chars().next()?;
    let rest = &body[quote.len_utf8()..];
    let end = rest.find(quote)?;
    let role = AccessorRole::parse(rest[..end].trim())?;
    Some(HookReturnInfo::DirectAccessor(role))
}

/// Extracts the substring between the first balanced `open`/`close` pair
/// (no nested braces/brackets expected in this grammar).
fn extract_balanced(body: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0i32;
    let mut start = None;
    for (i, c) in body.char_indices() {
        if c == open {
            if depth == 0 {
                start = Some(i + open.len_utf8());
            }
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&body[start?..i]);
            }
        }
    }
    None
}

fn parse_role_value(value: &str) -> Option<AccessorRole> {
    let value = value.trim();
    let quote = value.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let rest = &value[quote.len_utf8()..];
    let end = rest.find(quote)?;
    AccessorRole::parse(rest[..end].trim())
}

fn parse_object_props(body: &str) -> Option<FxHashMap<String, AccessorRole>> {
    let inner = extract_balanced(body, '{', '}')?;
    let mut out = FxHashMap::default();
    for entry in inner.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) = entry.split_once(':')?;
        let key = key.trim().trim_matches(|c| c == '\'' || c == '"').to_string();
        let role = parse_role_value(value)?;
        out.insert(key, role);
    }
    Some(out)
}

fn parse_array_props(body: &str) -> Option<FxHashMap<u32, AccessorRole>> {
    let inner = extract_balanced(body, '[', ']')?;
    let mut out = FxHashMap::default();
    for entry in inner.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) = entry.split_once(':')?;
        let index: u32 = key.trim().parse().ok()?;
        let role = parse_role_value(value)?;
        out.insert(index, role);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_accessor() {
        let info = parse_fict_return(["/** @fictReturn 'signal' */"]).unwrap();
        assert_eq!(info, HookReturnInfo::DirectAccessor(AccessorRole::Signal));
    }

    #[test]
    fn object_props() {
        let info = parse_fict_return(["// @fictReturn { count: 'signal', doubled: 'memo' }"]).unwrap();
        match info {
            HookReturnInfo::ObjectProps(map) => {
                assert_eq!(map.get("count"), Some(&AccessorRole::Signal));
                assert_eq!(map.get("doubled"), Some(&AccessorRole::Memo));
            }
            _ => panic!("expected object props"),
        }
    }

    #[test]
    fn array_props() {
        let info = parse_fict_return(["@fictReturn [0: 'signal', 1: 'memo']"]).unwrap();
        match info {
            HookReturnInfo::ArrayProps(map) => {
                assert_eq!(map.get(&0), Some(&AccessorRole::Signal));
                assert_eq!(map.get(&1), Some(&AccessorRole::Memo));
            }
            _ => panic!("expected array props"),
        }
    }

    #[test]
    fn unknown_role_ignored() {
        assert!(parse_fict_return(["@fictReturn 'bogus'"]).is_none());
        assert!(parse_fict_return(["@fictReturn { a: 'bogus' }"]).is_none());
    }

    #[test]
    fn first_match_wins() {
        let info = parse_fict_return(["no annotation here", "@fictReturn 'memo'"]).unwrap();
        assert_eq!(info, HookReturnInfo::DirectAccessor(AccessorRole::Memo));
    }

    #[test]
    fn no_annotation_returns_none() {
        assert!(parse_fict_return(["just a regular comment"]).is_none());
    }
}
