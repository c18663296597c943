//! Parsing the `#key_value` suffix convention used on targeted asset
//! directories (§4.2): `assets/images#lang_fr`, `assets/foo#tcf_etc1_rgb8`,
//! `assets/foo#tier_1`, `assets/foo#countries_latam`, `assets/foo#opengl_3.1`.
//!
//! The suffix lives on one path *component*, not necessarily the last one —
//! `assets/strings#lang_fr/a.txt` targets the `strings#lang_fr` directory
//! even though the entry's final segment is a plain file name.

use once_cell::sync::Lazy;
use regex::Regex;

/// One `#key_value` suffix parsed off a path's targeted component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedSegment {
    /// The directory path with the suffix stripped, e.g. `"assets/images"`.
    pub base_path: String,
    pub key: String,
    pub value: String,
}

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<dir>[^#]*)#(?P<key>[a-z0-9_]+?)_(?P<value>.+)$").unwrap());

/// Find the path component carrying a `#key_value` suffix, if any, and
/// parse it. A path with no such component returns `None`: it is
/// untargeted on every suffix-based dimension.
pub fn parse_targeted_segment(path: &str) -> Option<TargetedSegment> {
    let components: Vec<&str> = path.split('/').collect();
    let idx = components.iter().position(|segment| segment.contains('#'))?;
    let caps = SEGMENT_RE.captures(components[idx])?;
    let dir = caps.name("dir")?.as_str();

    let mut base_components: Vec<&str> = components[..idx].to_vec();
    base_components.push(dir);

    Some(TargetedSegment {
        base_path: base_components.join("/"),
        key: caps.name("key")?.as_str().to_string(),
        value: caps.name("value")?.as_str().to_string(),
    })
}

/// The common parent "family" a targeted directory belongs to: its
/// `base_path`. Directories sharing a family are siblings that alternate on
/// the same dimension (§4.2 TCF/Graphics per-family alternatives rule).
pub fn family_of(path: &str) -> String {
    parse_targeted_segment(path)
        .map(|s| s.base_path)
        .unwrap_or_else(|| path.to_string())
}

/// Remove a path's `#key_value` suffix, preserving the rest of the path
/// (both the components before the targeted directory and any file path
/// beneath it). Returns `None` for a path with no targeted component, same
/// as `parse_targeted_segment` (§6 `suffix_stripping`).
pub fn strip_suffix(path: &str) -> Option<String> {
    let components: Vec<&str> = path.split('/').collect();
    let idx = components.iter().position(|segment| segment.contains('#'))?;
    let caps = SEGMENT_RE.captures(components[idx])?;
    let dir = caps.name("dir")?.as_str();

    let mut rewritten = components;
    rewritten[idx] = dir;
    Some(rewritten.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_suffix() {
        let seg = parse_targeted_segment("assets/images#lang_fr").unwrap();
        assert_eq!(seg.base_path, "assets/images");
        assert_eq!(seg.key, "lang");
        assert_eq!(seg.value, "fr");
    }

    #[test]
    fn parses_tcf_suffix_with_underscore_in_value() {
        let seg = parse_targeted_segment("assets/textures#tcf_etc1_rgb8").unwrap();
        assert_eq!(seg.base_path, "assets/textures");
        assert_eq!(seg.key, "tcf");
        assert_eq!(seg.value, "etc1_rgb8");
    }

    #[test]
    fn parses_suffix_on_a_nested_file_path() {
        let seg = parse_targeted_segment("assets/strings#lang_fr/a.txt").unwrap();
        assert_eq!(seg.base_path, "assets/strings");
        assert_eq!(seg.key, "lang");
        assert_eq!(seg.value, "fr");
    }

    #[test]
    fn untargeted_directory_returns_none() {
        assert_eq!(parse_targeted_segment("assets/images"), None);
    }

    #[test]
    fn family_groups_by_base_path() {
        assert_eq!(family_of("assets/tex#tcf_astc"), family_of("assets/tex#tcf_etc1_rgb8"));
        assert_ne!(family_of("assets/tex#tcf_astc"), family_of("assets/other#tcf_astc"));
    }

    #[test]
    fn strip_suffix_preserves_the_nested_file_path() {
        assert_eq!(strip_suffix("assets/tex#tcf_astc/a.ktx").as_deref(), Some("assets/tex/a.ktx"));
    }

    #[test]
    fn strip_suffix_on_untargeted_path_returns_none() {
        assert_eq!(strip_suffix("assets/images/a.png"), None);
    }
}
