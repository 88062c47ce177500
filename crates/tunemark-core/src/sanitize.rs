//! Linux-safe path components for folder titles and song names.

/// Sanitizes one folder title or derived filename for safe use on Linux.
///
/// - Replaces `/`, `\`, NUL, control characters, spaces and tabs with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Yields `_` when nothing survives the trim, so a component is never empty
/// - Limits length to 251 bytes: Linux NAME_MAX minus room for a 4-byte
///   extension (`.m4a`/`.mp3`) appended to song stems
///
/// Idempotent. Must be applied to individual path segments, never to a
/// joined path (it would destroy the separators between directory levels).
pub fn sanitize_component(title: &str) -> String {
    const COMPONENT_MAX: usize = 251;

    let mut out = String::with_capacity(title.len());
    let mut prev_underscore = false;

    for c in title.chars() {
        let replacement = match c {
            '\0' | '/' | '\\' | ' ' | '\t' => '_',
            c if c.is_control() => '_',
            c => c,
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        // All-noise titles (dots, slashes, spaces) must not collapse into
        // the parent directory or produce a hidden ".m4a" file.
        return "_".to_string();
    }

    if trimmed.len() > COMPONENT_MAX {
        let mut take = COMPONENT_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_path_separator() {
        assert_eq!(sanitize_component("a/b"), "a_b");
        assert_eq!(sanitize_component("AC/DC"), "AC_DC");
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(sanitize_component("Artist - Song"), "Artist_-_Song");
    }

    #[test]
    fn idempotent() {
        for s in ["a/b", "Artist - Song", "  x  ", "file___name", "dots...", "..."] {
            let once = sanitize_component(s);
            assert_eq!(sanitize_component(&once), once);
        }
    }

    #[test]
    fn all_noise_titles_never_sanitize_to_empty() {
        for s in ["...", "___", "  ", "///", "", ". . ."] {
            assert_eq!(sanitize_component(s), "_", "for input {s:?}");
        }
    }

    #[test]
    fn collapses_and_trims() {
        assert_eq!(sanitize_component("  ..name.. "), "name");
        assert_eq!(sanitize_component("a //\\ b"), "a_b");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_component("so\x00ng\x07"), "so_ng");
    }

    #[test]
    fn caps_length_at_char_boundary() {
        let long = "é".repeat(200); // 400 bytes
        let out = sanitize_component(&long);
        assert!(out.len() <= 251);
        assert!(out.is_char_boundary(out.len()));
    }

    #[test]
    fn capped_stem_plus_extension_fits_name_max() {
        let long = "a".repeat(300);
        let stem = sanitize_component(&long);
        assert_eq!(stem.len(), 251);
        assert!(format!("{stem}.m4a").len() <= 255);
    }
}
