//! Minimal robots.txt path-pattern matching: literal text, `*` wildcard,
//! `$` end anchor. Not a full RFC 9309 implementation — enough to get
//! directory- and extension-style disallow rules right.

pub fn path_matches(pattern: &str, path: &str) -> bool {
    let anchored = pattern.ends_with('$');
    let pattern = pattern.trim_end_matches('$');
    if pattern.is_empty() {
        return !anchored || path.is_empty();
    }

    let mut pos = 0usize;
    for (i, part) in pattern.split('*').enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !path[pos..].starts_with(part) {
                return false;
            }
            pos += part.len();
        } else {
            match path[pos..].find(part) {
                Some(idx) => pos += idx + part.len(),
                None => return false,
            }
        }
    }
    if anchored {
        pos == path.len()
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix() {
        assert!(path_matches("/private", "/private/page"));
        assert!(!path_matches("/private", "/public/page"));
    }

    #[test]
    fn wildcard_matches_any_gap() {
        assert!(path_matches("/a*c", "/abc"));
        assert!(path_matches("/a*c", "/abXXXc"));
        assert!(!path_matches("/a*c", "/abXXXd"));
    }

    #[test]
    fn end_anchor_requires_exact_suffix() {
        assert!(path_matches("/a$", "/a"));
        assert!(!path_matches("/a$", "/ab"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        assert!(path_matches("", "/anything"));
    }
}
