//! Masking of secret-bearing strings.

/// The character used to mask redacted positions.
pub const MASK: char = 'x';

/// Number of trailing characters masked when a destination URL is logged.
pub const URL_REDACT_LEN: isize = 12;

/// Replace the last `n` characters of `s` with [`MASK`].
///
/// - `n <= 0` returns `s` unchanged.
/// - `n >= len(s)` masks every character.
///
/// Lengths are counted in characters, so the result always has as many
/// characters as the input.
pub fn redact_last_n(s: &str, n: isize) -> String {
    if n <= 0 {
        return s.to_string();
    }
    let len = s.chars().count();
    let keep = len.saturating_sub(n.unsigned_abs());
    s.chars()
        .enumerate()
        .map(|(i, c)| if i < keep { c } else { MASK })
        .collect()
}

/// Redact a destination URL for use in logs and error messages.
pub fn redact_url(url: &str) -> String {
    redact_last_n(url, URL_REDACT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_redact_table() {
        let cases = [
            ("aaa", 0, "aaa"),
            ("aaa", 1, "aax"),
            ("aaa", 3, "xxx"),
            ("aaa", -1, "aaa"),
            ("aaa", 4, "xxx"),
            ("", 1, ""),
        ];
        for (s, n, want) in cases {
            assert_eq!(redact_last_n(s, n), want, "redact_last_n({s:?}, {n})");
        }
    }

    #[test]
    fn test_redact_multibyte() {
        assert_eq!(redact_last_n("héllo", 2), "hélxx");
        assert_eq!(redact_last_n("日本語", 1), "日本x");
    }

    #[test]
    fn test_redact_url_keeps_host() {
        let url = "https://open.feishu.cn/open-apis/bot/v2/hook/0123456789ab";
        let redacted = redact_url(url);
        assert!(redacted.starts_with("https://open.feishu.cn/open-apis/bot/v2/hook/"));
        assert!(redacted.ends_with("xxxxxxxxxxxx"));
        assert!(!redacted.contains("0123456789ab"));
    }

    proptest! {
        #[test]
        fn prop_non_positive_is_identity(s in ".*", n in -100isize..=0) {
            prop_assert_eq!(redact_last_n(&s, n), s);
        }

        #[test]
        fn prop_length_preserving(s in ".*", n in -100isize..100) {
            prop_assert_eq!(redact_last_n(&s, n).chars().count(), s.chars().count());
        }

        #[test]
        fn prop_full_mask_when_n_covers_input(s in ".*", extra in 0isize..10) {
            let n = s.chars().count() as isize + extra;
            let redacted = redact_last_n(&s, n);
            prop_assert!(redacted.chars().all(|c| c == MASK));
        }
    }
}
