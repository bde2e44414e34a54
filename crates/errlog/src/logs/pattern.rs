//! Stack-trace line detection.
//!
//! Pure string helpers used by [`super::capture::TraceCapturer`] to decide
//! whether a continuation line introduces a stack trace or is one of its
//! frames.

/// Frame kinds (used for tracing diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FramePattern {
    /// `1. {main}() /var/www/index.php:0`, optionally behind `[time] PHP `
    Numbered,
    /// `#0 /var/www/a.php(12): foo()`
    Hashed,
}

const INTRODUCER: &[u8] = b"stack trace:";

/// True when the line ends with `stack trace:` (any case).
pub(crate) fn is_trace_introducer(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= INTRODUCER.len()
        && bytes[bytes.len() - INTRODUCER.len()..].eq_ignore_ascii_case(INTRODUCER)
}

/// Recognise a trace frame and return the frame text as it should be kept.
///
/// Numbered frames drop any `[time] PHP` prefix and leading indentation;
/// hashed frames are kept whole.
pub(crate) fn trace_frame(line: &str) -> Option<(FramePattern, &str)> {
    if is_hashed_frame(line) {
        return Some((FramePattern::Hashed, line));
    }

    let body = strip_engine_prefix(line).unwrap_or(line);
    let body = body.trim_start_matches([' ', '\t']);
    if is_numbered_frame(body) {
        return Some((FramePattern::Numbered, body));
    }

    None
}

/// `#<digits> <text>`
fn is_hashed_frame(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('#') else {
        return false;
    };
    let digits = leading_digits(rest);
    digits > 0 && rest[digits..].starts_with(' ')
}

/// `<digits>. <text>`
fn is_numbered_frame(body: &str) -> bool {
    let digits = leading_digits(body);
    digits > 0 && body[digits..].starts_with(". ")
}

/// Strip `[anything] PHP` and require whitespace after it, as xdebug
/// writes `[16-Oct-2026 10:20:30 UTC] PHP   1. {main}() ...`.
fn strip_engine_prefix(line: &str) -> Option<&str> {
    let (_, rest) = crate::parser::classifier::split_bracketed_time(line)?;
    let rest = rest.strip_prefix("PHP")?;
    if rest.starts_with([' ', '\t']) {
        Some(rest)
    } else {
        None
    }
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Introducer ─────────────────────────────────────────────

    #[test]
    fn test_introducer_plain() {
        assert!(is_trace_introducer("Stack trace:"));
        assert!(is_trace_introducer("STACK TRACE:"));
        assert!(is_trace_introducer("[16-Oct-2026 10:20:30 UTC] PHP Stack trace:"));
    }

    #[test]
    fn test_introducer_must_be_suffix() {
        assert!(!is_trace_introducer("Stack trace: #0 foo"));
        assert!(!is_trace_introducer("trace:"));
        assert!(!is_trace_introducer(""));
    }

    #[test]
    fn test_introducer_multibyte_safe() {
        assert!(!is_trace_introducer("日本語のメッセージ"));
        assert!(is_trace_introducer("ошибка stack trace:"));
    }

    // ─── Frames ─────────────────────────────────────────────────

    #[test]
    fn test_hashed_frame() {
        assert_eq!(
            trace_frame("#0 /var/www/a.php(12): foo()"),
            Some((FramePattern::Hashed, "#0 /var/www/a.php(12): foo()"))
        );
        assert_eq!(
            trace_frame("#12 {main}"),
            Some((FramePattern::Hashed, "#12 {main}"))
        );
    }

    #[test]
    fn test_numbered_frame_with_engine_prefix() {
        assert_eq!(
            trace_frame("[16-Oct-2026 10:20:30 UTC] PHP   1. {main}() /var/www/index.php:0"),
            Some((FramePattern::Numbered, "1. {main}() /var/www/index.php:0"))
        );
    }

    #[test]
    fn test_bare_numbered_frame() {
        assert_eq!(trace_frame("1. foo"), Some((FramePattern::Numbered, "1. foo")));
        assert_eq!(trace_frame("  10. bar()"), Some((FramePattern::Numbered, "10. bar()")));
    }

    #[test]
    fn test_non_frames() {
        assert_eq!(trace_frame("  thrown in /var/www/a.php on line 12"), None);
        assert_eq!(trace_frame("#main"), None);
        assert_eq!(trace_frame("#0"), None);
        assert_eq!(trace_frame("1.foo"), None);
        assert_eq!(trace_frame("[t] PHPUnit 1. x"), None);
        assert_eq!(trace_frame("[t] PHP Warning:  x"), None);
        assert_eq!(trace_frame(""), None);
    }
}
