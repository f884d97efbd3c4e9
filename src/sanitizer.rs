/// Trait for the markup-stripping primitive applied to string leaves.
///
/// `MarkupSanitizer` is the seam between the pipeline and whatever HTML
/// cleaner the host wants to trust. The pipeline only ever hands it string
/// leaves and stores whatever comes back.
///
/// # Invariants
///
/// Implementations MUST:
/// - Be total: every input string yields an output string (worst case the
///   input unchanged, or empty)
/// - Be idempotent: sanitizing already-sanitized output changes nothing
/// - Be safe to call from many requests at once
///
/// Any `Fn(&str) -> String` closure that is `Send + Sync` is a
/// `MarkupSanitizer`, so hosts can plug in their own primitive.
///
/// # Examples
///
/// ```
/// use disinfect::MarkupSanitizer;
///
/// let upper = |s: &str| s.to_uppercase();
/// assert_eq!(upper.sanitize("abc"), "ABC");
/// ```
pub trait MarkupSanitizer: Send + Sync {
    /// Returns `input` with disallowed markup removed.
    fn sanitize(&self, input: &str) -> String;
}

impl<F> MarkupSanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, input: &str) -> String {
        self(input)
    }
}

/// Whitelist HTML sanitizer backed by `ammonia`.
///
/// Keeps harmless formatting tags such as `<b>` and `<i>`, drops `<script>`
/// and `<style>` elements together with their content, and strips
/// event-handler and other unsafe attributes. Text is re-serialized, so a
/// bare `&` comes back as `&amp;`. U+00A0 is kept as the character rather
/// than the `&nbsp;` entity, so it still counts as whitespace downstream.
///
/// # Examples
///
/// ```
/// use disinfect::{AmmoniaSanitizer, MarkupSanitizer};
///
/// let cleaned = AmmoniaSanitizer.sanitize("<b>hello</b><script>alert(1)</script>");
/// assert_eq!(cleaned, "<b>hello</b>");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

// The serializer escapes U+00A0 in text and attribute values.
const NBSP_ENTITY: &str = "&nbsp;";

impl MarkupSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, input: &str) -> String {
        ammonia::clean(input).replace(NBSP_ENTITY, "\u{00A0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_keeps_formatting() {
        let input = "<b>hello <i>world</i><script src=foo.js></script></b>";

        assert_eq!(
            AmmoniaSanitizer.sanitize(input),
            "<b>hello <i>world</i></b>"
        );
    }

    #[test]
    fn removes_script_content() {
        assert_eq!(AmmoniaSanitizer.sanitize("<script>x</script>hi"), "hi");
    }

    #[test]
    fn strips_event_handlers() {
        let cleaned = AmmoniaSanitizer.sanitize("<b onclick=\"steal()\">bold</b>");

        assert_eq!(cleaned, "<b>bold</b>");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(AmmoniaSanitizer.sanitize("just text"), "just text");
        assert_eq!(AmmoniaSanitizer.sanitize(""), "");
        assert_eq!(AmmoniaSanitizer.sanitize("   "), "   ");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        for input in [
            "<b>hello <i>world</i><script src=foo.js></script></b>",
            "a & b < c",
            "<p>para</p><iframe src=x></iframe>",
            "Hello 世界 🌍",
            "x\u{00A0}y &nbsp; &amp;nbsp;",
        ] {
            let once = AmmoniaSanitizer.sanitize(input);
            let twice = AmmoniaSanitizer.sanitize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn keeps_no_break_space_as_a_character() {
        assert_eq!(AmmoniaSanitizer.sanitize("\u{00A0}"), "\u{00A0}");
        assert_eq!(AmmoniaSanitizer.sanitize("x\u{00A0}y"), "x\u{00A0}y");
        assert_eq!(
            AmmoniaSanitizer.sanitize("<b>a&nbsp;b</b>"),
            "<b>a\u{00A0}b</b>"
        );
    }

    #[test]
    fn escaped_entity_text_is_left_escaped() {
        assert_eq!(AmmoniaSanitizer.sanitize("&amp;nbsp;"), "&amp;nbsp;");
    }

    #[test]
    fn closures_are_sanitizers() {
        let strip_angles = |s: &str| s.replace(['<', '>'], "");

        assert_eq!(strip_angles.sanitize("<b>x</b>"), "bx/b");
    }
}
