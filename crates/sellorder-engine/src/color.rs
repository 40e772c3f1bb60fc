//! Color label extraction from variant display titles.
//!
//! Title format contract: variant titles are either `"<Color> / <Size>"` or a
//! bare color such as `"Navy"`. Anything else is treated as colorless.

/// Separator between the color and the rest of a variant title.
const SEPARATOR: &str = " / ";

/// Bare titles that are sizes, not colors. Compared case-insensitively.
const SIZE_TOKENS: &[&str] = &[
    "xs", "s", "m", "l", "xl", "xxl", "2xl", "3xl", "4xl", "5xl", "6xl",
];

/// Derives a color label from a variant title.
///
/// - `"Red / L"` yields `"Red"` (text before the first `" / "`, trimmed).
/// - `"Red"` yields `"Red"` (a bare title with no digit that is not a size).
/// - `"XL"`, `"2XL"`, `"007"` and `""` yield `None`.
///
/// The heuristic is lossy on purpose: a bare color containing a digit is
/// misclassified as colorless. Callers treat `None` as "no color group".
#[must_use]
pub fn extract_color(title: &str) -> Option<&str> {
    if let Some((head, _)) = title.split_once(SEPARATOR) {
        let color = head.trim();
        return (!color.is_empty()).then_some(color);
    }

    let bare = title.trim();
    if bare.is_empty() || bare.chars().any(|c| c.is_ascii_digit()) || is_size_token(bare) {
        return None;
    }
    Some(bare)
}

fn is_size_token(value: &str) -> bool {
    SIZE_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(value))
}
