//! Table-driven emoji classifier.
//!
//! Covers the common emoji blocks with a fixed list of inclusive code point
//! ranges. Code points outside the table are reported as non-emoji even when
//! a font renders them as pictographs; that approximation is accepted.

/// Inclusive code point ranges treated as emoji.
pub const EMOJI_RANGES: [(u32, u32); 63] = [
    (0x1F600, 0x1F64F), // Emoticons
    (0x1F300, 0x1F5FF), // Misc symbols and pictographs
    (0x1F680, 0x1F6FF), // Transport and map
    (0x1F1E0, 0x1F1FF), // Regional indicators (flags)
    (0x2600, 0x26FF),   // Misc symbols
    (0x2700, 0x27BF),   // Dingbats
    (0xFE00, 0xFE0F),   // Variation selectors
    (0x1F900, 0x1F9FF), // Supplemental symbols and pictographs
    (0x1FA00, 0x1FA6F), // Chess symbols
    (0x1FA70, 0x1FAFF), // Symbols and pictographs extended-A
    (0x231A, 0x231B),   // Watch, hourglass
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x25AA, 0x25AB),   // Small squares
    (0x25B6, 0x25B6),   // Play button
    (0x25C0, 0x25C0),   // Reverse button
    (0x25FB, 0x25FE),
    (0x2614, 0x2615),   // Umbrella, hot beverage
    (0x2648, 0x2653),   // Zodiac
    (0x267F, 0x267F),
    (0x2693, 0x2693),
    (0x26A1, 0x26A1),   // High voltage
    (0x26AA, 0x26AB),
    (0x26BD, 0x26BE),
    (0x26C4, 0x26C5),
    (0x26CE, 0x26CE),
    (0x26D4, 0x26D4),
    (0x26EA, 0x26EA),
    (0x26F2, 0x26F3),
    (0x26F5, 0x26F5),
    (0x26FA, 0x26FA),
    (0x26FD, 0x26FD),
    (0x2702, 0x2702),
    (0x2705, 0x2705),   // Check mark button
    (0x2708, 0x270D),
    (0x270F, 0x270F),
    (0x2712, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2728, 0x2728),   // Sparkles
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2763, 0x2764),   // Hearts
    (0x2795, 0x2797),
    (0x27A1, 0x27A1),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),   // Arrows
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),   // Star
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),   // Wavy dash
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
];

/// Returns true if the character falls in one of [`EMOJI_RANGES`].
#[must_use]
pub fn is_emoji(c: char) -> bool {
    let cp = u32::from(c);
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| start <= cp && cp <= end)
}

/// Returns true only for a string holding exactly one emoji code point.
#[must_use]
pub fn is_emoji_str(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => is_emoji(c),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_emojis() {
        for c in ['📈', '🚀', '💰', '🔥', '😀', '😊', '🙂', '🎉', '⭐', '❤', '☀'] {
            assert!(is_emoji(c), "{c} should be an emoji");
        }
    }

    #[test]
    fn test_regional_indicators() {
        assert!(is_emoji('\u{1F1FA}'));
        assert!(is_emoji('\u{1F1F8}'));
    }

    #[test]
    fn test_variation_selector() {
        assert!(is_emoji('\u{FE0F}'));
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        assert!(is_emoji('\u{1F600}'));
        assert!(is_emoji('\u{1F64F}'));
        assert!(is_emoji('\u{2600}'));
        assert!(is_emoji('\u{27BF}'));
        assert!(!is_emoji('\u{25FF}'));
        assert!(!is_emoji('\u{1FB00}'));
    }

    #[test]
    fn test_non_emojis() {
        for c in ['A', 'z', '1', ' ', '$', '&', 'é', '中', '™'] {
            assert!(!is_emoji(c), "{c:?} should not be an emoji");
        }
    }

    #[test]
    fn test_is_emoji_str() {
        assert!(is_emoji_str("📈"));
        assert!(!is_emoji_str("AB"));
        assert!(!is_emoji_str("📈📈"));
        assert!(!is_emoji_str(""));
        assert!(!is_emoji_str("A"));
    }
}
