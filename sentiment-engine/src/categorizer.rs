use sentiscope_core::Category;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const HIGHLY_NEGATIVE_THRESHOLD: f64 = -0.8;

/// Bucket a compound score. Branches are evaluated in order and the first
/// match wins.
///
/// The three explicit ranges cover every finite score, so the `Neutral`
/// fallback is only reached by `NaN`. A genuinely reachable neutral band would
/// need a lower edge such as `-0.05`; the thresholds are kept as they are until
/// that is decided.
pub fn categorize(compound: f64) -> Category {
    if compound >= POSITIVE_THRESHOLD {
        Category::Positive
    } else if compound <= HIGHLY_NEGATIVE_THRESHOLD {
        Category::HighlyNegative
    } else if compound < POSITIVE_THRESHOLD && compound > HIGHLY_NEGATIVE_THRESHOLD {
        Category::LessNegative
    } else {
        Category::Neutral
    }
}
