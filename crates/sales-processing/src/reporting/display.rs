//! Display helpers for labels shown in reports.

use crate::config::LabelRule;

/// Shorten `label` according to `rule`.
///
/// Labels of at most `rule.threshold` characters are returned unchanged;
/// longer labels keep their first `rule.keep` characters followed by `...`.
/// Lengths are counted in characters, so multi-byte text is never split.
pub fn truncate_label(label: &str, rule: LabelRule) -> String {
    if label.chars().count() <= rule.threshold {
        return label.to_string();
    }
    let kept: String = label.chars().take(rule.keep).collect();
    format!("{}...", kept)
}
