//! Emergency phrase detection
//!
//! A cheap keyword pass over the owner's description, run before the model
//! is consulted, so an emergency banner never waits on a network call.

pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "not breathing",
    "can't breathe",
    "difficulty breathing",
    "unconscious",
    "unresponsive",
    "seizure",
    "convulsion",
    "poisoning",
    "poison",
    "ate poison",
    "hit by car",
    "severe bleeding",
    "won't stop bleeding",
    "collapse",
    "collapsed",
    "choking",
    "bloated stomach",
    "twisted stomach",
    // Birds
    "fluffed up and lethargic",
    "sitting at bottom of cage",
    // Reptiles
    "mouth gaping",
    "not moving for days",
    // Fish
    "floating sideways",
    "gasping at surface",
];

/// Keywords found in `text`, case-insensitively, in list order
pub fn detect_emergency_keywords(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .collect()
}
