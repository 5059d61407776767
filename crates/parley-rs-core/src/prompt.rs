//! System prompt composition.

/// Separator and heading placed before rendered preferences.
pub const PREFERENCES_SECTION: &str = "\n\nUser Preferences:\n";

/// Append the preference section to the base prompt when there is any text.
pub fn compose_system_prompt(base: &str, preferences: &str) -> String {
    if preferences.is_empty() {
        return base.to_string();
    }
    format!("{base}{PREFERENCES_SECTION}{preferences}")
}
