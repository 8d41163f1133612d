//! Naming rules for the local gallery tree
//!
//! Remote names map to local names as follows:
//! - `Sunset Beach.png` → `sunset-beach.png` (file, lower-cased, spaces → hyphens)
//! - `Summer Trip` → `summer-trip/` (gallery directory, same rule)
//! - `summer-trip` → "Summer Trip" (gallery title, hyphens → spaces, title-cased)
//!
//! Collisions are not resolved: two remote names that sanitize to the same
//! local name overwrite each other.

use chrono::{DateTime, Utc};

/// Sanitizes a remote name into a local file or directory name.
///
/// Lower-cases the whole string (extension included) and replaces every
/// space with a hyphen. Nothing else changes.
pub fn sanitize_file_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Returns true if `name` can be joined onto a directory without escaping it.
pub fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Derives a gallery title from its folder name.
///
/// Hyphens become spaces, then each word is title-cased: a letter is
/// upper-cased when the preceding character is not a letter, lower-cased
/// otherwise.
pub fn gallery_title(folder_name: &str) -> String {
    let mut title = String::with_capacity(folder_name.len());
    let mut previous_is_letter = false;

    for c in folder_name.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if previous_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            title.push(c);
            previous_is_letter = false;
        }
    }

    title
}

/// The calendar date (`YYYY-MM-DD`) of a folder's creation time, or `default`.
pub fn gallery_date(created: Option<&DateTime<Utc>>, default: &str) -> String {
    created
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| default.to_string())
}
