// Form engine: per-field and whole-form validation for personal data and
// experiences, draft handling, and skill list edits. Pure functions of the
// current form state; handlers.rs is the only part that touches AppState.

pub mod errors;
pub mod experience;
pub mod handlers;
pub mod messages;
pub mod personal;
pub mod skills;

/// Removes the entry at `index`, keeping the relative order of the rest.
/// Out-of-range indexes leave the list untouched.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}
