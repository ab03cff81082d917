pub mod appointment_repository;
pub mod bed_repository;
pub mod billing_repository;
pub mod medicine_repository;
pub mod patient_repository;
pub mod staff_repository;
pub mod user_repository;

pub use appointment_repository::*;
pub use bed_repository::*;
pub use billing_repository::*;
pub use medicine_repository::*;
pub use patient_repository::*;
pub use staff_repository::*;
pub use user_repository::*;

/// Wraps a user search term for `LIKE ? ESCAPE '\'`, so `%` and `_` match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("obi"), "%obi%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
