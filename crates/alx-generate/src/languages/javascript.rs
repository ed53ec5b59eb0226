//! JavaScript placeholder

pub(super) fn generate() -> Vec<String> {
    vec![String::new()]
}
