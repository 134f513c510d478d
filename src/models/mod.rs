pub mod trip;
pub mod user;

/// A partial-update field applies only when it is present and non-empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
