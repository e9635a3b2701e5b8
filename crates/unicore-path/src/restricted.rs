use unicore_value::Key;

/// Introspection names that are never resolved through a path.
pub const RESTRICTED_KEYS: &[&str] = &[
    "__class__",
    "__globals__",
    "__builtins__",
    "__dict__",
    "__bases__",
    "__subclasses__",
    "__code__",
    "__module__",
    "__mro__",
    "__init__",
    "__getattribute__",
];

pub fn is_restricted(key: &Key) -> bool {
    key.as_str().is_some_and(is_restricted_name)
}

pub fn is_restricted_name(name: &str) -> bool {
    RESTRICTED_KEYS.contains(&name)
}

/// First restricted segment of a path, if any.
pub fn find_restricted(parts: &[Key]) -> Option<&str> {
    parts.iter().find_map(|p| p.as_str().filter(|s| is_restricted_name(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_restricted() {
        let parts = vec![Key::from("a"), Key::from("__class__"), Key::Int(0)];
        assert_eq!(find_restricted(&parts), Some("__class__"));
        assert_eq!(find_restricted(&[Key::from("class")]), None);
        assert!(!is_restricted(&Key::Int(1)));
    }
}
