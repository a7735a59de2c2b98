//! Field and method descriptor scanning.

/// Extracts every object-type token (`L...;`) from a descriptor, in
/// internal form without the `L` and `;` delimiters. Primitive types
/// contribute nothing.
pub(crate) fn object_types(descriptor: &str) -> Vec<&str> {
    let mut types = Vec::new();
    let mut rest = descriptor;
    while let Some(start) = rest.find('L') {
        let Some(len) = rest[start + 1..].find(';') else {
            break;
        };
        types.push(&rest[start + 1..start + 1 + len]);
        rest = &rest[start + 1 + len + 1..];
    }
    types
}
