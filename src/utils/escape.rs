/// Escapes a string for use inside a C++ string literal.
#[must_use]
pub(crate) fn escape_cpp(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}
