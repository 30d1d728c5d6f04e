//! Result printing shared by every example.

use std::fmt::{Display, Write};

/// Blank line, a `Result:` header, then the elements each followed by a
/// space.
pub fn format_result<T: Display>(values: &[T]) -> String {
    let mut out = String::from("\nResult:\n");
    for v in values {
        let _ = write!(out, "{v} ");
    }
    out.push('\n');
    out
}

pub fn print_result<T: Display>(values: &[T]) {
    print!("{}", format_result(values));
}
