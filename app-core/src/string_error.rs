//! Errors that cross the frontend/backend boundary are plain strings. This
//! module provides a shorthand to turn foreign errors into them.

use std::fmt::Display;

pub trait ErrorStringExt<T> {
    /// Replace the error with `"{msg}: {err}"`.
    fn err_to_string(self, msg: &str) -> Result<T, String>;
}

impl<T, E: Display> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, msg: &str) -> Result<T, String> {
        self.map_err(|err| format!("{msg}: {err}"))
    }
}
