use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    /// A penalty passed to the weight accumulator was negative or not a
    /// finite number. This is a contract violation by the caller (typically
    /// a bad entry in a `WeightTable` override) and fails fast.
    #[error("Invalid weight penalty {value}: penalties must be finite and non-negative")]
    InvalidWeight { value: f64 },

    /// Internal control-flow signal: a deferred assertion needs asynchronous
    /// evaluation, so the synchronous pass cannot complete. Caught at the
    /// `diff_elements`/`contains` entry points, which re-run the whole
    /// computation on the asynchronous engine. Never visible to callers.
    #[error("Diff requires asynchronous evaluation")]
    RequiresAsync,
}

pub type Result<T> = std::result::Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = DiffError::InvalidWeight { value: -2.0 };
        assert_eq!(
            err.to_string(),
            "Invalid weight penalty -2: penalties must be finite and non-negative"
        );
    }
}
