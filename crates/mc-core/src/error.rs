use thiserror::Error;

/// Errors raised by the MFCC core.
///
/// Zero-energy filters are not an error: the log stage floors them at
/// `1e-10` and the pipeline carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MfccError {
    /// An input length disagrees with the size a table was built for.
    #[error("Dimensions incompatibles ({context}) : attendu {expected}, reçu {actual}")]
    DimensionMismatch {
        /// Which stage rejected the input.
        context: &'static str,
        /// Length the stage was configured for.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A frame contains `NaN` or an infinity.
    #[error("Échantillon non fini à l'index {index}")]
    NonFiniteSample {
        /// Position of the first offending sample in the frame.
        index: usize,
    },

    /// A construction parameter is out of range.
    #[error("Configuration invalide : {0}")]
    InvalidConfiguration(String),
}

impl MfccError {
    /// Shorthand for [`MfccError::DimensionMismatch`].
    #[must_use]
    pub fn mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }

    /// Shorthand for [`MfccError::InvalidConfiguration`].
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_lengths() {
        let e = MfccError::mismatch("dct", 24, 23);
        let msg = e.to_string();
        assert!(msg.contains("dct"));
        assert!(msg.contains("24"));
        assert!(msg.contains("23"));
    }

    #[test]
    fn non_finite_message_names_index() {
        let msg = MfccError::NonFiniteSample { index: 17 }.to_string();
        assert!(msg.contains("17"));
    }
}
