//! Status definitions for documents and individual fetch attempts

use std::fmt;

/// Terminal status of a document after its candidates were tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Text was extracted from one candidate and saved
    Saved,

    /// Every candidate was unavailable, too short, or could not be saved
    AllCandidatesFailed,
}

impl TargetStatus {
    /// Returns true if the document was saved
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// Short machine-readable form, used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::AllCandidatesFailed => "all_candidates_failed",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to a single candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Extracted text was long enough and saved
    Accepted { length: usize },

    /// The fetch failed (network, timeout, status, or decoding)
    Unavailable { cause: String },

    /// Extraction produced less text than the acceptance threshold
    TooShort { length: usize, minimum: usize },

    /// Text was acceptable but the sink rejected it
    PersistenceFailed { cause: String },
}

impl AttemptOutcome {
    /// Returns true if this attempt ended the document's candidate loop
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { length } => write!(f, "saved ({} chars)", length),
            Self::Unavailable { cause } => write!(f, "unavailable: {}", cause),
            Self::TooShort { length, minimum } => {
                write!(f, "too short ({} chars, need {})", length, minimum)
            }
            Self::PersistenceFailed { cause } => write!(f, "save failed: {}", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(TargetStatus::Saved.is_success());
        assert!(!TargetStatus::AllCandidatesFailed.is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TargetStatus::Saved), "saved");
        assert_eq!(
            format!("{}", TargetStatus::AllCandidatesFailed),
            "all_candidates_failed"
        );
        assert_eq!(
            AttemptOutcome::TooShort {
                length: 999,
                minimum: 1000
            }
            .to_string(),
            "too short (999 chars, need 1000)"
        );
    }

    #[test]
    fn test_attempt_is_accepted() {
        assert!(AttemptOutcome::Accepted { length: 1500 }.is_accepted());
        assert!(!AttemptOutcome::Unavailable {
            cause: "HTTP 404".to_string()
        }
        .is_accepted());
    }
}
