//! Event codes and their metadata
//!
//! Single source of truth for the codes attached to every log event emitted
//! by the index, grouped by the subsystem that emits them.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Stable identifier attached to a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System codes
pub mod system {
    use super::Code;

    pub const LOGGING_INITIALIZED: Code = Code::new("S001");
}

/// Token registration codes
pub mod index {
    use super::Code;

    pub const TOKEN_REGISTERED: Code = Code::new("I010");
    pub const TOKEN_UNCHANGED: Code = Code::new("I011");
    pub const TOKEN_RELOCATED: Code = Code::new("I012");
    pub const TOKEN_REMOVED: Code = Code::new("I013");
    pub const INDEX_CLEARED: Code = Code::new("I014");
}

/// Structural tree codes
pub mod tree {
    use super::Code;

    pub const FRAGMENT_SPLIT: Code = Code::new("D100");
    pub const FRAGMENT_CREATED: Code = Code::new("D101");
    pub const FRAGMENT_MERGED: Code = Code::new("D102");
    pub const FRAGMENT_DETACHED: Code = Code::new("D103");
    pub const POINT_ABSORBED: Code = Code::new("D104");
    pub const BALANCE_REPAIRED: Code = Code::new("W110");
}

/// Validation codes
pub mod validation {
    use super::Code;

    pub const INVALID_RANGE: Code = Code::new("E001");
    pub const INVARIANT_VIOLATION: Code = Code::new("E010");
}

// ============================================================================
// METADATA LOOKUP
// ============================================================================

/// Get the human readable description of a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "S001" => "Logging system initialized",
        "I010" => "Token registered",
        "I011" => "Token already registered with the same range",
        "I012" => "Token moved to a new range",
        "I013" => "Token removed",
        "I014" => "Index cleared",
        "D100" => "Fragment split at a range boundary",
        "D101" => "Fragment created for uncovered coordinates",
        "D102" => "Adjacent fragments with equal token sets merged",
        "D103" => "Empty fragment detached from the tree",
        "D104" => "Point fragment absorbed by the fragment starting at the same coordinate",
        "W110" => "Balance factor outside rotation range repaired",
        "E001" => "Range end is before range start",
        "E010" => "Tree invariant violated",
        _ => "Unknown code",
    }
}

/// Get the subsystem a code belongs to
pub fn get_category(code: &str) -> &'static str {
    match code.as_bytes().first() {
        Some(b'S') => "system",
        Some(b'I') => "index",
        Some(b'D') => "tree",
        Some(b'W') => "warning",
        Some(b'E') => "validation",
        _ => "unknown",
    }
}

/// Check if a code reports an internal defect rather than caller misuse
pub fn is_internal(code: &str) -> bool {
    matches!(code, "W110" | "E010")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_description() {
        let codes = [
            system::LOGGING_INITIALIZED,
            index::TOKEN_REGISTERED,
            index::TOKEN_UNCHANGED,
            index::TOKEN_RELOCATED,
            index::TOKEN_REMOVED,
            index::INDEX_CLEARED,
            tree::FRAGMENT_SPLIT,
            tree::FRAGMENT_CREATED,
            tree::FRAGMENT_MERGED,
            tree::FRAGMENT_DETACHED,
            tree::POINT_ABSORBED,
            tree::BALANCE_REPAIRED,
            validation::INVALID_RANGE,
            validation::INVARIANT_VIOLATION,
        ];

        for code in codes {
            assert_ne!(
                get_description(code.as_str()),
                "Unknown code",
                "missing description for {}",
                code
            );
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(get_category("D102"), "tree");
        assert_eq!(get_category("E001"), "validation");
        assert!(is_internal(tree::BALANCE_REPAIRED.as_str()));
        assert!(!is_internal(validation::INVALID_RANGE.as_str()));
    }
}
