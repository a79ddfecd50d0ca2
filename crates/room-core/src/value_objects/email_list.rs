//! Parsing of pasted invitee lists

use std::collections::HashSet;

use validator::ValidateEmail;

/// Addresses split into usable and rejected entries, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailList {
    /// Lower-cased, de-duplicated, well-formed addresses
    pub valid: Vec<String>,
    /// Entries that failed email validation, as typed
    pub invalid: Vec<String>,
}

impl EmailList {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }
}

/// Split a comma or newline separated list of addresses
pub fn parse_email_list(input: &str) -> EmailList {
    let mut seen = HashSet::new();
    let mut list = EmailList::default();

    for entry in input
        .split([',', '\n', ';'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        if entry.validate_email() {
            let normalized = entry.to_lowercase();
            if seen.insert(normalized.clone()) {
                list.valid.push(normalized);
            }
        } else if !list.invalid.iter().any(|e| e == entry) {
            list.invalid.push(entry.to_string());
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let list = parse_email_list("alice@corp.com, bob@corp.com\ncarol@corp.com");
        assert_eq!(
            list.valid,
            vec!["alice@corp.com", "bob@corp.com", "carol@corp.com"]
        );
        assert!(list.invalid.is_empty());
    }

    #[test]
    fn test_dedupes_case_insensitively() {
        let list = parse_email_list("Alice@Corp.com,alice@corp.com\r\n,ALICE@corp.com");
        assert_eq!(list.valid, vec!["alice@corp.com"]);
    }

    #[test]
    fn test_collects_invalid_entries() {
        let list = parse_email_list("not-an-email, ok@corp.com, @corp.com, not-an-email");
        assert_eq!(list.valid, vec!["ok@corp.com"]);
        assert_eq!(list.invalid, vec!["not-an-email", "@corp.com"]);
    }

    #[test]
    fn test_blank_input() {
        assert!(parse_email_list("  ,\n , ").is_empty());
    }
}
