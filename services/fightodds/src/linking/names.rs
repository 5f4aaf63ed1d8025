//! Fighter name cleanup and comparison keys

/// Collapse whitespace runs to a single space and trim.
///
/// This is the display form: casing is preserved.
pub fn clean_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for a name (cleaned and lowercased)
pub fn normalize_name(name: &str) -> String {
    clean_name(name).to_lowercase()
}

/// Case/whitespace-insensitive name equality
pub fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Unordered pair equality: {a1, a2} == {b1, b2} after normalization
pub fn same_pairing(a1: &str, a2: &str, b1: &str, b2: &str) -> bool {
    let (a1, a2) = (normalize_name(a1), normalize_name(a2));
    let (b1, b2) = (normalize_name(b1), normalize_name(b2));
    (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Jon   Jones \n"), "Jon Jones");
        assert_eq!(clean_name("Israel\tAdesanya"), "Israel Adesanya");
        assert_eq!(clean_name("   "), "");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(" STIPE  Miocic"), "stipe miocic");
        assert!(same_name("jon jones", "Jon  Jones"));
        assert!(!same_name("Jon Jones", "Jon Jone"));
    }

    #[test]
    fn test_same_pairing_is_unordered() {
        assert!(same_pairing("Jon Jones", "Stipe Miocic", "stipe miocic", "JON JONES"));
        assert!(same_pairing("Jon Jones", "Stipe Miocic", "Jon Jones", "Stipe Miocic"));
        assert!(!same_pairing("Jon Jones", "Stipe Miocic", "Jon Jones", "Ciryl Gane"));
        // a repeated name is not a pairing with somebody else
        assert!(!same_pairing("Jon Jones", "Jon Jones", "Jon Jones", "Stipe Miocic"));
    }
}
