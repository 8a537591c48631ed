use std::collections::HashMap;

use super::Special;

/// Maximal-munch table for the special tokens: probing with `can_match`
/// decides whether a longer token is still possible, `get` resolves the
/// finished lexeme.
#[derive(Debug, Clone, Default)]
pub struct LexMap {
    map: HashMap<&'static str, Special>,
}

impl LexMap {
    pub fn insert(&mut self, key: &'static str, value: Special) {
        self.map.insert(key, value);
    }

    pub fn can_match(&self, key: &str) -> bool {
        self.map.keys().any(|map_key| map_key.starts_with(key))
    }

    pub fn get(&self, key: &str) -> Option<Special> {
        self.map.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_probing() {
        let mut map = LexMap::default();
        map.insert("=~", Special::Match);
        map.insert("==", Special::Equal);

        assert!(map.can_match("="));
        assert!(map.can_match("=~"));
        assert!(!map.can_match("=x"));
        assert_eq!(map.get("=="), Some(Special::Equal));
        assert_eq!(map.get("="), None);
    }
}
