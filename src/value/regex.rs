use std::rc::Rc;

use regex::Regex;

use crate::interpreter::RuntimeError;

/// A compiled pattern plus its flag set. Flags are drawn from `{g,i,m,s}`;
/// `i`, `m`, and `s` are folded into the pattern as inline groups, while `g`
/// is interpreted by the operations that care about it (e.g. `replace`).
#[derive(Debug, Clone)]
pub struct RegexValue {
    source: String,
    flags: String,
    compiled: Rc<Regex>,
}

impl RegexValue {
    pub fn new(pattern: &str, flags: &str) -> Result<Self, RuntimeError> {
        let mut normalized: Vec<char> = vec![];
        for flag in flags.chars() {
            if !matches!(flag, 'g' | 'i' | 'm' | 's') {
                return Err(RuntimeError::new(format!("invalid regex flag '{flag}'")));
            }
            if !normalized.contains(&flag) {
                normalized.push(flag);
            }
        }
        normalized.sort_unstable();

        let inline = normalized
            .iter()
            .filter(|flag| **flag != 'g')
            .collect::<String>();
        let full_pattern = if inline.is_empty() {
            pattern.to_string()
        } else {
            format!("(?{inline}){pattern}")
        };

        let compiled = Regex::new(&full_pattern)
            .map_err(|e| RuntimeError::new(format!("invalid regex: {e}")))?;

        Ok(Self {
            source: pattern.to_string(),
            flags: normalized.into_iter().collect(),
            compiled: Rc::new(compiled),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn regex(&self) -> &Regex {
        &self.compiled
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}
