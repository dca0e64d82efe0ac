//! Alias translation for raw column tokens
//!
//! Files may name a column by a raw alias that carries its unit, e.g. `u/mV`
//! for a voltage in millivolts. The translator maps such aliases to the
//! canonical column token and a scale factor that converts milli-units to
//! base units on ingest.

use crate::config::AliasConfig;
use crate::constants::{MILLI_UNIT_MARKERS, MILLI_UNIT_SCALE};
use std::collections::HashMap;

/// Resolved alias: canonical token plus the unit scale applied on ingest
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub token: String,
    pub scale: f64,
}

/// Maps raw token aliases to canonical column tokens
#[derive(Debug, Clone, Default)]
pub struct TokenAliasTranslator {
    /// Normalized alias to translation
    aliases: HashMap<String, Translation>,
}

impl TokenAliasTranslator {
    /// Create an empty translator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator from configured alias entries
    pub fn from_config(entries: &[AliasConfig]) -> Self {
        let mut translator = Self::new();
        for entry in entries {
            translator.register(&entry.alias, &entry.token);
        }
        translator
    }

    /// Register an alias for a canonical token
    ///
    /// The unit scale is derived from the alias name: names containing
    /// `mV`, `mA` or `ms` are scaled by 1/1000.
    pub fn register(&mut self, alias: &str, token: &str) {
        let translation = Translation {
            token: token.to_string(),
            scale: unit_scale(alias),
        };
        self.aliases.insert(normalize(alias), translation);
    }

    /// Whether the token is a registered alias
    pub fn has_alias(&self, token: &str) -> bool {
        self.aliases.contains_key(&normalize(token))
    }

    /// Translation of the token, if it is a registered alias
    pub fn translate(&self, token: &str) -> Option<&Translation> {
        self.aliases.get(&normalize(token))
    }

    /// Canonical name for a token: the alias target, or the token itself
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.translate(token)
            .map(|t| t.token.as_str())
            .unwrap_or(token)
    }

    /// Number of registered aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether no alias is registered
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Lower-case the first character only; the rest of the token is case-sensitive
fn normalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unit_scale(alias: &str) -> f64 {
    if MILLI_UNIT_MARKERS.iter().any(|marker| alias.contains(marker)) {
        MILLI_UNIT_SCALE
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> TokenAliasTranslator {
        let mut translator = TokenAliasTranslator::new();
        translator.register("u/mV", "u");
        translator.register("i/mA", "i");
        translator.register("t/ms", "t");
        translator.register("rhoa", "rhoa");
        translator.register("err/%", "err");
        translator
    }

    #[test]
    fn test_first_character_is_case_insensitive() {
        let translator = translator();
        assert!(translator.has_alias("u/mV"));
        assert!(translator.has_alias("U/mV"));
        assert!(translator.has_alias("Rhoa"));
        // Only the first character is normalized
        assert!(!translator.has_alias("u/MV"));
        assert!(!translator.has_alias("RHOA"));
    }

    #[test]
    fn test_translate_returns_none_for_unknown() {
        let translator = translator();
        assert!(translator.translate("k").is_none());
        assert!(!translator.has_alias(""));
        assert_eq!(translator.resolve("k"), "k");
    }

    #[test]
    fn test_milli_unit_scale() {
        let translator = translator();
        assert_eq!(translator.translate("u/mV").unwrap().scale, 1.0 / 1000.0);
        assert_eq!(translator.translate("I/mA").unwrap().scale, 1.0 / 1000.0);
        assert_eq!(translator.translate("t/ms").unwrap().scale, 1.0 / 1000.0);
        assert_eq!(translator.translate("err/%").unwrap().scale, 1.0);
        assert_eq!(translator.translate("rhoa").unwrap().scale, 1.0);
    }

    #[test]
    fn test_resolve_and_from_config() {
        let entries = vec![AliasConfig {
            alias: "Ua".to_string(),
            token: "u".to_string(),
        }];
        let translator = TokenAliasTranslator::from_config(&entries);
        assert_eq!(translator.len(), 1);
        assert_eq!(translator.resolve("ua"), "u");
        assert_eq!(translator.resolve("Ua"), "u");
        assert!(!TokenAliasTranslator::new().has_alias("ua"));
        assert!(TokenAliasTranslator::new().is_empty());
    }
}
