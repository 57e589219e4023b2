//! Stochastic L-System Grammars
//!
//! A grammar is an axiom plus a non-empty list of production rules.
//! Several rules may share an input symbol; one of them is picked per
//! occurrence, weighted by `probability`.
//!
//! - index: symbol -> candidate rules lookup
//! - selector: weighted choice among candidates
//! - production: iterative expansion of the axiom

pub mod index;
pub mod production;
pub mod selector;

pub use index::{Alternatives, RuleIndex};
pub use production::{Limits, ProductionEngine};
pub use selector::select_rule;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A single production: `input -> output`, weighted by `probability`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub input: char,
    pub output: String,
    #[serde(default)]
    pub probability: f64,
}

impl Rule {
    pub fn new(input: char, output: impl Into<String>, probability: f64) -> Self {
        Self {
            input,
            output: output.into(),
            probability,
        }
    }
}

/// Validated grammar. Rules are never empty and the axiom is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GrammarDef")]
pub struct Grammar {
    axiom: String,
    rules: Vec<Rule>,
}

/// Unvalidated grammar as written in a config file
#[derive(Debug, Clone, Deserialize)]
struct GrammarDef {
    axiom: String,
    rules: Vec<RuleDef>,
}

/// Rule input is read as a string so multi-character inputs get a proper error
#[derive(Debug, Clone, Deserialize)]
struct RuleDef {
    input: String,
    output: String,
    #[serde(default)]
    probability: f64,
}

impl Grammar {
    /// Build a grammar, rejecting empty axioms, empty rule lists and bad weights
    pub fn new(axiom: impl Into<String>, rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let axiom = axiom.into();
        if axiom.is_empty() {
            return Err(ConfigError::EmptyAxiom);
        }
        if rules.is_empty() {
            return Err(ConfigError::EmptyRules);
        }

        for (index, rule) in rules.iter().enumerate() {
            if !rule.probability.is_finite() || rule.probability < 0.0 {
                return Err(ConfigError::InvalidProbability {
                    index,
                    input: rule.input,
                    probability: rule.probability,
                });
            }
        }

        Ok(Self { axiom, rules })
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Build the symbol -> rules lookup for this grammar
    pub fn index(&self) -> RuleIndex {
        RuleIndex::from_grammar(self)
    }
}

impl TryFrom<GrammarDef> for Grammar {
    type Error = ConfigError;

    fn try_from(def: GrammarDef) -> Result<Self, Self::Error> {
        let mut rules = Vec::with_capacity(def.rules.len());
        for (index, raw) in def.rules.into_iter().enumerate() {
            let mut chars = raw.input.chars();
            let input = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ConfigError::InvalidRuleInput {
                        index,
                        input: raw.input,
                    })
                }
            };
            rules.push(Rule::new(input, raw.output, raw.probability));
        }
        Grammar::new(def.axiom, rules)
    }
}

/// Default foliage grammar (axiom `X`)
pub fn bush() -> Grammar {
    Grammar {
        axiom: "X".to_string(),
        rules: vec![
            Rule::new('F', "FX[FX[+XF]]", 0.0),
            Rule::new('X', "F[+XZ++X-F[+ZX]][-X++F-X]", 0.0),
            Rule::new('Z', "[+F-X-F][++ZX]", 0.0),
        ],
    }
}

/// Same productions as [`bush`], grown from `Z`
pub fn shrub() -> Grammar {
    Grammar {
        axiom: "Z".to_string(),
        ..bush()
    }
}

/// Stochastic demo: `F` branches left one time in four, right otherwise
pub fn meadow() -> Grammar {
    Grammar {
        axiom: "F".to_string(),
        rules: vec![
            Rule::new('F', "F[+F]F", 1.0),
            Rule::new('F', "F[-F][+F]", 3.0),
            Rule::new('X', "F-[[X]+X]+F[+FX]-X", 0.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rules_rejected() {
        assert_eq!(Grammar::new("X", vec![]), Err(ConfigError::EmptyRules));
    }

    #[test]
    fn test_empty_axiom_rejected() {
        let rules = vec![Rule::new('F', "FF", 0.0)];
        assert_eq!(Grammar::new("", rules), Err(ConfigError::EmptyAxiom));
    }

    #[test]
    fn test_nan_probability_rejected() {
        let rules = vec![Rule::new('F', "FF", f64::NAN)];
        assert!(matches!(
            Grammar::new("F", rules),
            Err(ConfigError::InvalidProbability { index: 0, input: 'F', .. })
        ));
    }

    #[test]
    fn test_negative_probability_rejected() {
        let rules = vec![Rule::new('F', "FF", 1.0), Rule::new('F', "F", -0.5)];
        assert!(matches!(
            Grammar::new("F", rules),
            Err(ConfigError::InvalidProbability { index: 1, .. })
        ));
    }

    #[test]
    fn test_yaml_grammar() {
        let yaml = r#"
axiom: X
rules:
  - { input: X, output: "F[+X]", probability: 1 }
  - { input: F, output: FF }
"#;
        let grammar: Grammar = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(grammar.axiom(), "X");
        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.rules()[1].probability, 0.0);
    }

    #[test]
    fn test_yaml_multichar_input_rejected() {
        let yaml = "axiom: X\nrules:\n  - { input: XY, output: F }\n";
        let err = serde_yaml::from_str::<Grammar>(yaml).unwrap_err();
        assert!(err.to_string().contains("exactly one symbol"));
    }

    #[test]
    fn test_yaml_empty_rules_rejected() {
        let err = serde_yaml::from_str::<Grammar>("axiom: X\nrules: []\n").unwrap_err();
        assert!(err.to_string().contains("no rules"));
    }

    #[test]
    fn test_builtin_grammars_are_valid() {
        for g in [bush(), shrub(), meadow()] {
            assert!(Grammar::new(g.axiom().to_string(), g.rules().to_vec()).is_ok());
        }
    }
}
