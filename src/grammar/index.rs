//! Symbol -> rule lookup, built once per grammar

use std::collections::HashMap;

use super::{Grammar, Rule};

/// Non-empty list of rules sharing one input symbol, in grammar order.
///
/// Only [`RuleIndex`] constructs these, which keeps them non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternatives {
    rules: Vec<Rule>,
}

impl Alternatives {
    pub fn first(&self) -> &Rule {
        &self.rules[0]
    }

    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of all candidate weights
    pub fn total_probability(&self) -> f64 {
        self.rules.iter().map(|r| r.probability).sum()
    }
}

/// Maps each input symbol to its candidate rules
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    by_symbol: HashMap<char, Alternatives>,
}

impl RuleIndex {
    pub fn from_grammar(grammar: &Grammar) -> Self {
        let mut by_symbol: HashMap<char, Alternatives> = HashMap::new();
        for rule in grammar.rules() {
            by_symbol
                .entry(rule.input)
                .or_insert_with(|| Alternatives { rules: Vec::new() })
                .rules
                .push(rule.clone());
        }
        tracing::debug!("Indexed {} rules over {} symbols", grammar.rules().len(), by_symbol.len());
        Self { by_symbol }
    }

    /// Rules whose input is `symbol`; empty when the symbol is terminal
    pub fn rules_for(&self, symbol: char) -> &[Rule] {
        self.by_symbol
            .get(&symbol)
            .map(Alternatives::as_slice)
            .unwrap_or(&[])
    }

    /// Candidates for `symbol`, or `None` when it is copied through unchanged
    pub fn candidates(&self, symbol: char) -> Option<&Alternatives> {
        self.by_symbol.get(&symbol)
    }

    /// Number of distinct rewritable symbols
    pub fn symbol_count(&self) -> usize {
        self.by_symbol.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{bush, Grammar, Rule};

    #[test]
    fn test_lookup_groups_alternatives_in_order() {
        let grammar = Grammar::new(
            "A",
            vec![
                Rule::new('A', "AB", 1.0),
                Rule::new('B', "A", 0.0),
                Rule::new('A', "BA", 2.0),
            ],
        )
        .unwrap();
        let index = grammar.index();

        let a = index.rules_for('A');
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].output, "AB");
        assert_eq!(a[1].output, "BA");
        assert_eq!(index.candidates('A').unwrap().total_probability(), 3.0);
    }

    #[test]
    fn test_unsorted_rules_need_no_precondition() {
        // inputs deliberately out of order
        let grammar = Grammar::new(
            "Z",
            vec![
                Rule::new('Z', "1", 0.0),
                Rule::new('A', "2", 0.0),
                Rule::new('Z', "3", 0.0),
                Rule::new('M', "4", 0.0),
            ],
        )
        .unwrap();
        let index = grammar.index();
        assert_eq!(index.rules_for('Z').len(), 2);
        assert_eq!(index.rules_for('A').len(), 1);
        assert_eq!(index.rules_for('M').len(), 1);
    }

    #[test]
    fn test_terminal_symbol_is_empty() {
        let index = bush().index();
        assert!(index.rules_for('+').is_empty());
        assert!(index.candidates('[').is_none());
        assert_eq!(index.symbol_count(), 3);
    }
}
