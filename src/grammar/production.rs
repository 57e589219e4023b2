//! Iterative string rewriting
//!
//! Each iteration appends the rewrite of the current string to itself:
//! `s <- s + rewrite(s)`. This accumulates every generation rather than
//! replacing it, so length grows faster than geometrically and both the
//! iteration count and the symbol count are bounded by [`Limits`].

use serde::{Deserialize, Serialize};

use super::{select_rule, Grammar, RuleIndex};
use crate::error::{ConfigError, GenerateError, GenerateResult};
use crate::random::RandomSource;

/// Resource bounds for one expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_iterations: u32,
    pub max_symbols: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            max_symbols: 4_000_000,
        }
    }
}

impl Limits {
    /// Reject an iteration count before any work is done
    pub fn check_iterations(&self, iterations: u32) -> Result<(), ConfigError> {
        if iterations > self.max_iterations {
            return Err(ConfigError::TooManyIterations {
                requested: iterations,
                limit: self.max_iterations,
            });
        }
        Ok(())
    }
}

/// Rewrites symbol strings with one grammar's rules
pub struct ProductionEngine {
    index: RuleIndex,
    limits: Limits,
}

impl ProductionEngine {
    pub fn new(grammar: &Grammar, limits: Limits) -> Self {
        Self {
            index: grammar.index(),
            limits,
        }
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    /// One rewrite pass: rule output for rewritable symbols, the symbol itself otherwise
    pub fn rewrite_once<R: RandomSource + ?Sized>(&self, input: &str, rng: &mut R) -> GenerateResult<String> {
        let mut output = String::with_capacity(input.len() * 2);
        self.rewrite_into(input, &mut output, self.limits.max_symbols, 1, rng)?;
        Ok(output)
    }

    /// Expand `axiom` `iterations` times with the accumulating policy
    pub fn expand<R: RandomSource + ?Sized>(&self, axiom: &str, iterations: u32, rng: &mut R) -> GenerateResult<String> {
        self.limits.check_iterations(iterations)?;

        let mut current = axiom.to_string();
        let mut count = current.chars().count();
        if count > self.limits.max_symbols {
            return Err(GenerateError::ExpansionTooLarge {
                iteration: 0,
                limit: self.limits.max_symbols,
            });
        }

        for iteration in 1..=iterations {
            let mut rewrite = String::with_capacity(current.len() * 2);
            let budget = self.limits.max_symbols - count;
            count += self.rewrite_into(&current, &mut rewrite, budget, iteration, rng)?;
            current.push_str(&rewrite);
            tracing::debug!("Iteration {}: {} symbols", iteration, count);
        }

        Ok(current)
    }

    /// Append the rewrite of `input` to `output`, returning the number of symbols added
    fn rewrite_into<R: RandomSource + ?Sized>(
        &self,
        input: &str,
        output: &mut String,
        budget: usize,
        iteration: u32,
        rng: &mut R,
    ) -> GenerateResult<usize> {
        let mut added = 0usize;
        for symbol in input.chars() {
            match self.index.candidates(symbol) {
                None => {
                    output.push(symbol);
                    added += 1;
                }
                Some(candidates) => {
                    let rule = select_rule(candidates, rng);
                    output.push_str(&rule.output);
                    added += rule.output.chars().count();
                }
            }

            if added > budget {
                return Err(GenerateError::ExpansionTooLarge {
                    iteration,
                    limit: self.limits.max_symbols,
                });
            }
        }
        Ok(added)
    }
}

/// Expand a grammar's axiom with default limits
pub fn expand<R: RandomSource + ?Sized>(grammar: &Grammar, iterations: u32, rng: &mut R) -> GenerateResult<String> {
    ProductionEngine::new(grammar, Limits::default()).expand(grammar.axiom(), iterations, rng)
}
