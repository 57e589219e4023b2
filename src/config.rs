//! Configuration loader - YAML grammar file + .env overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::events::Palette;
use crate::generate::GenerationParams;
use crate::grammar::{self, Grammar, Limits};
use crate::random::DEFAULT_SEED;
use crate::turtle::{TurtleParams, TurtleState};

/// Main configuration loaded from grammars.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub limits: Limits,
    pub grammars: Vec<GrammarEntry>,
}

/// A named grammar definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarEntry {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub grammar: Grammar,
}

/// Generation parameters as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Signed so a negative value gets a proper error instead of a parse failure
    pub iterations: i64,
    pub seed: String,
    pub length_decay: f64,
    pub radius_decay: f64,
    /// Degrees per `+` / `-`
    pub angle_offset: f64,
    pub initial_state: TurtleState,
    pub palette: Palette,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let turtle = TurtleParams::default();
        Self {
            iterations: 4,
            seed: DEFAULT_SEED.to_string(),
            length_decay: turtle.length_decay,
            radius_decay: turtle.radius_decay,
            angle_offset: turtle.angle_offset,
            initial_state: TurtleState::default(),
            palette: turtle.palette,
        }
    }
}

impl GenerationConfig {
    /// Validate and convert into run parameters
    pub fn to_params(&self, limits: Limits) -> Result<GenerationParams, ConfigError> {
        let params = GenerationParams {
            iterations: GenerationParams::iterations_from(self.iterations)?,
            seed: self.seed.clone(),
            initial_state: self.initial_state.validated()?,
            turtle: TurtleParams {
                length_decay: self.length_decay,
                radius_decay: self.radius_decay,
                angle_offset: self.angle_offset,
                palette: self.palette,
            },
            limits,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Per-run overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub grammar: Option<String>,
    pub iterations: Option<i64>,
    pub seed: Option<String>,
}

/// Overrides loaded from .env / the environment
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub log_dir: String,
    pub seed: Option<String>,
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.grammars.is_empty() {
            anyhow::bail!("config defines no grammars");
        }
        Ok(config)
    }

    /// Built-in configuration used when no file exists
    pub fn builtin() -> Self {
        let entry = |id: &str, name: &str, grammar: Grammar| GrammarEntry {
            id: id.to_string(),
            name: name.to_string(),
            grammar,
        };
        Self {
            generation: GenerationConfig::default(),
            limits: Limits::default(),
            grammars: vec![
                entry("bush", "Bush", grammar::bush()),
                entry("shrub", "Shrub", grammar::shrub()),
                entry("meadow", "Meadow (stochastic)", grammar::meadow()),
            ],
        }
    }

    /// Get grammar by ID
    pub fn get_grammar(&self, id: &str) -> Result<&GrammarEntry, ConfigError> {
        self.grammars
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ConfigError::UnknownGrammar(id.to_string()))
    }

    /// First configured grammar
    pub fn default_grammar(&self) -> Option<&GrammarEntry> {
        self.grammars.first()
    }

    /// Grammar and validated parameters for one run.
    ///
    /// Seed precedence: command line, then `FOLIAGE_SEED`, then the file.
    pub fn resolve_run(
        &self,
        overrides: &RunOverrides,
        env: &Env,
    ) -> Result<(&GrammarEntry, GenerationParams), ConfigError> {
        let entry = self.select_grammar(overrides.grammar.as_deref())?;

        let mut generation = self.generation.clone();
        if let Some(iterations) = overrides.iterations {
            generation.iterations = iterations;
        }
        if let Some(seed) = overrides.seed.as_ref().or(env.seed.as_ref()) {
            generation.seed = seed.clone();
        }

        let params = generation.to_params(self.limits)?;
        tracing::debug!(
            "Run: grammar={} seed={:?} iterations={}",
            entry.id,
            params.seed,
            params.iterations
        );
        Ok((entry, params))
    }

    /// Grammar by ID, or the first one when no ID is given
    pub fn select_grammar(&self, id: Option<&str>) -> Result<&GrammarEntry, ConfigError> {
        match id {
            Some(id) => self.get_grammar(id),
            None => self
                .default_grammar()
                .ok_or_else(|| ConfigError::UnknownGrammar("<none configured>".to_string())),
        }
    }
}

impl Env {
    /// Load overrides from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Env {
            log_dir: std::env::var("FOLIAGE_LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            seed: std::env::var("FOLIAGE_SEED").ok().filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Color;
    use crate::geometry::Vec3;

    const SAMPLE: &str = r##"
generation:
  iterations: 3
  seed: willow
  angle_offset: 25
  initial_state:
    direction: [0, 2, 0]
    length: 1.0
  palette:
    restore: "#0000ff"
limits:
  max_iterations: 5
grammars:
  - id: fern
    name: Fern
    axiom: X
    rules:
      - { input: X, output: "F[+X][-X]FX" }
      - { input: F, output: FF, probability: 1 }
"##;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.grammars.len(), 1);
        assert_eq!(config.limits.max_iterations, 5);
        assert_eq!(config.limits.max_symbols, Limits::default().max_symbols);

        let params = config.generation.to_params(config.limits).unwrap();
        assert_eq!(params.iterations, 3);
        assert_eq!(params.seed, "willow");
        assert_eq!(params.turtle.angle_offset, 25.0);
        assert_eq!(params.turtle.length_decay, 0.9);
        assert_eq!(params.initial_state.direction, Vec3::Y);
        assert_eq!(params.initial_state.radius, 0.1);
        assert_eq!(params.turtle.palette.restore, Color::from_hex(0x0000ff));
        assert_eq!(params.turtle.palette.point, Color::RED);
    }

    #[test]
    fn test_negative_iterations_rejected() {
        let generation = GenerationConfig {
            iterations: -2,
            ..GenerationConfig::default()
        };
        assert_eq!(
            generation.to_params(Limits::default()),
            Err(ConfigError::NegativeIterations(-2))
        );
    }

    #[test]
    fn test_iterations_over_limit_rejected() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let generation = GenerationConfig {
            iterations: 6,
            ..config.generation
        };
        assert!(matches!(
            generation.to_params(config.limits),
            Err(ConfigError::TooManyIterations { requested: 6, limit: 5 })
        ));
    }

    #[test]
    fn test_invalid_grammar_fails_load() {
        let yaml = "grammars:\n  - { id: x, name: X, axiom: '', rules: [{ input: F, output: F }] }\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_empty_grammar_list_fails_load() {
        assert!(Config::from_yaml("grammars: []\n").is_err());
    }

    #[test]
    fn test_builtin_lookup() {
        let config = Config::builtin();
        assert_eq!(config.get_grammar("shrub").unwrap().grammar.axiom(), "Z");
        assert_eq!(config.select_grammar(None).unwrap().id, "bush");
        assert_eq!(
            config.get_grammar("oak").unwrap_err(),
            ConfigError::UnknownGrammar("oak".to_string())
        );
        assert!(config.generation.to_params(config.limits).is_ok());
    }

    #[test]
    fn test_seed_precedence() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let env = Env {
            log_dir: "logs".to_string(),
            seed: Some("from-env".to_string()),
        };

        let (_, params) = config.resolve_run(&RunOverrides::default(), &Env::default()).unwrap();
        assert_eq!(params.seed, "willow");

        let (_, params) = config.resolve_run(&RunOverrides::default(), &env).unwrap();
        assert_eq!(params.seed, "from-env");

        let cli = RunOverrides {
            seed: Some("from-cli".to_string()),
            ..RunOverrides::default()
        };
        let (_, params) = config.resolve_run(&cli, &env).unwrap();
        assert_eq!(params.seed, "from-cli");
    }

    #[test]
    fn test_run_overrides_grammar_and_iterations() {
        let config = Config::builtin();
        let overrides = RunOverrides {
            grammar: Some("shrub".to_string()),
            iterations: Some(2),
            seed: None,
        };
        let (entry, params) = config.resolve_run(&overrides, &Env::default()).unwrap();
        assert_eq!(entry.id, "shrub");
        assert_eq!(params.iterations, 2);
        assert_eq!(params.seed, DEFAULT_SEED);

        let (entry, params) = config.resolve_run(&RunOverrides::default(), &Env::default()).unwrap();
        assert_eq!(entry.id, "bush");
        assert_eq!(params.iterations, 4);

        let negative = RunOverrides {
            iterations: Some(-1),
            ..RunOverrides::default()
        };
        assert_eq!(
            config.resolve_run(&negative, &Env::default()).unwrap_err(),
            ConfigError::NegativeIterations(-1)
        );

        let unknown = RunOverrides {
            grammar: Some("oak".to_string()),
            ..RunOverrides::default()
        };
        assert_eq!(
            config.resolve_run(&unknown, &Env::default()).unwrap_err(),
            ConfigError::UnknownGrammar("oak".to_string())
        );
    }

    #[test]
    fn test_builtin_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::builtin()).unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.grammars.len(), 3);
        assert_eq!(config.grammars[2].grammar, grammar::meadow());
    }
}
