//! Generation entry point: grammar + parameters -> draw events
//!
//! One run owns one `PseudoRandom`. Expansion draws from it first, then
//! interpretation continues the same stream, so a seed fixes the whole
//! structure. A run borrows its generator mutably from start to finish,
//! which rules out two runs interleaving on shared state.

use serde::Serialize;

use crate::error::{ConfigError, GenerateResult};
use crate::events::{DrawEvent, EventSink, EventSummary, Tee};
use crate::grammar::{Grammar, Limits, ProductionEngine};
use crate::random::{PseudoRandom, DEFAULT_SEED};
use crate::turtle::{interpret, TurtleParams, TurtleState};

/// Everything a run needs besides the grammar
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub iterations: u32,
    pub seed: String,
    pub initial_state: TurtleState,
    pub turtle: TurtleParams,
    pub limits: Limits,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            iterations: 4,
            seed: DEFAULT_SEED.to_string(),
            initial_state: TurtleState::default(),
            turtle: TurtleParams::default(),
            limits: Limits::default(),
        }
    }
}

impl GenerationParams {
    /// Convert a signed iteration count, rejecting negatives
    pub fn iterations_from(value: i64) -> Result<u32, ConfigError> {
        if value < 0 {
            return Err(ConfigError::NegativeIterations(value));
        }
        u32::try_from(value).map_err(|_| ConfigError::IterationsOutOfRange(value))
    }

    /// Validate everything up front.
    ///
    /// Returns the run's generator and the normalized initial state.
    pub fn validate(&self) -> Result<(PseudoRandom, TurtleState), ConfigError> {
        self.limits.check_iterations(self.iterations)?;
        self.turtle.validate()?;
        let initial = self.initial_state.validated()?;
        Ok((PseudoRandom::new(&self.seed)?, initial))
    }
}

/// Statistics about a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub symbols: usize,
    pub events: EventSummary,
    /// Stack entries left when the string ended; 1 when brackets balance
    pub final_stack_len: usize,
}

/// Output of [`generate_with_symbols`]
#[derive(Debug, Clone)]
pub struct Generation {
    pub symbols: String,
    pub events: Vec<DrawEvent>,
    pub report: GenerationReport,
}

/// Run one generation, streaming events into `sink`
pub fn generate<S: EventSink + ?Sized>(
    grammar: &Grammar,
    params: &GenerationParams,
    sink: &mut S,
) -> GenerateResult<GenerationReport> {
    run(grammar, params, sink).map(|(_, report)| report)
}

/// Run one generation and collect the events
pub fn generate_events(grammar: &Grammar, params: &GenerationParams) -> GenerateResult<Vec<DrawEvent>> {
    let mut events = Vec::new();
    generate(grammar, params, &mut events)?;
    Ok(events)
}

/// Run one generation, keeping the expanded string as well
pub fn generate_with_symbols(grammar: &Grammar, params: &GenerationParams) -> GenerateResult<Generation> {
    let mut events = Vec::new();
    let (symbols, report) = run(grammar, params, &mut events)?;
    Ok(Generation {
        symbols,
        events,
        report,
    })
}

fn run<S: EventSink + ?Sized>(
    grammar: &Grammar,
    params: &GenerationParams,
    sink: &mut S,
) -> GenerateResult<(String, GenerationReport)> {
    let (mut rng, initial) = params.validate()?;

    tracing::info!(
        "Generating: axiom={:?} iterations={} seed={:?}",
        grammar.axiom(),
        params.iterations,
        params.seed
    );

    let engine = ProductionEngine::new(grammar, params.limits);
    let symbols = engine.expand(grammar.axiom(), params.iterations, &mut rng)?;
    let symbol_count = symbols.chars().count();
    tracing::debug!("Expanded to {} symbols", symbol_count);

    let mut summary = EventSummary::default();
    let stack = {
        let mut tee = Tee(&mut summary, sink);
        interpret(&symbols, initial, &params.turtle, &mut rng, &mut tee)
    };

    if stack.len() > 1 {
        tracing::warn!("{} saved states were never restored", stack.depth());
    }
    tracing::info!(
        "Generated {} events ({} points, {} arrows, {} markers)",
        summary.total(),
        summary.points,
        summary.arrows,
        summary.markers
    );

    let report = GenerationReport {
        symbols: symbol_count,
        events: summary,
        final_stack_len: stack.len(),
    };
    Ok((symbols, report))
}
