//! Foliage - stochastic L-system foliage generator
//!
//! Expands a grammar from a seed and walks the result with a 3D turtle,
//! producing an ordered list of draw events for a renderer.
//!
//! ```no_run
//! use foliage::{generate_events, grammar, GenerationParams};
//!
//! let events = generate_events(&grammar::bush(), &GenerationParams::default())?;
//! println!("{} events", events.len());
//! # Ok::<(), foliage::GenerateError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod generate;
pub mod geometry;
pub mod grammar;
pub mod logging;
pub mod random;
pub mod turtle;

pub use error::{ConfigError, GenerateError};
pub use events::{Color, DrawEvent, EventSink, EventSummary, FnSink, Palette};
pub use generate::{generate, generate_events, generate_with_symbols, Generation, GenerationParams, GenerationReport};
pub use geometry::Vec3;
pub use grammar::{Grammar, Limits, Rule};
pub use random::{PseudoRandom, RandomSource};
pub use turtle::{StateStack, TurtleParams, TurtleState};
