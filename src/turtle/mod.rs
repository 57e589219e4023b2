//! Turtle 3D Interpreter
//!
//! Converts an expanded symbol string into an ordered sequence of draw
//! events using a stack-based turtle.

pub mod interpreter;
pub mod state;

pub use interpreter::{interpret, Command, Interpreter, TurtleParams};
pub use state::{StateStack, TurtleState};
