//! Turtle cursor and its save/restore stack

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Vec3;

/// Spatial cursor. A plain value: copying it never aliases position or direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleState {
    pub position: Vec3,
    /// Heading, kept normalized
    pub direction: Vec3,
    /// Length of the next `F` segment
    pub length: f64,
    pub radius: f64,
    /// Polar angle from +Y, in degrees
    pub angle: f64,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Y,
            length: 0.5,
            radius: 0.1,
            angle: 0.0,
        }
    }
}

impl TurtleState {
    /// Check every component is finite and normalize the direction
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !self.position.is_finite() {
            return Err(ConfigError::InvalidParameter {
                field: "initial_state.position",
                value: self.position.length(),
            });
        }
        if !self.direction.is_finite() {
            return Err(ConfigError::InvalidParameter {
                field: "initial_state.direction",
                value: self.direction.length(),
            });
        }
        if self.direction.length() == 0.0 {
            return Err(ConfigError::ZeroDirection);
        }
        for (field, value) in [
            ("initial_state.length", self.length),
            ("initial_state.radius", self.radius),
            ("initial_state.angle", self.angle),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { field, value });
            }
        }

        self.direction = self.direction.normalize();
        Ok(self)
    }
}

/// Non-empty LIFO of turtle states.
///
/// The top is stored apart from the saved entries, so the stack can never
/// be emptied.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStack {
    current: TurtleState,
    saved: Vec<TurtleState>,
}

impl StateStack {
    pub fn new(initial: TurtleState) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
        }
    }

    /// The state every action mutates
    pub fn current(&self) -> &TurtleState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut TurtleState {
        &mut self.current
    }

    /// Number of entries including the current one; always >= 1
    pub fn len(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of saved snapshots below the current state
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Save a copy of the current state; the copy on top keeps being mutated
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Discard the current state and resume the last saved one.
    ///
    /// Returns `false` and leaves the stack untouched when nothing is saved.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Entries from the top down
    pub fn iter(&self) -> impl Iterator<Item = &TurtleState> {
        std::iter::once(&self.current).chain(self.saved.iter().rev())
    }
}
