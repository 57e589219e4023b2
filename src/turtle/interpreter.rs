//! Symbol -> turtle action dispatch
//!
//! | Symbol | Action |
//! |--------|--------|
//! | `F` | advance `length` along `direction`, then decay length and radius |
//! | `+` | angle += offset, resample direction on the cone around +Y |
//! | `-` | angle -= offset, resample direction on the cone around +Y |
//! | `[` | save a copy of the current state |
//! | `]` | restore the last saved state |
//!
//! Anything else is ignored. Turns draw their azimuth from the run's
//! seeded generator, so a turn does not rotate the previous heading: it
//! places the new heading on the cone of half-angle `angle` around +Y.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::state::{StateStack, TurtleState};
use crate::error::ConfigError;
use crate::events::{DrawEvent, EventSink, Palette};
use crate::geometry::Vec3;
use crate::random::RandomSource;

/// Turtle command for one recognized symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    TurnPositive,
    TurnNegative,
    Push,
    Pop,
}

impl Command {
    pub fn from_symbol(symbol: char) -> Option<Command> {
        match symbol {
            'F' => Some(Command::Advance),
            '+' => Some(Command::TurnPositive),
            '-' => Some(Command::TurnNegative),
            '[' => Some(Command::Push),
            ']' => Some(Command::Pop),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Command::Advance => 'F',
            Command::TurnPositive => '+',
            Command::TurnNegative => '-',
            Command::Push => '[',
            Command::Pop => ']',
        }
    }
}

/// Interpretation parameters shared by every state of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleParams {
    /// Multiplier applied to `length` after each `F`
    pub length_decay: f64,
    /// Multiplier applied to `radius` after each `F`
    pub radius_decay: f64,
    /// Degrees added or removed by `+` / `-`
    pub angle_offset: f64,
    pub palette: Palette,
}

impl Default for TurtleParams {
    fn default() -> Self {
        Self {
            length_decay: 0.9,
            radius_decay: 0.9,
            angle_offset: 20.0,
            palette: Palette::default(),
        }
    }
}

impl TurtleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("length_decay", self.length_decay), ("radius_decay", self.radius_decay)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter { field, value });
            }
        }
        if !self.angle_offset.is_finite() {
            return Err(ConfigError::InvalidParameter {
                field: "angle_offset",
                value: self.angle_offset,
            });
        }
        Ok(())
    }
}

/// Walks a symbol string, mutating a [`StateStack`] and emitting draw events
pub struct Interpreter<'a, R: RandomSource + ?Sized> {
    stack: StateStack,
    params: &'a TurtleParams,
    rng: &'a mut R,
}

impl<'a, R: RandomSource + ?Sized> Interpreter<'a, R> {
    pub fn new(initial: TurtleState, params: &'a TurtleParams, rng: &'a mut R) -> Self {
        Self {
            stack: StateStack::new(initial),
            params,
            rng,
        }
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    /// Apply one symbol; unrecognized symbols do nothing
    pub fn step<S: EventSink + ?Sized>(&mut self, symbol: char, sink: &mut S) {
        if let Some(command) = Command::from_symbol(symbol) {
            self.apply(command, sink);
        }
    }

    /// Apply every symbol in order and hand back the final stack
    pub fn run<S: EventSink + ?Sized>(mut self, symbols: &str, sink: &mut S) -> StateStack {
        for symbol in symbols.chars() {
            self.step(symbol, sink);
        }
        self.stack
    }

    pub fn apply<S: EventSink + ?Sized>(&mut self, command: Command, sink: &mut S) {
        match command {
            Command::Advance => self.advance(sink),
            Command::TurnPositive => self.turn(self.params.angle_offset),
            Command::TurnNegative => self.turn(-self.params.angle_offset),
            Command::Push => self.stack.push(),
            Command::Pop => self.restore(sink),
        }
    }

    fn advance<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        let palette = self.params.palette;
        let cur = self.stack.current_mut();
        let direction = cur.direction.normalize();
        let destination = cur.position + direction * cur.length;

        sink.emit(DrawEvent::point(cur.position, palette.point));
        sink.emit(DrawEvent::point(destination, palette.point));
        sink.emit(DrawEvent::Arrow {
            origin: cur.position,
            direction,
            length: cur.length,
            color: palette.arrow,
        });

        cur.position = destination;
        cur.length *= self.params.length_decay;
        cur.radius *= self.params.radius_decay;
    }

    fn turn(&mut self, delta_degrees: f64) {
        let azimuth = self.rng.next_float(0.0, 2.0 * PI);
        let cur = self.stack.current_mut();
        cur.angle += delta_degrees;
        cur.direction = Vec3::from_spherical(cur.angle.to_radians(), azimuth).normalize();
    }

    fn restore<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        let color = if self.stack.pop() {
            self.params.palette.restore
        } else {
            tracing::warn!("Restore with nothing saved");
            self.params.palette.unmatched_restore
        };
        sink.emit(DrawEvent::marker(self.stack.current().position, color));
    }
}

/// Interpret `symbols` from `initial`, emitting events into `sink`
pub fn interpret<R, S>(
    symbols: &str,
    initial: TurtleState,
    params: &TurtleParams,
    rng: &mut R,
    sink: &mut S,
) -> StateStack
where
    R: RandomSource + ?Sized,
    S: EventSink + ?Sized,
{
    Interpreter::new(initial, params, rng).run(symbols, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Color;
    use crate::random::PseudoRandom;

    fn run(symbols: &str) -> (StateStack, Vec<DrawEvent>) {
        let params = TurtleParams::default();
        let mut rng = PseudoRandom::default();
        let mut events = Vec::new();
        let stack = interpret(symbols, TurtleState::default(), &params, &mut rng, &mut events);
        (stack, events)
    }

    #[test]
    fn test_command_table_round_trips() {
        for symbol in ['F', '+', '-', '[', ']'] {
            assert_eq!(Command::from_symbol(symbol).unwrap().symbol(), symbol);
        }
        assert_eq!(Command::from_symbol('X'), None);
    }

    #[test]
    fn test_advance_emits_points_and_arrow() {
        let (stack, events) = run("F");
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], DrawEvent::point(Vec3::ZERO, Color::RED));
        assert_eq!(events[1], DrawEvent::point(Vec3::new(0.0, 0.5, 0.0), Color::RED));
        assert_eq!(
            events[2],
            DrawEvent::Arrow {
                origin: Vec3::ZERO,
                direction: Vec3::Y,
                length: 0.5,
                color: Color::YELLOW,
            }
        );

        let cur = stack.current();
        assert_eq!(cur.position, Vec3::new(0.0, 0.5, 0.0));
        assert!((cur.length - 0.45).abs() < 1e-12);
        assert!((cur.radius - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_lengths_decay_geometrically() {
        let (stack, _) = run("FFF");
        let cur = stack.current();
        assert!((cur.position.y - (0.5 + 0.45 + 0.405)).abs() < 1e-12);
        assert!((cur.length - 0.5 * 0.9f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_turn_samples_cone() {
        let (stack, events) = run("++");
        assert!(events.is_empty());
        let cur = stack.current();
        assert_eq!(cur.angle, 40.0);
        assert!((cur.direction.length() - 1.0).abs() < 1e-12);
        // polar angle from +Y equals the accumulated angle
        assert!((cur.direction.dot(Vec3::Y) - 40f64.to_radians().cos()).abs() < 1e-12);

        let (stack, _) = run("+-");
        let cur = stack.current();
        assert_eq!(cur.angle, 0.0);
        assert!((cur.direction - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_turns_consume_one_draw_each() {
        struct Counter(usize);
        impl RandomSource for Counter {
            fn next(&mut self) -> f64 {
                self.0 += 1;
                0.5
            }
        }
        let params = TurtleParams::default();
        let mut rng = Counter(0);
        let mut events: Vec<DrawEvent> = Vec::new();
        interpret("F+F-[+]]X", TurtleState::default(), &params, &mut rng, &mut events);
        assert_eq!(rng.0, 3);
    }

    #[test]
    fn test_push_then_mutate_keeps_saved_copy() {
        let (stack, _) = run("[F");
        assert_eq!(stack.len(), 2);
        let saved = stack.iter().nth(1).unwrap();
        assert_eq!(saved.position, Vec3::ZERO);
        assert_eq!(saved.length, 0.5);
        assert_eq!(stack.current().position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_pop_returns_to_branch_point() {
        let (stack, events) = run("F[F]");
        assert_eq!(stack.len(), 1);
        let marker = events.last().unwrap();
        assert_eq!(*marker, DrawEvent::marker(Vec3::new(0.0, 0.5, 0.0), Color::GREEN));
        assert_eq!(stack.current().position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_unmatched_pop_emits_single_marker() {
        let (stack, events) = run("]");
        assert_eq!(stack.len(), 1);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_marker());
        assert!(matches!(events[0], DrawEvent::Point { position, .. } if position == Vec3::ZERO));
    }

    #[test]
    fn test_restore_markers_counted_apart_from_endpoints() {
        let (_, events) = run("F[F]");
        let summary = crate::events::EventSummary::from_events(&events);
        assert_eq!(summary.points, 4);
        assert_eq!(summary.arrows, 2);
        assert_eq!(summary.markers, 1);
        assert_eq!(events.iter().filter(|e| e.is_marker()).count(), 1);
    }

    #[test]
    fn test_unknown_symbols_ignored() {
        let (stack, events) = run("XYZ");
        assert!(events.is_empty());
        assert_eq!(*stack.current(), TurtleState::default());
    }

    #[test]
    fn test_params_validation() {
        let params = TurtleParams {
            length_decay: 0.0,
            ..TurtleParams::default()
        };
        assert!(params.validate().is_err());
        assert!(TurtleParams::default().validate().is_ok());
    }
}
