//! Draw events emitted by the turtle for an external renderer
//!
//! The engine never touches a rendering library. It hands each event to an
//! [`EventSink`] in order; renderers consume the finished sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::geometry::Vec3;

/// 24-bit RGB color, written `#rrggbb` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::from_hex(0xff0000);
    pub const GREEN: Color = Color::from_hex(0x00ff00);
    pub const YELLOW: Color = Color::from_hex(0xffff00);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub fn to_hex(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let digits = s.strip_prefix('#').unwrap_or(&s);
        if digits.len() != 6 {
            return Err(ConfigError::InvalidColor(s));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| ConfigError::InvalidColor(s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Marker colors used by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Segment endpoints emitted by `F`
    pub point: Color,
    /// Segment arrows emitted by `F`
    pub arrow: Color,
    /// Position marker after a successful `]`
    pub restore: Color,
    /// Position marker for a `]` with nothing saved
    pub unmatched_restore: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            point: Color::RED,
            arrow: Color::YELLOW,
            restore: Color::GREEN,
            unmatched_restore: Color::GREEN,
        }
    }
}

/// One drawing instruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawEvent {
    Point {
        position: Vec3,
        color: Color,
        /// Set on the position marker emitted by `]`
        #[serde(default, skip_serializing_if = "is_false")]
        marker: bool,
    },
    Arrow {
        origin: Vec3,
        direction: Vec3,
        length: f64,
        color: Color,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DrawEvent {
    /// Segment endpoint
    pub fn point(position: Vec3, color: Color) -> Self {
        DrawEvent::Point {
            position,
            color,
            marker: false,
        }
    }

    /// Restore marker
    pub fn marker(position: Vec3, color: Color) -> Self {
        DrawEvent::Point {
            position,
            color,
            marker: true,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, DrawEvent::Point { marker: true, .. })
    }

    /// Every position this event touches
    pub fn extent(&self) -> [Vec3; 2] {
        match *self {
            DrawEvent::Point { position, .. } => [position, position],
            DrawEvent::Arrow {
                origin,
                direction,
                length,
                ..
            } => [origin, origin + direction * length],
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            DrawEvent::Point { color, .. } | DrawEvent::Arrow { color, .. } => color,
        }
    }
}

/// Receiver of draw events, in emission order
pub trait EventSink {
    fn emit(&mut self, event: DrawEvent);
}

impl EventSink for Vec<DrawEvent> {
    fn emit(&mut self, event: DrawEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: DrawEvent) {
        (**self).emit(event);
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(DrawEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: DrawEvent) {
        (self.0)(event);
    }
}

/// Forwards to two sinks
pub struct Tee<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn emit(&mut self, event: DrawEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// Counts events and tracks their bounding box
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventSummary {
    /// Segment endpoints, markers excluded
    pub points: usize,
    pub arrows: usize,
    pub markers: usize,
    pub bounds: Option<[Vec3; 2]>,
}

impl EventSummary {
    pub fn from_events(events: &[DrawEvent]) -> Self {
        let mut summary = Self::default();
        for &event in events {
            summary.emit(event);
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.points + self.arrows + self.markers
    }

    pub fn center(&self) -> Option<Vec3> {
        self.bounds.map(|[min, max]| (min + max) * 0.5)
    }

    /// Length of the bounding box diagonal
    pub fn diagonal(&self) -> f64 {
        self.bounds.map(|[min, max]| (max - min).length()).unwrap_or(0.0)
    }
}

impl EventSink for EventSummary {
    fn emit(&mut self, event: DrawEvent) {
        match event {
            DrawEvent::Point { marker: true, .. } => self.markers += 1,
            DrawEvent::Point { .. } => self.points += 1,
            DrawEvent::Arrow { .. } => self.arrows += 1,
        }
        let [a, b] = event.extent();
        let (lo, hi) = (a.min(b), a.max(b));
        self.bounds = Some(match self.bounds {
            Some([min, max]) => [min.min(lo), max.max(hi)],
            None => [lo, hi],
        });
    }
}
