use smartstring::{LazyCompact, SmartString};

use crate::transform::Transform;

/// Packed RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x0000_00ff);
    pub const WHITE: Color = Color(0xffff_ffff);

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(u32::from_be_bytes([r, g, b, a]))
    }
}

/// View properties carried by a shadow node.
///
/// Props are sealed together with the node; the differ only ever compares
/// them, it never interprets individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    pub opacity: f64,
    pub background_color: Option<Color>,
    pub transform: Transform,
    pub z_index: Option<i32>,
    pub test_id: SmartString<LazyCompact>,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            background_color: None,
            transform: Transform::IDENTITY,
            z_index: None,
            test_id: SmartString::new(),
        }
    }
}

impl ViewProps {
    pub fn with_background_color(color: Color) -> Self {
        Self {
            background_color: Some(color),
            ..Default::default()
        }
    }
}

/// Opaque handle through which a host view reports events back to the
/// element that spawned it. Two emitters are "the same" only if they are
/// literally the same allocation; the mounting layer compares them by
/// `Arc` identity.
#[derive(Debug, Default)]
pub struct EventEmitter {
    _private: (),
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Committed state snapshot associated with a node. The revision counter is
/// bumped by the state pipeline on every commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateData {
    pub revision: u64,
}

impl StateData {
    pub fn at_revision(revision: u64) -> Self {
        Self { revision }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgba_packing() {
        assert_eq!(Color::rgba(0, 0, 0, 255), Color::BLACK);
        assert_eq!(Color::rgba(255, 255, 255, 255), Color::WHITE);
    }

    #[test]
    fn test_default_props_equal() {
        assert_eq!(ViewProps::default(), ViewProps::default());
        assert_ne!(
            ViewProps::default(),
            ViewProps::with_background_color(Color::BLACK)
        );
    }

    #[test]
    fn test_props_transform_participates_in_equality() {
        let mut moved = ViewProps::default();
        moved.transform = Transform::translate(10.0, 0.0, 0.0);
        assert_ne!(ViewProps::default(), moved);
    }
}
