//! Component data read by the placement core.
//!
//! A [`Component`] is a flat record of the geometric and legal attributes the
//! placer needs — width, height, fixed flag, kind tag, optional seed
//! position, optional supplement bag. Concrete subtype behavior (pin
//! geometry, soft-block resizing) stays outside the core; the kind is a
//! tagged variant, not a class hierarchy.

use crate::ids::ComponentId;
use crate::supplement::Supplement;
use serde::{Deserialize, Serialize};

/// The kind tag of a component.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ComponentKind {
    /// A hard macro block.
    Macro,
    /// A standard cell.
    Cell,
    /// An I/O terminal on the canvas boundary. Always fixed.
    Terminal,
}

/// A single placeable (or fixed) physical object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Component {
    /// The component's arena ID (assigned by the netlist on insert).
    pub id: ComponentId,
    /// The component's benchmark name.
    pub name: String,
    /// Width in placement units.
    pub width: u32,
    /// Height in placement units.
    pub height: u32,
    /// Whether the component may not be moved by the placer.
    pub fixed: bool,
    /// The kind tag.
    pub kind: ComponentKind,
    /// Seed position from the benchmark `.pl` file, if any.
    pub position: Option<(i64, i64)>,
    /// Optional supplement attribute bag (power, frequency).
    pub supplement: Option<Supplement>,
}

impl Component {
    /// Creates a movable macro with the given name and size.
    pub fn macro_block(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: ComponentId::from_raw(0),
            name: name.into(),
            width,
            height,
            fixed: false,
            kind: ComponentKind::Macro,
            position: None,
            supplement: None,
        }
    }

    /// Creates a movable standard cell with the given name and size.
    pub fn cell(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: ComponentId::from_raw(0),
            name: name.into(),
            width,
            height,
            fixed: false,
            kind: ComponentKind::Cell,
            position: None,
            supplement: None,
        }
    }

    /// Creates a fixed zero-area terminal at the given position.
    pub fn terminal(name: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            id: ComponentId::from_raw(0),
            name: name.into(),
            width: 0,
            height: 0,
            fixed: true,
            kind: ComponentKind::Terminal,
            position: Some((x, y)),
            supplement: None,
        }
    }

    /// Returns the component's area in placement units.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns `true` if the placer may move this component.
    pub fn is_movable(&self) -> bool {
        !self.fixed && self.kind != ComponentKind::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_block_is_movable() {
        let c = Component::macro_block("m0", 10, 20);
        assert_eq!(c.kind, ComponentKind::Macro);
        assert!(c.is_movable());
        assert_eq!(c.area(), 200);
    }

    #[test]
    fn terminal_is_fixed_zero_area() {
        let t = Component::terminal("p0", 5, 0);
        assert_eq!(t.kind, ComponentKind::Terminal);
        assert!(!t.is_movable());
        assert_eq!(t.area(), 0);
        assert_eq!(t.position, Some((5, 0)));
    }

    #[test]
    fn fixed_macro_is_not_movable() {
        let mut c = Component::macro_block("m0", 10, 10);
        c.fixed = true;
        assert!(!c.is_movable());
    }

    #[test]
    fn area_does_not_overflow_u32_product() {
        let c = Component::macro_block("big", u32::MAX, u32::MAX);
        assert_eq!(c.area(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn serde_roundtrip() {
        let c = Component::cell("c1", 1, 2);
        let json = serde_json::to_string(&c).unwrap();
        let back: Component = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "c1");
        assert_eq!(back.kind, ComponentKind::Cell);
    }
}
