//! Final placement records handed from the core to evaluation and export.

use crate::ids::ComponentId;
use crate::netlist::Netlist;
use serde::{Deserialize, Serialize};

/// The placed location of one component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// The placed component.
    pub component: ComponentId,
    /// Lower-left x coordinate.
    pub x: i64,
    /// Lower-left y coordinate.
    pub y: i64,
    /// Whether the component is rotated by 90 degrees.
    pub rotated: bool,
}

impl Placement {
    /// Returns the placed footprint, accounting for rotation.
    pub fn footprint(&self, netlist: &Netlist) -> (u32, u32) {
        let component = netlist.component(self.component);
        if self.rotated {
            (component.height, component.width)
        } else {
            (component.width, component.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[test]
    fn footprint_swaps_on_rotation() {
        let mut nl = Netlist::new();
        let id = nl.add_component(Component::macro_block("m", 3, 7));

        let flat = Placement {
            component: id,
            x: 0,
            y: 0,
            rotated: false,
        };
        let turned = Placement { rotated: true, ..flat };

        assert_eq!(flat.footprint(&nl), (3, 7));
        assert_eq!(turned.footprint(&nl), (7, 3));
    }
}
