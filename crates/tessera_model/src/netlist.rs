//! The flat netlist consumed by the placement core.
//!
//! Components are stored densely and addressed by [`ComponentId`];
//! connectivity is a list of weighted two-point [`Net`]s. Multi-pin
//! benchmark nets are decomposed into pairs by the reader, and repeated
//! pairs accumulate weight, so the scoring loop sees each connected pair
//! exactly once.

use crate::component::Component;
use crate::ids::{ComponentId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessera_common::Arena;

/// A weighted connection between two components.
///
/// The endpoint pair is stored in normalized order (`a < b`), which makes
/// pair identity independent of insertion order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Net {
    /// The net's arena ID.
    pub id: NetId,
    /// The lower-ordinal endpoint.
    pub a: ComponentId,
    /// The higher-ordinal endpoint.
    pub b: ComponentId,
    /// Connectivity weight.
    pub weight: u32,
}

/// The circuit model: components plus weighted pairwise connectivity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Netlist {
    /// All components in the design.
    pub components: Arena<ComponentId, Component>,
    /// All weighted two-point nets.
    pub nets: Arena<NetId, Net>,
    /// Auxiliary index: component name to ID (rebuilt on deserialization).
    #[serde(skip)]
    component_by_name: HashMap<String, ComponentId>,
    /// Auxiliary index: normalized endpoint pair to net (rebuilt on deserialization).
    #[serde(skip)]
    net_by_pair: HashMap<(ComponentId, ComponentId), NetId>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns its ID.
    pub fn add_component(&mut self, component: Component) -> ComponentId {
        let id = self.components.alloc(component);
        self.components[id].id = id;
        self.component_by_name
            .insert(self.components[id].name.clone(), id);
        id
    }

    /// Adds weight between two components, creating the net if needed.
    ///
    /// Self-connections are ignored: a component contributes no wirelength
    /// against itself.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId, weight: u32) -> Option<NetId> {
        if a == b {
            return None;
        }
        let pair = if a < b { (a, b) } else { (b, a) };
        if let Some(&id) = self.net_by_pair.get(&pair) {
            self.nets[id].weight += weight;
            return Some(id);
        }
        let id = self.nets.alloc(Net {
            id: NetId::from_raw(0),
            a: pair.0,
            b: pair.1,
            weight,
        });
        self.nets[id].id = id;
        self.net_by_pair.insert(pair, id);
        Some(id)
    }

    /// Returns the component with the given ID.
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id]
    }

    /// Returns a mutable reference to the component with the given ID.
    pub fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id]
    }

    /// Looks up a component by its benchmark name.
    pub fn component_by_name(&self, name: &str) -> Option<ComponentId> {
        self.component_by_name.get(name).copied()
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id]
    }

    /// Returns the number of components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Iterates over the IDs of all movable components, in ID order.
    pub fn movable_components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .values()
            .filter(|c| c.is_movable())
            .map(|c| c.id)
    }

    /// Returns the total area of all movable components.
    pub fn movable_area(&self) -> u64 {
        self.components
            .values()
            .filter(|c| c.is_movable())
            .map(|c| c.area())
            .sum()
    }

    /// Sums net weights between `id` and every member of `others`.
    pub fn connectivity_to(&self, id: ComponentId, others: &[ComponentId]) -> u64 {
        self.nets
            .values()
            .filter(|n| {
                (n.a == id && others.contains(&n.b)) || (n.b == id && others.contains(&n.a))
            })
            .map(|n| u64::from(n.weight))
            .sum()
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.component_by_name.clear();
        for (id, component) in self.components.iter() {
            self.component_by_name.insert(component.name.clone(), id);
        }
        self.net_by_pair.clear();
        for (id, net) in self.nets.iter() {
            self.net_by_pair.insert((net.a, net.b), id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn two_macro_netlist() -> (Netlist, ComponentId, ComponentId) {
        let mut nl = Netlist::new();
        let a = nl.add_component(Component::macro_block("a", 2, 2));
        let b = nl.add_component(Component::macro_block("b", 3, 3));
        (nl, a, b)
    }

    #[test]
    fn add_and_lookup_by_name() {
        let (nl, a, _) = two_macro_netlist();
        assert_eq!(nl.component_by_name("a"), Some(a));
        assert_eq!(nl.component_by_name("zzz"), None);
        assert_eq!(nl.component(a).width, 2);
    }

    #[test]
    fn connect_normalizes_pair_order() {
        let (mut nl, a, b) = two_macro_netlist();
        let id = nl.connect(b, a, 3).unwrap();
        let net = nl.net(id);
        assert_eq!(net.a, a);
        assert_eq!(net.b, b);
        assert_eq!(net.weight, 3);
    }

    #[test]
    fn connect_accumulates_weight() {
        let (mut nl, a, b) = two_macro_netlist();
        let first = nl.connect(a, b, 1).unwrap();
        let second = nl.connect(b, a, 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(nl.net_count(), 1);
        assert_eq!(nl.net(first).weight, 3);
    }

    #[test]
    fn self_connection_ignored() {
        let (mut nl, a, _) = two_macro_netlist();
        assert!(nl.connect(a, a, 5).is_none());
        assert_eq!(nl.net_count(), 0);
    }

    #[test]
    fn movable_skips_terminals_and_fixed() {
        let mut nl = Netlist::new();
        nl.add_component(Component::macro_block("m", 1, 1));
        nl.add_component(Component::terminal("t", 0, 0));
        let mut fixed = Component::macro_block("f", 1, 1);
        fixed.fixed = true;
        nl.add_component(fixed);

        let movable: Vec<_> = nl.movable_components().collect();
        assert_eq!(movable.len(), 1);
        assert_eq!(nl.component(movable[0]).name, "m");
        assert_eq!(nl.movable_area(), 1);
    }

    #[test]
    fn connectivity_to_sums_matching_weights() {
        let mut nl = Netlist::new();
        let a = nl.add_component(Component::macro_block("a", 1, 1));
        let b = nl.add_component(Component::macro_block("b", 1, 1));
        let c = nl.add_component(Component::macro_block("c", 1, 1));
        nl.connect(a, b, 2);
        nl.connect(a, c, 3);
        nl.connect(b, c, 7);

        assert_eq!(nl.connectivity_to(a, &[b, c]), 5);
        assert_eq!(nl.connectivity_to(a, &[c]), 3);
        assert_eq!(nl.connectivity_to(a, &[]), 0);
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let (mut nl, a, b) = two_macro_netlist();
        nl.connect(a, b, 1);

        let json = serde_json::to_string(&nl).unwrap();
        let mut restored: Netlist = serde_json::from_str(&json).unwrap();
        restored.rebuild_indices();

        assert_eq!(restored.component_count(), 2);
        assert_eq!(restored.component_by_name("b"), Some(b));
        // Re-connecting the same pair accumulates instead of duplicating.
        restored.connect(a, b, 1);
        assert_eq!(restored.net_count(), 1);
        assert_eq!(restored.net(NetId::from_raw(0)).weight, 2);
    }

    #[test]
    fn kinds_preserved() {
        let mut nl = Netlist::new();
        let t = nl.add_component(Component::terminal("p1", 0, 9));
        assert_eq!(nl.component(t).kind, ComponentKind::Terminal);
    }
}
