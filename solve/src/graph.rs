//! The bounded-type constraint graph (spec.md §4.3).
//!
//! Equivalence classes are `ena`'s union-find (the same crate chalk
//! itself wraps as `EnaVariable`), so merging two unification
//! variables is a path-compressed `O(α(n))` operation. The materialized
//! transitive `lower`/`upper` edges (Directness, spec.md §3) live in a
//! side table keyed by `ena`'s root keys, since `ena` itself only knows
//! about the union-find structure, not about subtype edges between
//! distinct classes.

use ena::unify::{InPlace, InPlaceUnificationTable, NoError, Snapshot, UnifyKey, UnifyValue};
use efx_ir::{UVar, ValueType};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::instrument;

/// The opaque handle `ena` hands back for a unification-variable
/// equivalence class. Never exposed outside this module: callers
/// identify variables by `UVar`, not by `UVarKey`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub(crate) struct UVarKey(u32);

impl UnifyKey for UVarKey {
    type Value = NodePayload;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        UVarKey(u)
    }

    fn tag() -> &'static str {
        "UVarKey"
    }
}

/// A node's payload: its current lower and upper bound. Per spec.md
/// §3's Payload non-variance invariant, neither field is ever a
/// `ValueType::UVar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodePayload {
    pub lower: ValueType,
    pub upper: ValueType,
}

impl Default for NodePayload {
    fn default() -> Self {
        NodePayload {
            lower: ValueType::TBottom,
            upper: ValueType::TTop,
        }
    }
}

/// `ena` requires an infallible-or-fallible merge function for values
/// sharing a key, used whenever two keys are unioned. The real,
/// polarity-aware merge (spec.md §4.4's `merge`) needs the comparer
/// and the rest of the scope, which `ena`'s `UnifyValue` has no way to
/// reach; so this impl is a thin carrier that just keeps the newer
/// value. `ConstraintGraph::connect` always installs the real merged
/// payload itself, immediately after calling `ena`'s `union`.
impl UnifyValue for NodePayload {
    type Error = NoError;

    fn unify_values(_old: &Self, new: &Self) -> Result<Self, NoError> {
        Ok(new.clone())
    }
}

#[derive(Clone, Debug, Default)]
struct NeighbourSet {
    lower: FxHashSet<UVarKey>,
    upper: FxHashSet<UVarKey>,
}

/// A mutable directed graph of unification-variable equivalence
/// classes, each carrying `(lower, upper)` value-type bounds
/// (spec.md §4.3).
#[derive(Default)]
pub struct ConstraintGraph {
    table: InPlaceUnificationTable<UVarKey>,
    var_to_key: FxHashMap<UVar, UVarKey>,
    key_to_vars: FxHashMap<UVarKey, Vec<UVar>>,
    neighbours: FxHashMap<UVarKey, NeighbourSet>,
}

/// Opaque, LIFO-ordered backup of a `ConstraintGraph`, for
/// `UnificationScope::snapshot`/`restore` (spec.md §4.3, §5).
pub struct GraphSnapshot {
    table: Snapshot<InPlace<UVarKey>>,
    var_to_key: FxHashMap<UVar, UVarKey>,
    key_to_vars: FxHashMap<UVarKey, Vec<UVar>>,
    neighbours: FxHashMap<UVarKey, NeighbourSet>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        ConstraintGraph::default()
    }

    /// Ensures `x` has a node, lazily materializing it with the
    /// default `(TBottom, TTop)` payload on first access (spec.md
    /// §4.3 `bounds_for`).
    fn ensure_key(&mut self, x: UVar) -> UVarKey {
        if let Some(key) = self.var_to_key.get(&x) {
            return *key;
        }
        let key = self.table.new_key(NodePayload::default());
        self.var_to_key.insert(x, key);
        self.key_to_vars.entry(key).or_default().push(x);
        self.neighbours.entry(key).or_default();
        key
    }

    /// The canonical representative key of `x`'s equivalence class.
    fn rep(&mut self, x: UVar) -> UVarKey {
        let key = self.ensure_key(x);
        self.table.find(key)
    }

    pub fn bounds_for(&mut self, x: UVar) -> (ValueType, ValueType) {
        let root = self.rep(x);
        let payload = self.table.probe_value(root);
        (payload.lower, payload.upper)
    }

    pub fn lower_bound(&mut self, x: UVar) -> ValueType {
        self.bounds_for(x).0
    }

    pub fn upper_bound(&mut self, x: UVar) -> ValueType {
        self.bounds_for(x).1
    }

    fn vars_in_key(&self, key: UVarKey) -> &[UVar] {
        self.key_to_vars.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every unification variable in every neighbour equivalence
    /// class reachable as a `lower` neighbour of `x`'s class,
    /// excluding `x`'s own class (spec.md §4.3).
    pub fn lower_variables(&mut self, x: UVar) -> Vec<UVar> {
        let root = self.rep(x);
        let lower = self
            .neighbours
            .get(&root)
            .map(|ns| ns.lower.clone())
            .unwrap_or_default();
        lower
            .into_iter()
            .flat_map(|k| self.vars_in_key(k).to_vec())
            .collect()
    }

    pub fn upper_variables(&mut self, x: UVar) -> Vec<UVar> {
        let root = self.rep(x);
        let upper = self
            .neighbours
            .get(&root)
            .map(|ns| ns.upper.clone())
            .unwrap_or_default();
        upper
            .into_iter()
            .flat_map(|k| self.vars_in_key(k).to_vec())
            .collect()
    }

    /// Replaces the lower-bound component of `x`'s payload.
    /// Precondition: `t` is not a unification variable (spec.md
    /// §4.3's Payload non-variance invariant).
    #[instrument(level = "debug", skip(self))]
    pub fn update_lower_bound(&mut self, x: UVar, t: ValueType) {
        debug_assert!(!t.is_uvar(), "payload must not be a unification variable");
        let root = self.rep(x);
        let mut payload = self.table.probe_value(root);
        payload.lower = t;
        self.table.union_value(root, payload);
    }

    #[instrument(level = "debug", skip(self))]
    pub fn update_upper_bound(&mut self, x: UVar, t: ValueType) {
        debug_assert!(!t.is_uvar(), "payload must not be a unification variable");
        let root = self.rep(x);
        let mut payload = self.table.probe_value(root);
        payload.upper = t;
        self.table.union_value(root, payload);
    }

    /// Answered purely from the immediate neighbour sets; correct by
    /// Directness (spec.md §4.3, §8 property 1).
    pub fn is_subtype(&mut self, x: UVar, y: UVar) -> bool {
        let (rx, ry) = (self.rep(x), self.rep(y));
        rx == ry || self.neighbours.get(&rx).map_or(false, |ns| ns.upper.contains(&ry))
    }

    pub fn is_supertype(&mut self, x: UVar, y: UVar) -> bool {
        self.is_subtype(y, x)
    }

    /// Asserts `x <: y` at the graph level (spec.md §4.3 `connect`).
    ///
    /// The merge performed here when a cycle closes is a conservative
    /// fallback (absorb `TBottom`/`TTop`, else keep the first side);
    /// real callers route through `UnificationScope::connect_nodes`,
    /// which runs the polarity-aware `merge` (spec.md §4.4) against
    /// both bounds *before* calling this, so by the time a cycle is
    /// actually detected here the two sides already agree.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(&mut self, x: UVar, y: UVar) {
        let (rx, ry) = (self.rep(x), self.rep(y));
        if rx == ry {
            return;
        }
        if self.neighbours.get(&rx).map_or(false, |ns| ns.upper.contains(&ry)) {
            return; // already known
        }

        if self.neighbours.get(&ry).map_or(false, |ns| ns.upper.contains(&rx)) {
            // y <: x already holds, so x <: y closes a cycle: collapse.
            self.merge_classes(rx, ry);
            return;
        }

        self.add_edge(rx, ry);
    }

    fn add_edge(&mut self, rx: UVarKey, ry: UVarKey) {
        let ry_upper: FxHashSet<UVarKey> = self
            .neighbours
            .get(&ry)
            .map(|ns| ns.upper.clone())
            .unwrap_or_default();
        let rx_lower: FxHashSet<UVarKey> = self
            .neighbours
            .get(&rx)
            .map(|ns| ns.lower.clone())
            .unwrap_or_default();

        let rx_ns = self.neighbours.entry(rx).or_default();
        rx_ns.upper.insert(ry);
        rx_ns.upper.extend(ry_upper);
        rx_ns.upper.remove(&rx); // self-exclusion

        let ry_ns = self.neighbours.entry(ry).or_default();
        ry_ns.lower.insert(rx);
        ry_ns.lower.extend(rx_lower);
        ry_ns.lower.remove(&ry); // self-exclusion
    }

    fn naive_join(a: &ValueType, b: &ValueType) -> ValueType {
        match (a, b) {
            _ if a == b => a.clone(),
            (ValueType::TBottom, other) | (other, ValueType::TBottom) => other.clone(),
            _ => a.clone(),
        }
    }

    fn naive_meet(a: &ValueType, b: &ValueType) -> ValueType {
        match (a, b) {
            _ if a == b => a.clone(),
            (ValueType::TTop, other) | (other, ValueType::TTop) => other.clone(),
            _ => a.clone(),
        }
    }

    /// Collapses two equivalence classes into one, per spec.md §4.3's
    /// Acyclicity-mod-collapse invariant: rewrites every occurrence of
    /// the absorbed key across the neighbour tables and the
    /// variable→node map, and drops any self-reference that results.
    fn merge_classes(&mut self, a: UVarKey, b: UVarKey) -> UVarKey {
        let pa = self.table.probe_value(a);
        let pb = self.table.probe_value(b);
        let merged = NodePayload {
            lower: Self::naive_join(&pa.lower, &pb.lower),
            upper: Self::naive_meet(&pa.upper, &pb.upper),
        };

        self.table.union(a, b);
        let root = self.table.find(a);
        debug_assert_eq!(root, self.table.find(b));
        self.table.union_value(root, merged);

        let other = if root == a { b } else { a };

        if let Some(other_vars) = self.key_to_vars.remove(&other) {
            self.key_to_vars.entry(root).or_default().extend(other_vars);
        }

        if let Some(other_ns) = self.neighbours.remove(&other) {
            let root_ns = self.neighbours.entry(root).or_default();
            root_ns.upper.extend(other_ns.upper);
            root_ns.lower.extend(other_ns.lower);
        }

        for ns in self.neighbours.values_mut() {
            if ns.upper.remove(&other) {
                ns.upper.insert(root);
            }
            if ns.lower.remove(&other) {
                ns.lower.insert(root);
            }
        }

        if let Some(ns) = self.neighbours.get_mut(&root) {
            ns.upper.remove(&root);
            ns.lower.remove(&root);
        }

        root
    }

    pub fn snapshot(&mut self) -> GraphSnapshot {
        GraphSnapshot {
            table: self.table.snapshot(),
            var_to_key: self.var_to_key.clone(),
            key_to_vars: self.key_to_vars.clone(),
            neighbours: self.neighbours.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.table.rollback_to(snapshot.table);
        self.var_to_key = snapshot.var_to_key;
        self.key_to_vars = snapshot.key_to_vars;
        self.neighbours = snapshot.neighbours;
    }
}
