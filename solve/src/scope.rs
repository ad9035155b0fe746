//! `UnificationScope`: the mutable context owning one `ConstraintGraph`
//! plus the skolem stacks (spec.md §4.5).

use crate::compare::{Comparer, Polarity, QueryComparer, TypeComparer};
use crate::error::SolveError;
use crate::graph::{ConstraintGraph, GraphSnapshot};
use efx_ir::{
    BlockType, CaptureAtom, CaptureSet, CaptureUVar, CaptureUVarRole, EffectAtom, Effects,
    FunctionType, ScopeId, Substitution, UVar, UVarRole, ValueType,
};
use rustc_hash::FxHashMap;
use tracing::instrument;

/// Opaque, LIFO backup of a scope for speculative overload resolution
/// (spec.md §4.5 `snapshot`/`restore`).
pub struct ScopeSnapshot {
    graph: GraphSnapshot,
    skolem_len: usize,
    capture_skolem_len: usize,
}

pub struct UnificationScope {
    id: ScopeId,
    graph: ConstraintGraph,
    skolems: Vec<UVar>,
    capture_skolems: Vec<CaptureUVar>,
    /// Diagnostic-only: never consulted by the solving algorithm
    /// itself (spec.md §3). Kept out of `UVar`/`CaptureUVar` proper so
    /// their `Eq`/`Hash`/`Ord` stay purely identity-based.
    roles: FxHashMap<UVar, UVarRole>,
    capture_roles: FxHashMap<CaptureUVar, CaptureUVarRole>,
    next_index: u32,
    next_capture_index: u32,
}

impl Default for UnificationScope {
    fn default() -> Self {
        Self::new()
    }
}

impl UnificationScope {
    pub fn new() -> Self {
        UnificationScope {
            id: ScopeId::fresh(),
            graph: ConstraintGraph::new(),
            skolems: Vec::new(),
            capture_skolems: Vec::new(),
            roles: FxHashMap::default(),
            capture_roles: FxHashMap::default(),
            next_index: 0,
            next_capture_index: 0,
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn fresh(&mut self, role: UVarRole) -> UVar {
        let v = UVar::new(self.id, self.next_index);
        self.next_index += 1;
        self.skolems.push(v);
        self.roles.insert(v, role);
        v
    }

    pub fn fresh_capture(&mut self, role: CaptureUVarRole) -> CaptureUVar {
        let v = CaptureUVar::new(self.id, self.next_capture_index);
        self.next_capture_index += 1;
        self.capture_skolems.push(v);
        self.capture_roles.insert(v, role);
        v
    }

    pub fn role_of(&self, v: UVar) -> Option<&UVarRole> {
        self.roles.get(&v)
    }

    /// Allocates a fresh value uvar for each `tparams` entry and a
    /// fresh capture uvar for each `cparams` entry, substitutes them
    /// into the function's body, and returns the rigids plus the
    /// instantiated type (`tparams`/`cparams` now empty), as spec.md
    /// §4.5 describes.
    pub fn instantiate(
        &mut self,
        ft: &FunctionType,
    ) -> Result<(Vec<UVar>, Vec<CaptureUVar>, FunctionType), SolveError> {
        let rigids: Vec<UVar> = ft
            .tparams
            .iter()
            .map(|t| self.fresh(UVarRole::TypeVariableInstantiation(t.as_str())))
            .collect();
        let capture_rigids: Vec<CaptureUVar> = ft
            .cparams
            .iter()
            .map(|c| self.fresh_capture(CaptureUVarRole::CaptureParamInstantiation(c.as_str())))
            .collect();

        let mut types = FxHashMap::default();
        for (param, var) in ft.tparams.iter().zip(rigids.iter()) {
            types.insert(*param, ValueType::UVar(*var));
        }
        let mut captures = FxHashMap::default();
        for (param, var) in ft.cparams.iter().zip(capture_rigids.iter()) {
            captures.insert(*param, CaptureSet::singleton(CaptureAtom::Var(*var)));
        }
        let subst = Substitution::from_maps(types, captures);

        // Applied directly to the body, NOT via
        // `Substitution::apply_function_type`: that helper shadows a
        // function's own `tparams`/`cparams` out of the substitution
        // domain, which is exactly what instantiation must NOT do.
        let instantiated = FunctionType {
            tparams: Vec::new(),
            cparams: Vec::new(),
            vparams: ft
                .vparams
                .iter()
                .map(|v| subst.apply_value_type(v))
                .collect::<Result<_, _>>()?,
            bparams: ft
                .bparams
                .iter()
                .map(|b| subst.apply_block_type(b))
                .collect::<Result<_, _>>()?,
            result: Box::new(subst.apply_value_type(&ft.result)?),
            effects: subst.apply_effects(&ft.effects)?,
        };

        Ok((rigids, capture_rigids, instantiated))
    }

    pub fn require_subtype(&mut self, t1: &ValueType, t2: &ValueType) -> Result<(), SolveError> {
        TypeComparer::new(self).unify_value_types(t1, t2)
    }

    pub fn require_subtype_block(&mut self, b1: &BlockType, b2: &BlockType) -> Result<(), SolveError> {
        TypeComparer::new(self).unify_block_types(b1, b2)
    }

    /// Resolves spec.md §9's open question: forwards directly to
    /// `unify_captures`, the symmetric treatment alongside the value-
    /// and block-type entry points (recorded in DESIGN.md).
    pub fn require_subtype_captures(&mut self, c1: &CaptureSet, c2: &CaptureSet) -> Result<(), SolveError> {
        self.unify_captures(c1, c2)
    }

    /// Non-mutating: does not install bounds, does not allocate merge
    /// variables, only consults the graph's current state.
    pub fn is_subtype(&mut self, t1: &ValueType, t2: &ValueType) -> bool {
        let mut q = QueryComparer::new(&mut self.graph);
        TypeComparer::new(&mut q).unify_value_types(t1, t2).is_ok()
    }

    fn effect_atom_is_subtype(&mut self, a: &EffectAtom, b: &EffectAtom) -> bool {
        a.id == b.id
            && a.args.len() == b.args.len()
            && a.args
                .iter()
                .zip(b.args.iter())
                .all(|(x, y)| self.is_subtype(x, y))
    }

    /// `effs1 \ { e | exists e' in effs2, e' <: e }` (spec.md §4.5).
    pub fn subtract(&mut self, effs1: &Effects, effs2: &Effects) -> Effects {
        let mut kept: Vec<EffectAtom> = Vec::new();
        for e in effs1.iter() {
            let covered = effs2.iter().any(|e_prime| self.effect_atom_is_subtype(e_prime, e));
            if !covered {
                kept.push(e.clone());
            }
        }
        Effects::from_atoms(kept)
    }

    pub fn snapshot(&mut self) -> ScopeSnapshot {
        ScopeSnapshot {
            graph: self.graph.snapshot(),
            skolem_len: self.skolems.len(),
            capture_skolem_len: self.capture_skolems.len(),
        }
    }

    pub fn restore(&mut self, snapshot: ScopeSnapshot) {
        self.graph.restore(snapshot.graph);
        self.skolems.truncate(snapshot.skolem_len);
        self.capture_skolems.truncate(snapshot.capture_skolem_len);
    }

    pub fn bounds_for(&mut self, x: UVar) -> (ValueType, ValueType) {
        self.graph.bounds_for(x)
    }

    pub fn lower_bound(&mut self, x: UVar) -> ValueType {
        self.graph.lower_bound(x)
    }

    pub fn upper_bound(&mut self, x: UVar) -> ValueType {
        self.graph.upper_bound(x)
    }

    pub fn lower_variables(&mut self, x: UVar) -> Vec<UVar> {
        self.graph.lower_variables(x)
    }

    pub fn upper_variables(&mut self, x: UVar) -> Vec<UVar> {
        self.graph.upper_variables(x)
    }

    /// Placeholder: bisubstitution-based solving was planned upstream
    /// but never finished (spec.md §4.5, §9). Left a stub deliberately.
    pub fn solve(&mut self) -> Substitution {
        Substitution::empty()
    }

    /// `x <: y` at the scope level (spec.md §4.5 `connect_nodes`).
    #[instrument(level = "debug", skip(self))]
    fn connect_nodes(&mut self, x: UVar, y: UVar) -> Result<(), SolveError> {
        if x == y || self.graph.is_subtype(x, y) {
            return Ok(());
        }
        let lower_x = self.graph.lower_bound(x);
        self.require_lower_bound(y, &lower_x)?;
        let upper_y = self.graph.upper_bound(y);
        self.require_upper_bound(x, &upper_y)?;
        self.graph.connect(x, y);
        Ok(())
    }

    /// Join (Covariant), meet (Contravariant), or invariant
    /// unification of two non-variable-payload bounds (spec.md §4.4's
    /// `merge` table).
    fn merge(&mut self, old: &ValueType, new: &ValueType, polarity: Polarity) -> Result<ValueType, SolveError> {
        if old == new {
            return Ok(old.clone());
        }

        match polarity {
            Polarity::Covariant => {
                if old.is_bottom() {
                    return Ok(new.clone());
                }
                if new.is_bottom() {
                    return Ok(old.clone());
                }
            }
            Polarity::Contravariant => {
                if old.is_top() {
                    return Ok(new.clone());
                }
                if new.is_top() {
                    return Ok(old.clone());
                }
            }
            Polarity::Invariant => {}
        }

        if let (Some(x), Some(y)) = (old.as_uvar(), new.as_uvar()) {
            return Ok(self.merge_variables(x, y, polarity));
        }

        if polarity != Polarity::Invariant {
            if self.is_subtype(old, new) {
                return Ok(match polarity {
                    Polarity::Covariant => new.clone(),
                    _ => old.clone(),
                });
            }
            if self.is_subtype(new, old) {
                return Ok(match polarity {
                    Polarity::Covariant => old.clone(),
                    _ => new.clone(),
                });
            }
        }

        if let (ValueType::App(c1, a1), ValueType::App(c2, a2)) = (old, new) {
            if c1 == c2 && a1.len() == a2.len() {
                let merged = a1
                    .iter()
                    .zip(a2.iter())
                    .map(|(x, y)| self.merge(x, y, Polarity::Invariant))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ValueType::App(*c1, merged));
            }
        }

        Err(SolveError::MergeImpossible {
            old: old.clone(),
            new: new.clone(),
            polarity,
        })
    }

    /// Both bounds are unification variables: introduce a fresh merge
    /// node and connect it per polarity (spec.md §4.4's "both
    /// unification variables" row).
    fn merge_variables(&mut self, x: UVar, y: UVar, polarity: Polarity) -> ValueType {
        match polarity {
            Polarity::Covariant => {
                let m = self.fresh(UVarRole::MergeVariable);
                self.graph.connect(x, m);
                self.graph.connect(y, m);
                ValueType::UVar(m)
            }
            Polarity::Contravariant => {
                let m = self.fresh(UVarRole::MergeVariable);
                self.graph.connect(m, x);
                self.graph.connect(m, y);
                ValueType::UVar(m)
            }
            Polarity::Invariant => {
                self.graph.connect(x, y);
                self.graph.connect(y, x);
                ValueType::UVar(x)
            }
        }
    }
}

impl Comparer for UnificationScope {
    #[instrument(level = "debug", skip(self))]
    fn require_lower_bound(&mut self, x: UVar, t: &ValueType) -> Result<(), SolveError> {
        if let Some(y) = t.as_uvar() {
            return self.connect_nodes(y, x);
        }

        let (l, u) = self.graph.bounds_for(x);
        let new_l = self.merge(&l, t, Polarity::Covariant)?;
        if new_l != l {
            self.graph.update_lower_bound(x, new_l.clone());
            TypeComparer::new(self).unify_value_types(&new_l, &u)?;
        }

        for n in self.graph.upper_variables(x) {
            self.require_lower_bound(n, t)?;
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn require_upper_bound(&mut self, x: UVar, t: &ValueType) -> Result<(), SolveError> {
        if let Some(y) = t.as_uvar() {
            return self.connect_nodes(x, y);
        }

        let (l, u) = self.graph.bounds_for(x);
        let new_u = self.merge(&u, t, Polarity::Contravariant)?;
        if new_u != u {
            self.graph.update_upper_bound(x, new_u.clone());
            TypeComparer::new(self).unify_value_types(&l, &new_u)?;
        }

        for n in self.graph.lower_variables(x) {
            self.require_upper_bound(n, t)?;
        }
        Ok(())
    }

    /// Captures have no separate constraint graph in this port: a
    /// concrete-capability mismatch not already covered by `c2` is an
    /// error; an open `Var` slot in `c2` is treated as able to absorb
    /// whatever `c1` still needs (documented simplification, see
    /// DESIGN.md — spec.md does not give `unify_captures` its own
    /// algorithm the way it gives `merge` a table).
    fn unify_captures(&mut self, c1: &CaptureSet, c2: &CaptureSet) -> Result<(), SolveError> {
        let missing = c1.iter().any(|a| !c2.contains(a));
        if !missing {
            return Ok(());
        }
        if c2.iter().any(|a| matches!(a, CaptureAtom::Var(_))) {
            return Ok(());
        }
        Err(SolveError::CaptureMergeImpossible {
            old: c1.clone(),
            new: c2.clone(),
        })
    }
}
