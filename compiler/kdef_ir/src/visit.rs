//! Term Visitor
//!
//! Default implementations call `walk_k`, which visits children in order.
//! Override the `visit_*` hooks to act at specific nodes; call `walk_k`
//! from an override of `visit` to keep descending.

use crate::{Att, KLabel, K};

/// Read-only term visitor. The visitor may mutate its own state.
pub trait VisitK {
    fn visit(&mut self, k: &K) {
        walk_k(self, k);
    }

    /// Called for every application node, before its arguments.
    fn visit_apply(&mut self, label: &KLabel, att: &Att) {
        let _ = (label, att);
    }

    /// Called for every `#klabel(..)` node.
    fn visit_injected_label(&mut self, label: &KLabel, att: &Att) {
        let _ = (label, att);
    }
}

/// Visit the children of `k`, dispatching label hooks first.
pub fn walk_k<V: VisitK + ?Sized>(visitor: &mut V, k: &K) {
    match k {
        K::Apply { label, args, att } => {
            visitor.visit_apply(label, att);
            for arg in args {
                visitor.visit(arg);
            }
        }
        K::InjectedLabel { label, att } => visitor.visit_injected_label(label, att),
        K::Rewrite { left, right, .. } => {
            visitor.visit(left);
            visitor.visit(right);
        }
        K::Sequence { items, .. } => {
            for item in items {
                visitor.visit(item);
            }
        }
        K::Variable { .. } | K::Token { .. } => {}
    }
}
