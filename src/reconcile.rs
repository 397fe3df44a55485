//! The tree reconciler: walks the definition tree in lock-step with the
//! response tree and prunes answers belonging to hidden or empty items.
//!
//! Everything here is pure. Pruning is expressed by returning `None`; the
//! caller's trees are never mutated.

use crate::model::{FormNode, ResponseNode};
use crate::visibility::VisibilityContext;

/// Reconciles one definition/response pairing.
///
/// Returns `None` when the pairing is pruned: the definition item is hidden
/// (dropping the whole subtree and every answer under it), or it is a leaf
/// with nothing answered. An enabled group keeps its node even when pruning
/// leaves it with no surviving children, so the output stays
/// linkId-addressable at the same depth as the definition.
pub fn reconcile(
    definition: &FormNode,
    response: &ResponseNode,
    visibility: &VisibilityContext<'_>,
) -> Option<ResponseNode> {
    if !visibility.is_enabled(&definition.link_id) {
        return None;
    }

    // Group items: the definition node has children.
    if !definition.children.is_empty() {
        if !response.children.is_empty() {
            let survivors =
                reconcile_children(&definition.children, &response.children, visibility);
            return Some(ResponseNode {
                link_id: response.link_id.clone(),
                answers: response.answers.clone(),
                children: survivors,
            });
        }
        // A group pairing that carries answers but no child items is judged
        // like a leaf.
        return keep_if_answered(response);
    }

    // Leaf items survive only when actually answered, visible or not.
    keep_if_answered(response)
}

/// Walks a definition child list and the corresponding response sibling list
/// in lock-step, reconciling matching pairs.
///
/// Loop invariant: `d` points at the definition child currently being
/// matched; `r` points at the next unconsumed response sibling.
///
/// Consecutive response siblings sharing one linkId are the instances of a
/// repeating definition child, so after consuming one the definition pointer
/// is held in place until the run ends. A definition child with no matching
/// sibling simply contributes nothing, and trailing response siblings that
/// match no definition child are dropped; neither is an error. The walk
/// never reorders and always terminates, since every iteration advances at
/// least one pointer.
pub fn reconcile_children(
    definitions: &[FormNode],
    responses: &[ResponseNode],
    visibility: &VisibilityContext<'_>,
) -> Vec<ResponseNode> {
    let mut survivors = Vec::new();
    let mut d = 0;
    let mut r = 0;

    while d < definitions.len() {
        let definition = &definitions[d];

        if let Some(response) = responses.get(r) {
            if definition.link_id == response.link_id {
                if let Some(survivor) = reconcile(definition, response, visibility) {
                    survivors.push(survivor);
                }

                // Hold the definition child when the next sibling is another
                // instance of the same repeating item.
                let next_is_same_run = responses
                    .get(r + 1)
                    .is_some_and(|next| next.link_id == response.link_id);
                r += 1;
                if next_is_same_run {
                    continue;
                }
                d += 1;
                continue;
            }
        }

        // No response sibling for this definition child: absent, not an error.
        d += 1;
    }

    survivors
}

fn keep_if_answered(response: &ResponseNode) -> Option<ResponseNode> {
    if response.has_meaningful_answer() {
        Some(response.clone())
    } else {
        None
    }
}
