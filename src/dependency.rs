//! The dependency solver (`spec.md` §4.7): given one sublayer's
//! presorted components, probes pairwise (non-)commutativity and
//! existence-destruction, builds a directed graph, cancels simple
//! cycles, and yields a deterministic topological application order.
//!
//! Indices throughout this module are positions into the presorted
//! `ordered` slice, which double as each component's presort index —
//! the edge-sort key `spec.md` §4.7 asks for falls out for free.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    rc::Rc,
};

use tracing::instrument;

use crate::{
    component::EffectComponent,
    config::MAX_ENUMERATED_CYCLES,
    expression::EvalContext,
    overlay::{Overlay, OverlayState},
    value::Impact,
    world::World,
};

struct Probe {
    cur: OverlayState,
    impact: HashMap<crate::ids::EntityId, HashMap<crate::value::Attribute, Impact>>,
}

fn capture_impact(overlay: &Overlay) -> HashMap<crate::ids::EntityId, HashMap<crate::value::Attribute, Impact>> {
    let mut out: HashMap<crate::ids::EntityId, HashMap<crate::value::Attribute, Impact>> = HashMap::new();
    for ((entity, attr), impact) in overlay.impact() {
        out.entry(entity).or_default().insert(attr, impact);
    }
    out
}

/// Solves one sublayer in place: enacts every valid component against
/// `overlay` in dependency order. `components` need not be presorted;
/// this sorts by `presort_key` itself.
#[instrument(level = "debug", skip(world, overlay, components), fields(n = components.len()))]
pub fn solve_sublayer(world: &World, overlay: &mut Overlay, components: &[Rc<EffectComponent>]) {
    if components.is_empty() {
        return;
    }

    let mut ordered: Vec<Rc<EffectComponent>> = components.to_vec();
    ordered.sort_by_key(|c| c.presort_key());

    if ordered.len() == 1 {
        let valid = {
            let ctx = EvalContext::new(world, overlay);
            ordered[0].is_valid(&ctx)
        };
        if valid {
            overlay.clear_reference();
            ordered[0].enact(world, overlay, true);
        }
        return;
    }

    let n = ordered.len();

    overlay.snapshot();

    // First-order probe.
    let mut first_order: Vec<Probe> = Vec::with_capacity(n);
    for component in &ordered {
        overlay.restore();
        overlay.clear_reference();
        component.enact(world, overlay, false);
        first_order.push(Probe {
            cur: overlay.return_avd(),
            impact: capture_impact(overlay),
        });
    }
    overlay.restore();

    // Second-order probe. `destroyed_by[(a, b)]` is set when b becomes
    // invalid once a has been enacted first.
    let mut destroyed_by: HashSet<(usize, usize)> = HashSet::new();
    let mut second_order: HashMap<(usize, usize), Probe> = HashMap::new();
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            overlay.load(first_order[a].cur.clone());
            overlay.clear_reference();
            ordered[b].selection.invalidate_cache();
            let b_valid = {
                let ctx = EvalContext::new(world, overlay);
                ordered[b].is_valid(&ctx)
            };
            if !b_valid {
                destroyed_by.insert((a, b));
                continue;
            }
            ordered[b].enact(world, overlay, false);
            second_order.insert(
                (a, b),
                Probe {
                    cur: overlay.return_avd(),
                    impact: capture_impact(overlay),
                },
            );
        }
    }
    overlay.restore();

    // Third-order synthesis.
    let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
    for a in 0..n {
        for b in (a + 1)..n {
            let a_destroys_b = destroyed_by.contains(&(a, b));
            let b_destroys_a = destroyed_by.contains(&(b, a));
            if a_destroys_b {
                edges.insert((a, b));
            }
            if b_destroys_a {
                edges.insert((b, a));
            }

            if let (Some(ab), Some(ba)) = (second_order.get(&(a, b)), second_order.get(&(b, a))) {
                if ab.cur != ba.cur {
                    if !b_destroys_a && ab.impact != first_order[b].impact {
                        edges.insert((a, b));
                    }
                    if !a_destroys_b && ba.impact != first_order[a].impact {
                        edges.insert((b, a));
                    }
                }
            }
        }
    }

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(u, v) in &edges {
        adj[u].push(v);
    }

    let cycle_edges = enumerate_cycle_edges(n, &adj, MAX_ENUMERATED_CYCLES);

    let final_edges: Vec<(usize, usize)> = edges
        .into_iter()
        .filter(|e| !cycle_edges.contains(e))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for &(u, v) in &final_edges {
        successors[u].push(v);
        in_degree[v] += 1;
    }

    apply_topological(world, overlay, &ordered, &successors, in_degree);
}

/// Enumerates every simple cycle's edges via Johnson-style restricted
/// DFS (each start vertex only reaches vertices with a greater or equal
/// index, so the same cycle is never found from two different starts).
/// If the cycle count would exceed `cap`, gives up and treats every
/// edge among the probed components as cyclic, so a pathological
/// interaction can't hang a snapshot (`spec.md` §4.7, `config.rs`).
fn enumerate_cycle_edges(n: usize, adj: &[Vec<usize>], cap: usize) -> HashSet<(usize, usize)> {
    let mut cycle_edges: HashSet<(usize, usize)> = HashSet::new();
    let mut count = 0usize;
    let mut overflowed = false;

    'starts: for start in 0..n {
        let mut visited = vec![false; n];
        let mut path = Vec::new();
        if !dfs_cycles(start, start, adj, &mut visited, &mut path, &mut cycle_edges, &mut count, cap) {
            overflowed = true;
            break 'starts;
        }
    }

    if overflowed {
        cycle_edges.clear();
        for (u, succs) in adj.iter().enumerate() {
            for &v in succs {
                cycle_edges.insert((u, v));
            }
        }
    }

    cycle_edges
}

#[allow(clippy::too_many_arguments)]
fn dfs_cycles(
    start: usize,
    current: usize,
    adj: &[Vec<usize>],
    visited: &mut [bool],
    path: &mut Vec<usize>,
    cycle_edges: &mut HashSet<(usize, usize)>,
    count: &mut usize,
    cap: usize,
) -> bool {
    for &next in &adj[current] {
        if next == start {
            *count += 1;
            let mut prev = start;
            for &node in path.iter() {
                cycle_edges.insert((prev, node));
                prev = node;
            }
            cycle_edges.insert((prev, start));
            if *count > cap {
                return false;
            }
        } else if next > start && !visited[next] {
            visited[next] = true;
            path.push(next);
            let ok = dfs_cycles(start, next, adj, visited, path, cycle_edges, count, cap);
            path.pop();
            visited[next] = false;
            if !ok {
                return false;
            }
        }
    }
    true
}

/// Repeatedly enacts the earliest-in-presort node with in-degree zero;
/// a just-applied valid node's newly-independent successors recurse
/// immediately rather than waiting for the outer scan (`spec.md` §4.7).
fn apply_topological(
    world: &World,
    overlay: &mut Overlay,
    ordered: &[Rc<EffectComponent>],
    successors: &[Vec<usize>],
    mut in_degree: Vec<usize>,
) {
    let n = ordered.len();
    let mut removed = vec![false; n];
    let mut remaining = n;

    while remaining > 0 {
        let Some(start) = (0..n).find(|&i| !removed[i] && in_degree[i] == 0) else {
            // A residual cycle slipped past cancellation (shouldn't
            // happen once cycle edges are removed); fall back to
            // presort order for whatever remains rather than hanging.
            for i in 0..n {
                if !removed[i] {
                    removed[i] = true;
                    remaining -= 1;
                    let valid = {
                        let ctx = EvalContext::new(world, overlay);
                        ordered[i].is_valid(&ctx)
                    };
                    if valid {
                        overlay.clear_reference();
                        ordered[i].enact(world, overlay, true);
                    }
                }
            }
            break;
        };
        remaining -= process_node(start, world, overlay, ordered, successors, &mut in_degree, &mut removed);
    }
}


fn process_node(
    node: usize,
    world: &World,
    overlay: &mut Overlay,
    ordered: &[Rc<EffectComponent>],
    successors: &[Vec<usize>],
    in_degree: &mut [usize],
    removed: &mut [bool],
) -> usize {
    removed[node] = true;
    let mut processed = 1;

    let valid = {
        let ctx = EvalContext::new(world, overlay);
        ordered[node].is_valid(&ctx)
    };
    if valid {
        overlay.clear_reference();
        ordered[node].enact(world, overlay, true);
    }

    for &succ in &successors[node] {
        if removed[succ] {
            continue;
        }
        in_degree[succ] -= 1;
        if in_degree[succ] == 0 && valid {
            processed += process_node(succ, world, overlay, ordered, successors, in_degree, removed);
        }
    }

    processed
}
