use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use serde::Serialize;

use crate::deps::detect::PrDependency;

/// Whether every dependency inside a chain is already approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChainStatus {
    Ready,
    Blocked,
}

/// A connected component of the dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyChain {
    pub chain_id: usize,
    pub pr_ids: Vec<u64>, // ascending
    pub status: ChainStatus,
    pub blocker: Option<String>,
}

/// Assembled dependency view: raw edges, merge-order chains, and the set
/// of PRs blocked on an unapproved target.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    pub edges: Vec<PrDependency>,
    pub chains: Vec<DependencyChain>,
    pub blocked_pr_ids: Vec<u64>,
}

/// Group edges into chains and mark each ready or blocked.
///
/// Chains are connected components over an undirected view of the edges,
/// found by breadth-first traversal (PR ids visited in ascending order,
/// so chain ids and member order are deterministic). A chain is blocked
/// when any edge inside it targets a PR missing from `approved_ids`.
pub fn build_dependency_graph(
    edges: Vec<PrDependency>,
    approved_ids: &HashSet<u64>,
) -> DependencyGraph {
    // Undirected adjacency, ordered for deterministic traversal
    let mut adjacency: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
    for edge in &edges {
        adjacency.entry(edge.from_pr_id).or_default().insert(edge.to_pr_id);
        adjacency.entry(edge.to_pr_id).or_default().insert(edge.from_pr_id);
    }

    let mut visited: HashSet<u64> = HashSet::new();
    let mut chains = Vec::new();

    for &start in adjacency.keys() {
        if visited.contains(&start) {
            continue;
        }

        // BFS over the component; no recursion, large graphs are fine
        let mut component = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(id) = queue.pop_front() {
            component.insert(id);
            if let Some(neighbors) = adjacency.get(&id) {
                for &next in neighbors {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        // Unapproved dependency targets inside this component block it
        let mut unapproved: BTreeSet<u64> = BTreeSet::new();
        for edge in &edges {
            if component.contains(&edge.from_pr_id)
                && component.contains(&edge.to_pr_id)
                && !approved_ids.contains(&edge.to_pr_id)
            {
                unapproved.insert(edge.to_pr_id);
            }
        }

        let (status, blocker) = if unapproved.is_empty() {
            (ChainStatus::Ready, None)
        } else {
            let waiting = unapproved
                .iter()
                .map(|id| format!("#{}", id))
                .collect::<Vec<_>>()
                .join(", ");
            (ChainStatus::Blocked, Some(format!("waiting on {}", waiting)))
        };

        chains.push(DependencyChain {
            chain_id: chains.len() + 1,
            pr_ids: component.into_iter().collect(),
            status,
            blocker,
        });
    }

    // Chain-independent: every PR depending on an unapproved target
    let blocked_pr_ids: Vec<u64> = edges
        .iter()
        .filter(|e| !approved_ids.contains(&e.to_pr_id))
        .map(|e| e.from_pr_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    DependencyGraph { edges, chains, blocked_pr_ids }
}
