//! Swap Router: Token Graph & Path Resolution
//!
//! Every APWine AMM holds two pools sharing PT: pool 0 pairs PT with the
//! underlying, pool 1 pairs PT with the FYT. Routes are found by BFS over
//! this fixed graph and translated into the positional encodings the router
//! contract expects.

use std::collections::VecDeque;

use apwine_core::{PoolId, TokenKind};

use crate::state::{NamedPath, SwapPath, SwapPlan};

// ---------------------------------------------------------------------------
// Token Graph
// ---------------------------------------------------------------------------

const TOKEN_COUNT: usize = TokenKind::ALL.len();

/// Pool incidence between two tokens, indexed by [`TokenKind::index`].
/// Edges are symmetric.
const TOKEN_GRAPH: [[Option<PoolId>; TOKEN_COUNT]; TOKEN_COUNT] = [
    // PT
    [None, Some(PoolId::Zero), Some(PoolId::One)],
    // Underlying
    [Some(PoolId::Zero), None, None],
    // FYT
    [Some(PoolId::One), None, None],
];

/// Pool connecting `a` and `b` directly, if any
pub fn incident_pool(a: TokenKind, b: TokenKind) -> Option<PoolId> {
    TOKEN_GRAPH[a.index()][b.index()]
}

fn neighbours(token: TokenKind) -> impl Iterator<Item = TokenKind> {
    TokenKind::ALL
        .into_iter()
        .filter(move |other| incident_pool(token, *other).is_some())
}

/// Shortest node sequence from `from` to `to`, endpoints included.
///
/// Returns `None` when the tokens are equal: a zero-hop swap is not a swap.
pub fn shortest_path(from: TokenKind, to: TokenKind) -> Option<Vec<TokenKind>> {
    if from == to {
        return None;
    }

    let mut previous: [Option<TokenKind>; TOKEN_COUNT] = [None; TOKEN_COUNT];
    let mut visited = [false; TOKEN_COUNT];
    let mut queue = VecDeque::from([from]);
    visited[from.index()] = true;

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut path = vec![to];
            let mut cursor = to;
            while let Some(prev) = previous[cursor.index()] {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }
        for next in neighbours(current) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                previous[next.index()] = Some(current);
                queue.push_back(next);
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Path Encodings
// ---------------------------------------------------------------------------

/// Route from `from` to `to` with intermediate tokens duplicated
pub fn find_token_path(from: TokenKind, to: TokenKind) -> Option<NamedPath> {
    shortest_path(from, to).map(|nodes| NamedPath::from_nodes(&nodes))
}

/// One pool per hop, looked up on the collapsed node sequence
pub fn to_pool_path(path: &NamedPath) -> Vec<PoolId> {
    path.nodes()
        .windows(2)
        .filter_map(|pair| incident_pool(pair[0], pair[1]))
        .collect()
}

/// Side index of every named-path position
pub fn to_side_index_path(path: &NamedPath) -> Vec<u8> {
    path.tokens().iter().map(|t| t.side_index()).collect()
}

pub fn resolve_swap_path(from: TokenKind, to: TokenKind) -> Option<SwapPath> {
    let named = find_token_path(from, to)?;
    Some(SwapPath {
        side_index_path: to_side_index_path(&named),
        pool_path: to_pool_path(&named),
    })
}

/// Same as [`resolve_swap_path`] for token names as callers type them.
/// Unknown names have no route.
pub fn resolve_swap_path_by_name(from: &str, to: &str) -> Option<SwapPath> {
    let from = from.parse().ok()?;
    let to = to.parse().ok()?;
    resolve_swap_path(from, to)
}

/// Full breakdown of a route, for display and the HTTP API
pub fn how_to_swap(from: TokenKind, to: TokenKind) -> Option<SwapPlan> {
    let named_path = find_token_path(from, to)?;
    let visual = named_path
        .nodes()
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join("->");

    Some(SwapPlan {
        side_index_path: to_side_index_path(&named_path),
        pool_path: to_pool_path(&named_path),
        named_path,
        visual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::{Fyt, Pt, Underlying};

    fn resolved(from: TokenKind, to: TokenKind) -> (Vec<u8>, Vec<u8>) {
        let path = resolve_swap_path(from, to).unwrap();
        (
            path.side_index_path,
            path.pool_path.iter().map(|p| p.as_u8()).collect(),
        )
    }

    #[test]
    fn test_graph_is_symmetric() {
        for a in TokenKind::ALL {
            for b in TokenKind::ALL {
                assert_eq!(incident_pool(a, b), incident_pool(b, a));
            }
        }
    }

    #[test]
    fn test_direct_routes() {
        assert_eq!(resolved(Pt, Fyt), (vec![0, 1], vec![1]));
        assert_eq!(resolved(Fyt, Pt), (vec![1, 0], vec![1]));
        assert_eq!(resolved(Pt, Underlying), (vec![0, 1], vec![0]));
        assert_eq!(resolved(Underlying, Pt), (vec![1, 0], vec![0]));
    }

    #[test]
    fn test_routes_through_pt() {
        assert_eq!(resolved(Fyt, Underlying), (vec![1, 0, 0, 1], vec![1, 0]));
        assert_eq!(resolved(Underlying, Fyt), (vec![1, 0, 0, 1], vec![0, 1]));
    }

    #[test]
    fn test_named_path_duplicates_hub() {
        let path = find_token_path(Underlying, Fyt).unwrap();
        assert_eq!(path.tokens(), &[Underlying, Pt, Pt, Fyt]);
    }

    #[test]
    fn test_same_token_has_no_route() {
        for token in TokenKind::ALL {
            assert!(resolve_swap_path(token, token).is_none());
            assert!(how_to_swap(token, token).is_none());
        }
    }

    #[test]
    fn test_pool_path_length_matches_hops() {
        for from in TokenKind::ALL {
            for to in TokenKind::ALL.into_iter().filter(|t| *t != from) {
                let path = resolve_swap_path(from, to).unwrap();
                assert_eq!(path.pool_path.len(), path.side_index_path.len() / 2);
                assert!(path.side_index_path.len() == 2 || path.side_index_path.len() == 4);
            }
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for from in TokenKind::ALL {
            for to in TokenKind::ALL {
                assert_eq!(resolve_swap_path(from, to), resolve_swap_path(from, to));
            }
        }
    }

    #[test]
    fn test_resolve_by_name() {
        let path = resolve_swap_path_by_name("underlying", "FYT").unwrap();
        assert_eq!(path.side_index_path, vec![1, 0, 0, 1]);
        assert!(resolve_swap_path_by_name("DAI", "PT").is_none());
    }

    #[test]
    fn test_how_to_swap_visual() {
        let plan = how_to_swap(Underlying, Fyt).unwrap();
        assert_eq!(plan.visual, "Underlying->PT->FYT");
        assert_eq!(plan.pool_path, vec![PoolId::Zero, PoolId::One]);

        let plan = how_to_swap(Fyt, Pt).unwrap();
        assert_eq!(plan.visual, "FYT->PT");
    }
}
