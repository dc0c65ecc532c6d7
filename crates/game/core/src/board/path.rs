//! Cell-level shortest paths.

use std::collections::{BTreeMap, VecDeque};

use crate::state::{CellPos, ZoneId};

use super::{Board, Direction};

impl Board {
    /// Every direction sequence tied for the shortest walk from `from` into
    /// any cell of `to`, at most `limit` of them.
    ///
    /// Full cells, walls, ramparts and closed or locked doors block the walk;
    /// open vertical links are followed. Returns a single empty path when
    /// `from` already lies in `to`, and no paths when `to` is unreachable.
    pub fn shortest_path_options(
        &self,
        from: CellPos,
        to: ZoneId,
        limit: usize,
    ) -> Vec<Vec<Direction>> {
        if limit == 0 || self.zone(to).is_none() {
            return Vec::new();
        }
        if self.zone_at(from) == Some(to) {
            return vec![Vec::new()];
        }

        // BFS layer distances plus every predecessor edge on a shortest layer.
        let mut dist: BTreeMap<CellPos, usize> = BTreeMap::from([(from, 0)]);
        let mut preds: BTreeMap<CellPos, Vec<(CellPos, Direction)>> = BTreeMap::new();
        let mut queue = VecDeque::from([from]);
        let mut goal_depth: Option<usize> = None;
        while let Some(pos) = queue.pop_front() {
            let d = dist[&pos];
            if goal_depth.is_some_and(|g| d >= g) {
                continue;
            }
            for (next, dir) in self.steps(pos) {
                match dist.get(&next) {
                    Some(&nd) if nd == d + 1 => {
                        preds.entry(next).or_default().push((pos, dir));
                    }
                    Some(_) => {}
                    None => {
                        dist.insert(next, d + 1);
                        preds.entry(next).or_default().push((pos, dir));
                        if self.zone_at(next) == Some(to) {
                            goal_depth.get_or_insert(d + 1);
                        } else {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        let Some(depth) = goal_depth else {
            return Vec::new();
        };

        let goals: Vec<CellPos> = dist
            .iter()
            .filter(|(pos, d)| **d == depth && self.zone_at(**pos) == Some(to))
            .map(|(pos, _)| *pos)
            .collect();

        let mut out = Vec::new();
        for goal in goals {
            let mut suffix = Vec::with_capacity(depth);
            collect_paths(&preds, from, goal, &mut suffix, &mut out, limit);
            if out.len() >= limit {
                break;
            }
        }
        out
    }

    /// Legal single steps out of a cell.
    fn steps(&self, pos: CellPos) -> Vec<(CellPos, Direction)> {
        let Some(cell) = self.cell(pos) else {
            return Vec::new();
        };
        Direction::ALL
            .into_iter()
            .filter(|dir| cell.side(*dir).is_passable())
            .filter_map(|dir| self.neighbor(pos, dir).map(|next| (next, dir)))
            .filter(|(next, _)| self.cell(*next).is_some_and(|c| !c.is_full()))
            .collect()
    }
}

/// Walks predecessor edges back from `at` to `from`, emitting each complete
/// path in forward order.
fn collect_paths(
    preds: &BTreeMap<CellPos, Vec<(CellPos, Direction)>>,
    from: CellPos,
    at: CellPos,
    suffix: &mut Vec<Direction>,
    out: &mut Vec<Vec<Direction>>,
    limit: usize,
) {
    if out.len() >= limit {
        return;
    }
    if at == from {
        out.push(suffix.iter().rev().copied().collect());
        return;
    }
    let Some(edges) = preds.get(&at) else { return };
    for &(prev, dir) in edges {
        suffix.push(dir);
        collect_paths(preds, from, prev, suffix, out, limit);
        suffix.pop();
        if out.len() >= limit {
            return;
        }
    }
}
