#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that orders the enemies in range of every tower.

use std::cmp::Ordering;

use emberline_core::{AimStrategy, EnemyId, EnemySnapshot, TowerTarget, TowerView, Vec2};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidate_workspace: Vec<EnemySnapshot>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the preferred targets of every tower.
    ///
    /// `enemies_near` answers which hittable enemies lie within a radius of a
    /// point; towers without any enemy in range are left out. The output
    /// buffer is cleared before populating it, one entry per tower in
    /// identifier order.
    pub fn handle<F>(&mut self, towers: &TowerView, mut enemies_near: F, out: &mut Vec<TowerTarget>)
    where
        F: FnMut(Vec2, f64) -> Vec<EnemySnapshot>,
    {
        out.clear();

        for tower in towers.iter() {
            if !tower.range.is_finite() || tower.range < 0.0 {
                continue;
            }

            self.candidate_workspace.clear();
            self.candidate_workspace
                .extend(enemies_near(tower.position, tower.range));
            if self.candidate_workspace.is_empty() {
                continue;
            }

            sort_candidates(tower.strategy, tower.position, &mut self.candidate_workspace);
            out.push(TowerTarget {
                tower: tower.id,
                candidates: self
                    .candidate_workspace
                    .iter()
                    .map(|candidate| candidate.id)
                    .collect(),
            });
        }
    }
}

/// Orders `candidates` for a shooter at `shooter` according to `strategy`.
///
/// The input is left untouched. Candidates the strategy ranks equally are
/// ordered by identifier, so the result does not depend on input order.
#[must_use]
pub fn order(strategy: AimStrategy, shooter: Vec2, candidates: &[EnemySnapshot]) -> Vec<EnemyId> {
    let mut sorted = candidates.to_vec();
    sort_candidates(strategy, shooter, &mut sorted);
    sorted.into_iter().map(|candidate| candidate.id).collect()
}

fn sort_candidates(strategy: AimStrategy, shooter: Vec2, candidates: &mut [EnemySnapshot]) {
    candidates.sort_by(|left, right| {
        compare(strategy, shooter, left, right).then_with(|| left.id.cmp(&right.id))
    });
}

fn compare(
    strategy: AimStrategy,
    shooter: Vec2,
    left: &EnemySnapshot,
    right: &EnemySnapshot,
) -> Ordering {
    match strategy {
        AimStrategy::Close => shooter
            .distance(left.position)
            .total_cmp(&shooter.distance(right.position)),
        AimStrategy::Last => right.remaining_distance.total_cmp(&left.remaining_distance),
        AimStrategy::Strong => right.health.total_cmp(&left.health),
    }
}
