#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that turns spawn schedules into enemy spawn commands.

use std::{collections::VecDeque, time::Duration};

use emberline_core::{Command, EnemyKind, Event, WaypointCoord};
use serde::{Deserialize, Serialize};

/// Enemies released one after another from a spawn point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSequence {
    /// Simulated time of the first spawn, in nanoseconds.
    pub first_spawn_ns: u64,
    /// Time between two consecutive spawns of the sequence, in nanoseconds.
    pub interval_ns: u64,
    /// Kinds spawned, in release order.
    pub enemies: Vec<EnemyKind>,
}

/// Road node that releases one or more spawn sequences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Route node the enemies start from.
    pub waypoint: WaypointCoord,
    /// Sequences released from this point.
    pub sequences: Vec<SpawnSequence>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScheduledSpawn {
    due: Duration,
    waypoint: WaypointCoord,
    kind: EnemyKind,
}

/// Pure system that emits spawn commands once their scheduled time has passed
/// and asks the world for the next wave once the current one is over.
///
/// A wave is over when its schedule is exhausted and no enemy is left on the
/// roads. Each wave keeps its own clock, starting when the world activates it.
#[derive(Debug)]
pub struct Spawning {
    clock: Duration,
    wave: usize,
    schedules: Vec<VecDeque<ScheduledSpawn>>,
}

impl Spawning {
    /// Creates a single-wave spawning system from the configured spawn points.
    ///
    /// Entries due at the same instant keep their configuration order.
    #[must_use]
    pub fn new(spawn_points: &[SpawnPoint]) -> Self {
        Self::with_waves(&[spawn_points])
    }

    /// Creates a spawning system that releases one schedule per wave.
    #[must_use]
    pub fn with_waves<P: AsRef<[SpawnPoint]>>(waves: &[P]) -> Self {
        Self {
            clock: Duration::ZERO,
            wave: 0,
            schedules: waves
                .iter()
                .map(|spawn_points| schedule(spawn_points.as_ref()))
                .collect(),
        }
    }

    /// Consumes world events and emits every spawn that became due.
    ///
    /// `wave` is the wave the world currently plays and `enemies_alive` the
    /// number of enemies still on its roads.
    pub fn handle(
        &mut self,
        events: &[Event],
        wave: u32,
        enemies_alive: usize,
        out: &mut Vec<Command>,
    ) {
        let wave = usize::try_from(wave).unwrap_or(usize::MAX);
        if wave != self.wave {
            self.wave = wave;
            self.clock = Duration::ZERO;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.clock = self.clock.saturating_add(*dt);
            }
        }

        let has_next_wave = self.wave.saturating_add(1) < self.schedules.len();
        let Some(queue) = self.schedules.get_mut(self.wave) else {
            return;
        };

        let mut released = false;
        while let Some(next) = queue.front() {
            if next.due > self.clock {
                break;
            }

            if let Some(spawn) = queue.pop_front() {
                out.push(Command::SpawnEnemy {
                    waypoint: spawn.waypoint,
                    kind: spawn.kind,
                });
                released = true;
            }
        }

        if !released && queue.is_empty() && enemies_alive == 0 && has_next_wave {
            out.push(Command::AdvanceWave);
        }
    }

    /// Number of spawns that have not been emitted yet, across every wave.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.schedules.iter().map(VecDeque::len).sum()
    }

    /// Reports whether every scheduled spawn of every wave has been emitted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.schedules.iter().all(VecDeque::is_empty)
    }
}

fn schedule(spawn_points: &[SpawnPoint]) -> VecDeque<ScheduledSpawn> {
    let mut schedule = Vec::new();
    for point in spawn_points {
        for sequence in &point.sequences {
            let mut due_ns = sequence.first_spawn_ns;
            for kind in &sequence.enemies {
                schedule.push(ScheduledSpawn {
                    due: Duration::from_nanos(due_ns),
                    waypoint: point.waypoint,
                    kind: *kind,
                });
                due_ns = due_ns.saturating_add(sequence.interval_ns);
            }
        }
    }

    schedule.sort_by_key(|spawn| spawn.due);
    schedule.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: i32, sequences: Vec<SpawnSequence>) -> SpawnPoint {
        SpawnPoint {
            waypoint: WaypointCoord::new(x, 0),
            sequences,
        }
    }

    fn sequence(first_spawn_ns: u64, interval_ns: u64, enemies: Vec<EnemyKind>) -> SpawnSequence {
        SpawnSequence {
            first_spawn_ns,
            interval_ns,
            enemies,
        }
    }

    fn advance(spawning: &mut Spawning, nanos: u64) -> Vec<Command> {
        let mut out = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_nanos(nanos),
            }],
            0,
            0,
            &mut out,
        );
        out
    }

    #[test]
    fn sequence_entries_are_spaced_by_interval() {
        let mut spawning = Spawning::new(&[point(
            1,
            vec![sequence(100, 50, vec![EnemyKind::Pig, EnemyKind::Ogre, EnemyKind::Pig])],
        )]);

        assert!(advance(&mut spawning, 99).is_empty());
        assert_eq!(advance(&mut spawning, 1).len(), 1);
        assert_eq!(advance(&mut spawning, 49).len(), 0);
        assert_eq!(
            advance(&mut spawning, 1),
            vec![Command::SpawnEnemy {
                waypoint: WaypointCoord::new(1, 0),
                kind: EnemyKind::Ogre,
            }]
        );
        assert_eq!(spawning.pending(), 1);
    }

    #[test]
    fn simultaneous_entries_keep_configuration_order() {
        let mut spawning = Spawning::new(&[
            point(2, vec![sequence(0, 10, vec![EnemyKind::Ogre])]),
            point(1, vec![sequence(0, 10, vec![EnemyKind::Pig])]),
        ]);

        let mut out = Vec::new();
        spawning.handle(&[], 0, 0, &mut out);

        assert_eq!(
            out,
            vec![
                Command::SpawnEnemy {
                    waypoint: WaypointCoord::new(2, 0),
                    kind: EnemyKind::Ogre,
                },
                Command::SpawnEnemy {
                    waypoint: WaypointCoord::new(1, 0),
                    kind: EnemyKind::Pig,
                },
            ]
        );
        assert!(spawning.is_exhausted());
    }

    #[test]
    fn large_steps_release_everything_due_in_time_order() {
        let mut spawning = Spawning::new(&[
            point(1, vec![sequence(30, 30, vec![EnemyKind::Pig; 3])]),
            point(2, vec![sequence(10, 30, vec![EnemyKind::Ogre; 3])]),
        ]);

        let waypoints: Vec<i32> = advance(&mut spawning, 1_000)
            .into_iter()
            .map(|command| match command {
                Command::SpawnEnemy { waypoint, .. } => waypoint.x(),
                other => panic!("unexpected command: {other:?}"),
            })
            .collect();

        assert_eq!(waypoints, vec![2, 1, 2, 1, 2, 1]);
        assert!(spawning.is_exhausted());
    }

    #[test]
    fn events_other_than_time_are_ignored() {
        let mut spawning = Spawning::new(&[point(0, vec![sequence(5, 0, vec![EnemyKind::Pig])])]);
        let mut out = Vec::new();
        spawning.handle(
            &[Event::EnemyArrived {
                enemy: emberline_core::EnemyId::new(0),
            }],
            0,
            0,
            &mut out,
        );

        assert!(out.is_empty());
        assert!(!spawning.is_exhausted());
    }

    fn two_waves() -> Spawning {
        Spawning::with_waves(&[
            vec![point(1, vec![sequence(0, 100, vec![EnemyKind::Pig; 2])])],
            vec![point(2, vec![sequence(50, 0, vec![EnemyKind::Ogre])])],
        ])
    }

    fn tick(spawning: &mut Spawning, nanos: u64, wave: u32, alive: usize) -> Vec<Command> {
        let mut out = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_nanos(nanos),
            }],
            wave,
            alive,
            &mut out,
        );
        out
    }

    #[test]
    fn next_wave_waits_for_the_roads_to_clear() {
        let mut spawning = two_waves();

        assert_eq!(tick(&mut spawning, 0, 0, 0).len(), 1);
        assert_eq!(tick(&mut spawning, 100, 0, 1).len(), 1);
        assert!(tick(&mut spawning, 100, 0, 2).is_empty());
        assert!(tick(&mut spawning, 100, 0, 1).is_empty());
        assert_eq!(tick(&mut spawning, 100, 0, 0), vec![Command::AdvanceWave]);
        assert!(!spawning.is_exhausted());
    }

    #[test]
    fn wave_clock_restarts_when_the_world_advances() {
        let mut spawning = two_waves();
        let _ = tick(&mut spawning, 1_000, 0, 0);
        assert_eq!(tick(&mut spawning, 10, 0, 0), vec![Command::AdvanceWave]);

        assert!(tick(&mut spawning, 40, 1, 0).is_empty());
        assert_eq!(
            tick(&mut spawning, 10, 1, 0),
            vec![Command::SpawnEnemy {
                waypoint: WaypointCoord::new(2, 0),
                kind: EnemyKind::Ogre,
            }]
        );
        assert!(spawning.is_exhausted());
        assert!(tick(&mut spawning, 10, 1, 0).is_empty());
    }

    #[test]
    fn last_wave_never_requests_an_advance() {
        let mut spawning = Spawning::new(&[point(0, vec![sequence(0, 0, vec![EnemyKind::Pig])])]);

        assert_eq!(tick(&mut spawning, 0, 0, 0).len(), 1);
        assert!(tick(&mut spawning, 10, 0, 0).is_empty());
        assert_eq!(spawning.pending(), 0);
    }

    #[test]
    fn empty_waves_are_skipped_immediately() {
        let mut spawning = Spawning::with_waves(&[
            Vec::new(),
            vec![point(3, vec![sequence(0, 0, vec![EnemyKind::Pig])])],
        ]);

        assert_eq!(tick(&mut spawning, 0, 0, 0), vec![Command::AdvanceWave]);
        assert_eq!(tick(&mut spawning, 0, 1, 0).len(), 1);
    }
}
