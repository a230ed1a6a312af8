//! Weighted road network with deterministic round-robin dispatch.

use std::collections::BTreeMap;

use emberline_core::{RoadArc, SpawnRejection, WaypointCoord, WorldBounds};
use thiserror::Error;

/// Upper bound on the number of hops a resolved route may contain.
pub(crate) const MAX_ROUTE_LENGTH: usize = 4_096;

/// Errors raised while building the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoadsError {
    /// A waypoint has outgoing roads but all of them have zero weight.
    #[error("waypoint ({x}, {y}) has outgoing roads but none with a positive weight")]
    NoPositiveWeight {
        /// Column of the waypoint.
        x: i32,
        /// Row of the waypoint.
        y: i32,
    },
    /// A waypoint lies outside the world bounds.
    #[error("waypoint ({x}, {y}) lies outside the world bounds")]
    OutOfBounds {
        /// Column of the waypoint.
        x: i32,
        /// Row of the waypoint.
        y: i32,
    },
}

/// Reasons a route cannot be resolved from a spawn waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The waypoint is not part of the network.
    #[error("waypoint is not part of the road network")]
    UnknownWaypoint,
    /// The waypoint has no outgoing road.
    #[error("waypoint has no outgoing road")]
    EmptyRoute,
    /// The route did not reach a terminal waypoint within the hop limit.
    #[error("route does not terminate within the hop limit")]
    RouteTooLong,
    /// The spawn position cannot be tracked by the spatial index.
    #[error("spawn position lies outside the world bounds")]
    OutOfBounds,
}

impl SpawnError {
    /// Rejection reason reported to systems through events.
    #[must_use]
    pub const fn rejection(self) -> SpawnRejection {
        match self {
            Self::UnknownWaypoint => SpawnRejection::UnknownWaypoint,
            Self::EmptyRoute => SpawnRejection::EmptyRoute,
            Self::RouteTooLong => SpawnRejection::RouteTooLong,
            Self::OutOfBounds => SpawnRejection::OutOfBounds,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Road {
    target: usize,
    weight: u32,
}

/// Junction of the road network owning its own dispatch state.
#[derive(Clone, Debug)]
struct RoadNode {
    coord: WaypointCoord,
    roads: Vec<Road>,
    cursor: Option<usize>,
    remaining: u32,
}

impl RoadNode {
    fn new(coord: WaypointCoord) -> Self {
        Self {
            coord,
            roads: Vec::new(),
            cursor: None,
            remaining: 0,
        }
    }

    /// Picks the road for the next caller, sending `weight` callers down each
    /// road before rotating to the following one.
    fn dispatch(&mut self) -> Option<usize> {
        if self.roads.is_empty() {
            return None;
        }

        let mut cursor = self.cursor.unwrap_or(self.roads.len() - 1);
        while self.remaining == 0 {
            cursor = (cursor + 1) % self.roads.len();
            self.remaining = self.roads[cursor].weight;
        }

        self.cursor = Some(cursor);
        self.remaining -= 1;
        Some(self.roads[cursor].target)
    }
}

/// Road network loaded once per scenario.
///
/// Dispatch state lives on each node and is shared by every enemy routed
/// through it, so consecutive spawns interleave into one global sequence.
#[derive(Clone, Debug)]
pub struct Roads {
    nodes: Vec<RoadNode>,
    lookup: BTreeMap<WaypointCoord, usize>,
}

impl Roads {
    /// Builds the network from weighted arcs, preserving arc order per node.
    pub fn from_arcs(bounds: WorldBounds, arcs: &[RoadArc]) -> Result<Self, RoadsError> {
        let mut roads = Self {
            nodes: Vec::new(),
            lookup: BTreeMap::new(),
        };

        for arc in arcs {
            let from = roads.node_index(bounds, arc.source())?;
            let target = roads.node_index(bounds, arc.destination())?;
            roads.nodes[from].roads.push(Road {
                target,
                weight: arc.weight,
            });
        }

        for node in &roads.nodes {
            if !node.roads.is_empty() && node.roads.iter().all(|road| road.weight == 0) {
                return Err(RoadsError::NoPositiveWeight {
                    x: node.coord.x(),
                    y: node.coord.y(),
                });
            }
        }

        Ok(roads)
    }

    /// Reports whether the waypoint is a node of the network.
    #[must_use]
    pub fn contains(&self, waypoint: WaypointCoord) -> bool {
        self.lookup.contains_key(&waypoint)
    }

    /// Number of nodes in the network.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the network has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Waypoint the next caller leaving `from` should head to.
    ///
    /// Returns `None` for terminal or unknown waypoints. Each call advances the
    /// node's dispatch state.
    pub fn next_waypoint(&mut self, from: WaypointCoord) -> Option<WaypointCoord> {
        let index = *self.lookup.get(&from)?;
        let target = self.nodes[index].dispatch()?;
        Some(self.nodes[target].coord)
    }

    /// Resolves the full route of an enemy starting at `start`, excluding the
    /// start itself.
    pub fn resolve_route(
        &mut self,
        start: WaypointCoord,
    ) -> Result<Vec<WaypointCoord>, SpawnError> {
        if !self.contains(start) {
            return Err(SpawnError::UnknownWaypoint);
        }

        let mut route = Vec::new();
        let mut current = start;
        while let Some(next) = self.next_waypoint(current) {
            if route.len() == MAX_ROUTE_LENGTH {
                return Err(SpawnError::RouteTooLong);
            }
            route.push(next);
            current = next;
        }

        if route.is_empty() {
            return Err(SpawnError::EmptyRoute);
        }
        Ok(route)
    }

    fn node_index(
        &mut self,
        bounds: WorldBounds,
        coord: WaypointCoord,
    ) -> Result<usize, RoadsError> {
        if let Some(index) = self.lookup.get(&coord) {
            return Ok(*index);
        }

        if !bounds.contains(coord.center()) {
            return Err(RoadsError::OutOfBounds {
                x: coord.x(),
                y: coord.y(),
            });
        }

        let index = self.nodes.len();
        self.nodes.push(RoadNode::new(coord));
        let _ = self.lookup.insert(coord, index);
        Ok(index)
    }
}
