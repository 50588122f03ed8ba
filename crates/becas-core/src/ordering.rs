//! # Sibling Reordering
//!
//! Records under the same parent carry a `rank` (orden): a positive integer,
//! unique within the group, conventionally `1..=N`. This module decides how a
//! group changes when one member moves one place up or down, and which rank a
//! new member receives.
//!
//! Planning is pure. The catalog turns a [`MovePlan::Swap`] into a single
//! atomic write of both records, so a failed commit leaves both ranks as
//! they were.

use crate::types::{RequirementItem, Section, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// RANKED RECORDS
// =============================================================================

/// A record that holds a position among its siblings.
pub trait Ranked {
    /// Store key of the record.
    fn rank_key(&self) -> &str;
    fn rank(&self) -> u32;
    fn set_rank(&mut self, rank: u32);
}

impl Ranked for Stage {
    fn rank_key(&self) -> &str {
        self.id.as_str()
    }
    fn rank(&self) -> u32 {
        self.rank
    }
    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

impl Ranked for Section {
    fn rank_key(&self) -> &str {
        self.id.as_str()
    }
    fn rank(&self) -> u32 {
        self.rank
    }
    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

impl Ranked for RequirementItem {
    fn rank_key(&self) -> &str {
        self.id.as_str()
    }
    fn rank(&self) -> u32 {
        self.rank
    }
    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

// =============================================================================
// DIRECTION & PLAN
// =============================================================================

/// Which neighbour to trade places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!("Unknown direction: {}. Use: up, down", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Why a move request left the group untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unchanged {
    /// Rank is already 1.
    AtTop,
    /// Rank is already the sibling count.
    AtBottom,
    /// No sibling holds the target rank.
    Gap,
}

/// Pairwise exchange of ranks, by index into the sibling slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSwap {
    /// Index of the record that was asked to move.
    pub moved: usize,
    /// Index of the sibling it trades places with.
    pub displaced: usize,
    /// New rank of the moved record (the displaced record's old rank).
    pub moved_to: u32,
    /// New rank of the displaced record (the moved record's old rank).
    pub displaced_to: u32,
}

/// Outcome of planning a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    Swap(RankSwap),
    Unchanged(Unchanged),
}

// =============================================================================
// PLANNING
// =============================================================================

/// Rank for a new member of a group: one past the current maximum,
/// or 1 for an empty group.
#[must_use]
pub fn next_rank<I>(ranks: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    ranks
        .into_iter()
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Plan moving the sibling keyed `key` one place in `direction`.
///
/// Returns `None` if no sibling has that key.
#[must_use]
pub fn plan_move<R: Ranked>(siblings: &[R], key: &str, direction: Direction) -> Option<MovePlan> {
    let moved = siblings.iter().position(|s| s.rank_key() == key)?;
    let current = siblings[moved].rank();
    let count = u32::try_from(siblings.len()).unwrap_or(u32::MAX);

    let target = match direction {
        Direction::Up if current <= 1 => return Some(MovePlan::Unchanged(Unchanged::AtTop)),
        Direction::Down if current >= count => {
            return Some(MovePlan::Unchanged(Unchanged::AtBottom));
        }
        Direction::Up => current - 1,
        Direction::Down => current + 1,
    };

    let displaced = siblings
        .iter()
        .enumerate()
        .find(|(i, s)| *i != moved && s.rank() == target)
        .map(|(i, _)| i);

    Some(match displaced {
        Some(displaced) => MovePlan::Swap(RankSwap {
            moved,
            displaced,
            moved_to: target,
            displaced_to: current,
        }),
        None => MovePlan::Unchanged(Unchanged::Gap),
    })
}

/// Apply a planned swap to an in-memory sibling list.
pub fn apply_swap<R: Ranked>(siblings: &mut [R], swap: RankSwap) {
    siblings[swap.moved].set_rank(swap.moved_to);
    siblings[swap.displaced].set_rank(swap.displaced_to);
}

// =============================================================================
// TESTS
// =============================================================================
