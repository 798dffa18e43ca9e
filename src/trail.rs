//! Per-body motion trails.

use bevy::math::DVec3;

/// Two-point motion streak: the previous and current positions of a body.
///
/// Overwritten every update; not a path history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrailBuffer {
    previous: Option<DVec3>,
    current: Option<DVec3>,
}

impl TrailBuffer {
    /// Shift `current` into `previous` and record `position` as current.
    ///
    /// The first push yields a zero-length segment at `position`.
    pub fn push(&mut self, position: DVec3) {
        self.previous = Some(self.current.unwrap_or(position));
        self.current = Some(position);
    }

    pub fn previous(&self) -> Option<DVec3> {
        self.previous
    }

    pub fn current(&self) -> Option<DVec3> {
        self.current
    }

    /// `(previous, current)` once at least one position was recorded.
    pub fn segment(&self) -> Option<(DVec3, DVec3)> {
        Some((self.previous?, self.current?))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fixed-capacity ring of recent positions, oldest entry overwritten first.
#[derive(Clone, Debug, Default)]
pub struct TrailHistory {
    points: Vec<DVec3>,
    capacity: usize,
    /// Next slot to write once the ring is full
    cursor: usize,
}

impl TrailHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// O(1) append.
    pub fn push(&mut self, position: DVec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() < self.capacity {
            self.points.push(position);
        } else {
            self.points[self.cursor] = position;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
        let (newer, older) = self.points.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn latest(&self) -> Option<DVec3> {
        match self.cursor {
            0 => self.points.last().copied(),
            c => self.points.get(c - 1).copied(),
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.cursor = 0;
    }
}
