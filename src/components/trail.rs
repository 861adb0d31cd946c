use crate::physics::math::Vector;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

/// How many past positions a trail keeps
///
/// Serialized as a plain count, or as `"unbounded"`. `null` and numeric
/// strings are accepted on input so scene files and environment overrides
/// both work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "TrailCapacityRepr")]
pub enum TrailCapacity {
    Bounded(NonZeroUsize),
    Unbounded,
}

impl TrailCapacity {
    pub const UNBOUNDED_KEYWORD: &'static str = "unbounded";

    /// `None` for zero, which is not a usable capacity
    pub fn bounded(points: usize) -> Option<Self> {
        NonZeroUsize::new(points).map(TrailCapacity::Bounded)
    }

    #[inline]
    pub fn limit(self) -> Option<usize> {
        match self {
            TrailCapacity::Bounded(points) => Some(points.get()),
            TrailCapacity::Unbounded => None,
        }
    }
}

impl Default for TrailCapacity {
    fn default() -> Self {
        TrailCapacity::Bounded(NonZeroUsize::new(500).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for TrailCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailCapacity::Bounded(points) => write!(f, "{points}"),
            TrailCapacity::Unbounded => f.write_str(Self::UNBOUNDED_KEYWORD),
        }
    }
}

impl std::str::FromStr for TrailCapacity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::UNBOUNDED_KEYWORD) {
            return Ok(TrailCapacity::Unbounded);
        }
        let points: usize = s
            .parse()
            .map_err(|_| format!("trail length must be a positive count or 'unbounded', got '{s}'"))?;
        TrailCapacity::bounded(points).ok_or_else(|| "trail length must be positive".to_string())
    }
}

impl Serialize for TrailCapacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TrailCapacity::Bounded(points) => serializer.serialize_u64(points.get() as u64),
            TrailCapacity::Unbounded => serializer.serialize_str(Self::UNBOUNDED_KEYWORD),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrailCapacityRepr {
    Count(u64),
    Keyword(String),
    Null(()),
}

impl TryFrom<TrailCapacityRepr> for TrailCapacity {
    type Error = String;

    fn try_from(repr: TrailCapacityRepr) -> Result<Self, Self::Error> {
        match repr {
            TrailCapacityRepr::Count(points) => usize::try_from(points)
                .ok()
                .and_then(TrailCapacity::bounded)
                .ok_or_else(|| format!("trail length must be positive, got {points}")),
            TrailCapacityRepr::Keyword(keyword) => keyword.parse(),
            TrailCapacityRepr::Null(()) => Ok(TrailCapacity::Unbounded),
        }
    }
}

/// Past positions of one particle, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<Vector>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the newest position, evicting the oldest ones past `capacity`
    pub fn push(&mut self, position: Vector, capacity: TrailCapacity) {
        self.points.push_back(position);
        self.enforce_capacity(capacity);
    }

    /// Drop the oldest points until the trail fits
    pub fn enforce_capacity(&mut self, capacity: TrailCapacity) {
        if let Some(limit) = capacity.limit() {
            while self.points.len() > limit {
                self.points.pop_front();
            }
        }
    }

    /// Swap in a whole history (e.g. remote results), keeping the newest points
    pub fn replace<I>(&mut self, positions: I, capacity: TrailCapacity)
    where
        I: IntoIterator<Item = Vector>,
    {
        self.points.clear();
        self.points.extend(positions);
        self.enforce_capacity(capacity);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<Vector> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Vector> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Vector> {
        self.points.iter().copied().collect()
    }
}
