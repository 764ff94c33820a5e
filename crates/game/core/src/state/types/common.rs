use std::fmt;

/// Unique identifier for a combatant (player or monster).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this combatant is the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for a minted item instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// World location: a year layer plus tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub year: i32,
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        year: 2000,
        x: 0,
        y: 0,
    };

    pub fn new(year: i32, x: i32, y: i32) -> Self {
        Self { year, x, y }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({}, {})", self.year, self.x, self.y)
    }
}

/// World tick counter. One player input resolves in exactly one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer resource meter (hit points, ions) tracked per combatant.
///
/// Values are signed so that a corrupted negative value can be detected by
/// the commit-time invariant check instead of wrapping silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: i32,
    pub maximum: i32,
}

impl ResourceMeter {
    pub fn new(current: i32, maximum: i32) -> Self {
        Self { current, maximum }
    }

    /// A full meter.
    pub fn full(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn missing(&self) -> i32 {
        (self.maximum - self.current).max(0)
    }

    /// Current value as a rounded percentage of maximum, clamped to 0..=100.
    ///
    /// A meter with no maximum reads as 100%.
    pub fn percent(&self) -> i32 {
        if self.maximum <= 0 {
            return 100;
        }
        let current = i64::from(self.current.max(0));
        let maximum = i64::from(self.maximum);
        let pct = (current * 200 + maximum) / (maximum * 2);
        pct.clamp(0, 100) as i32
    }
}
