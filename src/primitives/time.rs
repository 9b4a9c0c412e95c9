use core::fmt;
use core::ops::{Add, AddAssign, Sub};

/// An absolute position in a track, in ticks since the start of the track.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(u64);

impl Time {
    /// The start of a track.
    pub const ZERO: Self = Self(0);

    /// Creates a new time from absolute ticks
    #[inline]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the ticks as a u64
    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// Advances by `duration`, or `None` if the result would not fit in 64 bits.
    #[inline]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(ticks) => Some(Self(ticks)),
            None => None,
        }
    }

    /// Advances by `duration`, stopping at `u64::MAX` ticks.
    #[inline]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }

    /// The distance from `earlier` to `self`, or `None` if `earlier` is later.
    #[inline]
    pub const fn checked_since(self, earlier: Time) -> Option<Duration> {
        match self.0.checked_sub(earlier.0) {
            Some(ticks) => Some(Duration(ticks)),
            None => None,
        }
    }
}

/// A span of ticks. Delta-times on the wire are durations.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration(u64);

impl Duration {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new duration in ticks
    #[inline]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the ticks as a u64
    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.0
    }
}

impl Add<Duration> for Time {
    type Output = Time;
    fn add(self, rhs: Duration) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl Add<Time> for Duration {
    type Output = Time;
    fn add(self, rhs: Time) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Time {
    type Output = Duration;
    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Self) -> Self::Output {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn time_arithmetic() {
    let start = Time::new(100);
    let end = start + Duration::new(250);
    assert_eq!(end, Time::new(350));
    assert_eq!(end - start, Duration::new(250));
    assert_eq!(Duration::new(5) + Time::new(5), Time::new(10));

    let mut t = Time::ZERO;
    t += Duration::new(7);
    t += Duration::new(3);
    assert_eq!(t.ticks(), 10);

    let mut d = Duration::new(4);
    d += Duration::new(6);
    assert_eq!(d - Duration::new(1), Duration::new(9));
}

#[test]
fn checked_time_arithmetic() {
    assert_eq!(Time::new(u64::MAX).checked_add(Duration::new(1)), None);
    assert_eq!(
        Time::new(1).checked_add(Duration::new(1)),
        Some(Time::new(2))
    );
    assert_eq!(
        Time::new(u64::MAX - 1).saturating_add(Duration::new(5)),
        Time::new(u64::MAX)
    );
    assert_eq!(Time::new(3).checked_since(Time::new(5)), None);
    assert_eq!(
        Time::new(5).checked_since(Time::new(3)),
        Some(Duration::new(2))
    );
}
