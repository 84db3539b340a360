// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SMIL-style animation timing.

mod clock;
mod interpolate;
mod value;

pub use clock::parse_clock_list;
pub use interpolate::Interpolator;
pub use value::*;

/// A point in document time or a time span, in whole milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Duration(i64);

impl Duration {
    /// An unresolved, infinitely distant time.
    pub const INDEFINITE: Duration = Duration(i64::MAX);

    /// A zero duration.
    pub const ZERO: Duration = Duration(0);

    /// Creates a new duration.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Duration(millis)
    }

    /// Returns the amount of milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Checks that the duration is `indefinite`.
    #[inline]
    pub fn is_indefinite(&self) -> bool {
        self.0 == i64::MAX
    }

    /// Adds two durations. `indefinite` absorbs everything.
    #[must_use]
    pub fn plus(self, other: Duration) -> Duration {
        if self.is_indefinite() || other.is_indefinite() {
            return Duration::INDEFINITE;
        }

        Duration(self.0.saturating_add(other.0).min(i64::MAX - 1))
    }

    /// Subtracts two durations. `indefinite` absorbs everything.
    #[must_use]
    pub fn minus(self, other: Duration) -> Duration {
        if self.is_indefinite() || other.is_indefinite() {
            return Duration::INDEFINITE;
        }

        Duration(self.0.saturating_sub(other.0))
    }
}

/// A single `[begin, end)` activation window of a track.
///
/// The window length is the simple duration of one iteration.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Interval {
    begin: Duration,
    end: Duration,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// Returns `None` when either bound is `indefinite` or `begin >= end`.
    pub fn new(begin: Duration, end: Duration) -> Option<Self> {
        if begin.is_indefinite() || end.is_indefinite() || begin >= end {
            return None;
        }

        Some(Interval { begin, end })
    }

    /// Returns the interval start.
    #[inline]
    pub fn begin(&self) -> Duration {
        self.begin
    }

    /// Returns the interval end.
    #[inline]
    pub fn end(&self) -> Duration {
        self.end
    }

    /// Returns the interval length.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end.minus(self.begin)
    }
}

/// An animation fill mode.
///
/// `fill` attribute of animation elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fill {
    /// Hold the final value after the animation ends.
    Freeze,
    /// Go back to the initial value after the animation ends.
    Remove,
}

impl Default for Fill {
    fn default() -> Self {
        Self::Remove
    }
}

impl std::str::FromStr for Fill {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freeze" => Ok(Fill::Freeze),
            "remove" => Ok(Fill::Remove),
            _ => Err("invalid"),
        }
    }
}

/// How keyframe values are combined.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CombinationMode {
    /// `values="a;b;c"`
    Values,
    /// `from="a" to="b"`
    FromTo,
    /// `from="a" by="b"`
    FromBy,
    /// `by="b"`
    By,
    /// `to="b"`
    To,
}

impl CombinationMode {
    /// Checks that the end value is a delta.
    #[inline]
    pub fn end_is_by(self) -> bool {
        matches!(self, CombinationMode::By | CombinationMode::FromBy)
    }
}

/// How an animated value accumulates with the element's base value.
///
/// `additive` attribute of animation elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Additive {
    /// The animated value overrides the base value.
    Replace,
    /// The animated value is added to the base value.
    Sum,
}

impl Default for Additive {
    fn default() -> Self {
        Self::Replace
    }
}

impl std::str::FromStr for Additive {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Additive::Replace),
            "sum" => Ok(Additive::Sum),
            _ => Err("invalid"),
        }
    }
}

/// A position inside a keyframe list.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct InterpolationProgress {
    iteration_index: i32,
    index_progress: f32,
}

impl InterpolationProgress {
    /// The animation is not active: use the initial value.
    pub const INITIAL: InterpolationProgress = InterpolationProgress {
        iteration_index: -1,
        index_progress: 0.0,
    };

    /// Creates a new progress between keyframes `index` and `index + 1`.
    pub fn new(index: usize, progress: f32) -> Self {
        InterpolationProgress {
            iteration_index: index as i32,
            index_progress: progress,
        }
    }

    /// Checks that the initial value must be used.
    #[inline]
    pub fn is_initial(&self) -> bool {
        self.iteration_index < 0
    }

    /// Returns the index of the first keyframe, `-1` for [`Self::INITIAL`].
    #[inline]
    pub fn iteration_index(&self) -> i32 {
        self.iteration_index
    }

    /// Returns the fractional position between the two keyframes.
    #[inline]
    pub fn index_progress(&self) -> f32 {
        self.index_progress
    }

    /// Returns the keyframe pair indices and the blend factor.
    ///
    /// The second index is clamped to `value_count - 1`.
    pub fn segment(&self, value_count: usize) -> Option<(usize, usize, f32)> {
        if self.is_initial() || value_count == 0 {
            return None;
        }

        let last = value_count - 1;
        let i = (self.iteration_index as usize).min(last);
        Some((i, (i + 1).min(last), self.index_progress))
    }
}

/// The timing of a single animation.
#[derive(Clone, PartialEq, Debug)]
pub struct Track {
    intervals: Vec<Interval>,
    repeat_count: f32,
    fill: Fill,
}

impl Track {
    /// Creates a new track.
    ///
    /// Intervals are sorted by their begin time.
    ///
    /// Returns `None` when there are no intervals or when the repeat count
    /// is not positive. An infinite repeat count is allowed.
    pub fn new(mut intervals: Vec<Interval>, repeat_count: f32, fill: Fill) -> Option<Self> {
        if intervals.is_empty() || repeat_count.is_nan() || repeat_count <= 0.0 {
            return None;
        }

        intervals.sort_by_key(|i| i.begin);
        Some(Track {
            intervals,
            repeat_count,
            fill,
        })
    }

    /// Parses a track from raw animation attributes.
    ///
    /// `begin` is a `;`-separated list of clock values and defaults to `0s`.
    /// `repeat_count` defaults to `1` and accepts `indefinite`.
    ///
    /// A malformed declaration is logged and results in `None`,
    /// so the animated attribute keeps its static value.
    pub fn parse(
        begin: Option<&str>,
        dur: Option<&str>,
        repeat_count: Option<&str>,
        fill: Option<&str>,
    ) -> Option<Self> {
        let duration = match dur.map(str::parse::<Duration>) {
            Some(Ok(d)) => d,
            Some(Err(e)) => {
                log::warn!("Animation ignored: {}.", e);
                return None;
            }
            None => Duration::INDEFINITE,
        };

        if duration.is_indefinite() || duration.as_millis() <= 0 {
            log::warn!("Animation ignored: the duration must be finite and positive.");
            return None;
        }

        let begins = match begin {
            Some(text) => match parse_clock_list(text) {
                Ok(list) if !list.is_empty() => list,
                Ok(_) => vec![Duration::ZERO],
                Err(e) => {
                    log::warn!("Animation ignored: {}.", e);
                    return None;
                }
            },
            None => vec![Duration::ZERO],
        };

        let repeat_count = match repeat_count.map(str::trim) {
            Some("indefinite") => f32::INFINITY,
            Some(text) => match text.parse::<f32>() {
                Ok(n) if n > 0.0 && n.is_finite() => n,
                _ => {
                    log::warn!(
                        "Animation ignored: {}.",
                        crate::Error::InvalidRepeatCount(text.to_string())
                    );
                    return None;
                }
            },
            None => 1.0,
        };

        let fill = match fill {
            Some(text) => text.trim().parse().unwrap_or_else(|_| {
                log::warn!("Invalid fill mode '{}'. Fallback to 'remove'.", text);
                Fill::Remove
            }),
            None => Fill::Remove,
        };

        let mut intervals = Vec::with_capacity(begins.len());
        for begin in begins {
            if begin.is_indefinite() {
                log::warn!("Animation ignored: an indefinite begin time.");
                return None;
            }

            intervals.push(Interval::new(begin, begin.plus(duration))?);
        }

        Track::new(intervals, repeat_count, fill)
    }

    /// Returns all activation windows.
    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Returns the repeat count. Can be infinite.
    #[inline]
    pub fn repeat_count(&self) -> f32 {
        self.repeat_count
    }

    /// Returns the fill mode.
    #[inline]
    pub fn fill(&self) -> Fill {
        self.fill
    }

    /// Returns the earliest begin time.
    #[inline]
    pub fn begin(&self) -> Duration {
        self.intervals[0].begin
    }

    /// Returns the time at which the last activation stops.
    ///
    /// `indefinite` for infinitely repeating tracks.
    pub fn end(&self) -> Duration {
        if !self.repeat_count.is_finite() {
            return Duration::INDEFINITE;
        }

        let last = self.intervals[self.intervals.len() - 1];
        let active = last.duration().as_millis() as f64 * f64::from(self.repeat_count);
        last.begin.plus(Duration::from_millis(active.round() as i64))
    }

    /// Returns the interval driving the animation at `timestamp`.
    ///
    /// This is the latest interval that has already begun. A later
    /// activation restarts the animation even if an earlier one still runs.
    pub fn active_interval(&self, timestamp: Duration) -> Option<&Interval> {
        self.intervals.iter().rev().find(|i| i.begin <= timestamp)
    }

    /// Maps a document timestamp to a keyframe position.
    pub fn progress(&self, timestamp: Duration, value_count: usize) -> InterpolationProgress {
        if value_count == 0 {
            return InterpolationProgress::INITIAL;
        }

        let interval = match self.active_interval(timestamp) {
            Some(i) => i,
            None => return InterpolationProgress::INITIAL,
        };

        let duration = interval.duration().as_millis();
        let elapsed = timestamp.minus(interval.begin).as_millis();
        let iteration_count = elapsed / duration;
        let iteration_progress = (elapsed % duration) as f32 / duration as f32;
        let total_iteration = iteration_count as f32 + iteration_progress;

        if total_iteration >= self.repeat_count {
            return match self.fill {
                Fill::Freeze => InterpolationProgress::new(value_count.saturating_sub(2), 1.0),
                Fill::Remove => InterpolationProgress::INITIAL,
            };
        }

        if value_count == 1 {
            return InterpolationProgress::new(0, 0.0);
        }

        // Fractional repeat counts stop in the middle of an iteration,
        // but the position inside it is the same.
        let segments = (value_count - 1) as f32;
        let scaled = iteration_progress * segments;
        let i = (scaled.floor() as usize).min(value_count - 2);
        InterpolationProgress::new(i, scaled - i as f32)
    }
}

/// A document-level animation window.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AnimationPeriod {
    start: Duration,
    end: Duration,
    freeze: bool,
}

impl Default for AnimationPeriod {
    fn default() -> Self {
        AnimationPeriod {
            start: Duration::ZERO,
            end: Duration::ZERO,
            freeze: false,
        }
    }
}

impl AnimationPeriod {
    /// Creates a new period.
    pub fn new(start: Duration, end: Duration, freeze: bool) -> Self {
        AnimationPeriod { start, end, freeze }
    }

    /// Folds a track into the period.
    #[must_use]
    pub fn derive(&self, track: &Track) -> Self {
        AnimationPeriod {
            start: self.start.min(track.begin()),
            end: self.end.max(track.end()),
            freeze: self.freeze || track.fill() == Fill::Freeze,
        }
    }

    /// Returns the first instant at which something is animated.
    #[inline]
    pub fn start(&self) -> Duration {
        self.start
    }

    /// Returns the last instant at which something is animated.
    ///
    /// `indefinite` when a track repeats forever.
    #[inline]
    pub fn end(&self) -> Duration {
        self.end
    }

    /// Checks that some track holds its final value after the end.
    #[inline]
    pub fn freezes(&self) -> bool {
        self.freeze
    }

    /// Returns the period length.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end.minus(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(begin: i64, dur: i64, repeat_count: f32, fill: Fill) -> Track {
        let begin = Duration::from_millis(begin);
        let interval = Interval::new(begin, begin.plus(Duration::from_millis(dur))).unwrap();
        Track::new(vec![interval], repeat_count, fill).unwrap()
    }

    fn ms(n: i64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn halfway() {
        let t = track(0, 1000, 2.0, Fill::Freeze);
        assert_eq!(t.progress(ms(500), 2), InterpolationProgress::new(0, 0.5));
    }

    #[test]
    fn frozen_after_end() {
        let t = track(0, 1000, 2.0, Fill::Freeze);
        let p = t.progress(ms(2500), 2);
        assert_eq!(p.iteration_index(), 0);
        assert_eq!(p.index_progress(), 1.0);
    }

    #[test]
    fn frozen_is_idempotent() {
        let t = track(0, 1000, 2.0, Fill::Freeze);
        let p = t.progress(ms(2001), 3);
        assert_eq!(p, InterpolationProgress::new(1, 1.0));
        for n in [2500, 10_000, 1_000_000] {
            assert_eq!(t.progress(ms(n), 3), p);
        }
    }

    #[test]
    fn removed_after_end() {
        let t = track(0, 1000, 1.0, Fill::Remove);
        assert!(t.progress(ms(1500), 2).is_initial());
    }

    #[test]
    fn before_begin() {
        let t = track(1000, 1000, 1.0, Fill::Freeze);
        assert!(t.progress(ms(999), 2).is_initial());
        assert_eq!(t.progress(ms(1000), 2), InterpolationProgress::new(0, 0.0));
    }

    #[test]
    fn no_values() {
        let t = track(0, 1000, 1.0, Fill::Freeze);
        assert!(t.progress(ms(500), 0).is_initial());
    }

    #[test]
    fn keyframe_segments() {
        let t = track(0, 1000, 1.0, Fill::Remove);
        assert_eq!(t.progress(ms(250), 3), InterpolationProgress::new(0, 0.5));
        assert_eq!(t.progress(ms(750), 3), InterpolationProgress::new(1, 0.5));
    }

    #[test]
    fn second_iteration() {
        let t = track(0, 1000, 3.0, Fill::Remove);
        assert_eq!(t.progress(ms(1250), 2), InterpolationProgress::new(0, 0.25));
    }

    #[test]
    fn fractional_repeat_count() {
        let t = track(0, 1000, 1.5, Fill::Remove);
        assert_eq!(t.progress(ms(1250), 2), InterpolationProgress::new(0, 0.25));
        assert!(t.progress(ms(1500), 2).is_initial());
    }

    #[test]
    fn monotonic_inside_window() {
        let t = track(0, 1000, 1.0, Fill::Freeze);
        let mut prev = (i32::MIN, f32::MIN);
        for n in (0..1000).step_by(7) {
            let p = t.progress(ms(n), 5);
            let cur = (p.iteration_index(), p.index_progress());
            assert!(cur.0 > prev.0 || (cur.0 == prev.0 && cur.1 >= prev.1));
            prev = cur;
        }
    }

    #[test]
    fn latest_begun_interval_wins() {
        let a = Interval::new(ms(0), ms(1000)).unwrap();
        let b = Interval::new(ms(400), ms(1400)).unwrap();
        let t = Track::new(vec![b, a], 1.0, Fill::Remove).unwrap();
        assert_eq!(t.intervals()[0], a);
        assert_eq!(t.progress(ms(200), 2), InterpolationProgress::new(0, 0.2));
        assert_eq!(t.progress(ms(900), 2), InterpolationProgress::new(0, 0.5));
    }

    #[test]
    fn parse_track() {
        let t = Track::parse(Some("1s"), Some("500ms"), Some("indefinite"), Some("freeze")).unwrap();
        assert_eq!(t.begin(), ms(1000));
        assert_eq!(t.intervals()[0].duration(), ms(500));
        assert!(t.repeat_count().is_infinite());
        assert_eq!(t.fill(), Fill::Freeze);
        assert!(t.end().is_indefinite());
    }

    #[test]
    fn parse_track_defaults() {
        let t = Track::parse(None, Some("2s"), None, None).unwrap();
        assert_eq!(t.begin(), Duration::ZERO);
        assert_eq!(t.repeat_count(), 1.0);
        assert_eq!(t.fill(), Fill::Remove);
        assert_eq!(t.end(), ms(2000));
    }

    #[test]
    fn rejected_tracks() {
        assert!(Track::parse(None, None, None, None).is_none());
        assert!(Track::parse(None, Some("indefinite"), None, None).is_none());
        assert!(Track::parse(None, Some("-1s"), None, None).is_none());
        assert!(Track::parse(None, Some("0s"), None, None).is_none());
        assert!(Track::parse(None, Some("1s"), Some("0"), None).is_none());
        assert!(Track::parse(None, Some("1s"), Some("-2"), None).is_none());
        assert!(Track::parse(None, Some("1s"), Some("many"), None).is_none());
        assert!(Track::parse(Some("indefinite"), Some("1s"), None, None).is_none());
        assert!(Track::parse(Some("a.click"), Some("1s"), None, None).is_none());
    }

    #[test]
    fn period() {
        let a = track(500, 1000, 2.0, Fill::Remove);
        let b = track(100, 200, 1.0, Fill::Freeze);
        let p = AnimationPeriod::default().derive(&a).derive(&b);
        assert_eq!(p.start(), Duration::ZERO);
        assert_eq!(p.end(), ms(2500));
        assert!(p.freezes());

        let c = track(0, 1000, f32::INFINITY, Fill::Remove);
        assert!(p.derive(&c).end().is_indefinite());
    }
}
