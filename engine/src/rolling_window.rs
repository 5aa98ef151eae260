use std::collections::VecDeque;

use corelib::Sample;

use crate::error::{EngineError, EngineResult};

/// Result of a single [`BoundedSeriesQueue::push`].
#[derive(Clone, Debug, PartialEq)]
pub struct PushOutcome {
    /// Oldest sample dropped to make room, if the window was already full.
    pub evicted: Option<Sample>,

    /// Mean of the window after the push.
    pub current_mean: f64,

    /// Whether the window holds exactly `capacity` samples after the push.
    pub is_full: bool,
}

/// Fixed-capacity FIFO window with a running sum for O(1) mean.
///
/// Invariants:
/// - `len() <= capacity()`
/// - `sum()` equals the sum of buffered prices (up to f64 rounding)
/// - samples leave strictly in insertion order
#[derive(Clone, Debug)]
pub struct BoundedSeriesQueue {
    name: String,
    capacity: usize,

    /// Buffered samples, oldest at the front.
    buffer: VecDeque<Sample>,

    running_sum: f64,

    /// Lifetime number of pushes. Not reset by `clear`.
    total_pushes: u64,
}

impl BoundedSeriesQueue {
    pub fn new(name: impl Into<String>, capacity: usize) -> EngineResult<Self> {
        let name = name.into();

        if capacity < 1 {
            return Err(EngineError::InvalidConfiguration(format!(
                "window '{name}' must have capacity >= 1"
            )));
        }

        Ok(Self {
            name,
            capacity,
            buffer: VecDeque::new(),
            running_sum: 0.0,
            total_pushes: 0,
        })
    }

    /// Appends a sample, evicting the oldest one first when the window is full.
    pub fn push(&mut self, sample: Sample) -> PushOutcome {
        let evicted = if self.buffer.len() == self.capacity {
            let oldest = self.buffer.pop_front();
            if let Some(old) = oldest {
                self.running_sum -= old.price;
            }
            oldest
        } else {
            None
        };

        self.buffer.push_back(sample);
        self.running_sum += sample.price;
        self.total_pushes += 1;

        PushOutcome {
            evicted,
            current_mean: self.mean(),
            is_full: self.is_full(),
        }
    }

    /// Mean of the buffered prices, `0.0` when empty.
    ///
    /// `0.0` is also a legitimate mean; check [`Self::is_empty`] to tell them apart.
    pub fn mean(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.running_sum / self.buffer.len() as f64
        }
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Drops every buffered sample and resets the running sum.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.running_sum = 0.0;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.running_sum
    }

    pub fn total_pushes(&self) -> u64 {
        self.total_pushes
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.buffer.front()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.buffer.back()
    }

    /// Buffered samples, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.buffer.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::samples;
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = BoundedSeriesQueue::new("w", 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut w = BoundedSeriesQueue::new("w", usize::MAX).unwrap();

        let out = w.push(samples(&[42.0])[0]);

        assert!(!out.is_full);
        assert_eq!(out.current_mean, 42.0);
        assert_eq!(w.capacity(), usize::MAX);
    }

    #[test]
    fn empty_window_reports_zero_mean() {
        let w = BoundedSeriesQueue::new("w", 3).unwrap();

        assert!(w.is_empty());
        assert!(!w.is_full());
        assert_eq!(w.mean(), 0.0);
    }

    #[test]
    fn capacity_three_evicts_oldest_on_fourth_push() {
        let mut w = BoundedSeriesQueue::new("w", 3).unwrap();
        let s = samples(&[10.0, 20.0, 30.0, 40.0]);

        let first = w.push(s[0]);
        assert!(!first.is_full);
        assert_eq!(first.evicted, None);
        assert_eq!(first.current_mean, 10.0);

        w.push(s[1]);
        let third = w.push(s[2]);
        assert!(third.is_full);
        assert_eq!(third.current_mean, 20.0);

        let fourth = w.push(s[3]);
        assert!(fourth.is_full);
        assert_eq!(fourth.evicted, Some(s[0]));
        assert_eq!(fourth.current_mean, 30.0);
        assert_eq!(w.len(), 3);
        assert_eq!(w.total_pushes(), 4);
    }

    #[test]
    fn capacity_one_always_holds_latest() {
        let mut w = BoundedSeriesQueue::new("w", 1).unwrap();

        for s in samples(&[5.0, 7.0, 9.0]) {
            let out = w.push(s);
            assert!(out.is_full);
            assert_eq!(out.current_mean, s.price);
        }

        assert_eq!(w.latest().map(|s| s.price), Some(9.0));
        assert_eq!(w.oldest().map(|s| s.price), Some(9.0));
    }

    #[test]
    fn clear_resets_buffer_and_sum_but_keeps_push_count() {
        let mut w = BoundedSeriesQueue::new("w", 2).unwrap();
        for s in samples(&[1.0, 2.0, 3.0]) {
            w.push(s);
        }

        w.clear();

        assert!(w.is_empty());
        assert_eq!(w.sum(), 0.0);
        assert_eq!(w.mean(), 0.0);
        assert_eq!(w.total_pushes(), 3);

        let out = w.push(samples(&[8.0])[0]);
        assert_eq!(out.current_mean, 8.0);
        assert_eq!(out.evicted, None);
    }

    #[test]
    fn mean_is_idempotent() {
        let mut w = BoundedSeriesQueue::new("w", 4).unwrap();
        for s in samples(&[0.1, 0.2, 0.3]) {
            w.push(s);
        }

        let m = w.mean();
        assert_eq!(w.mean().to_bits(), m.to_bits());
        assert_eq!(w.mean().to_bits(), m.to_bits());
    }
}
