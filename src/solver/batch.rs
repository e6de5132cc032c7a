//! Fixed-width particle batching
//!
//! Particles are processed in batches of `width` lanes. The lane count is
//! padded up to a multiple of the width; padding lanes carry an inert
//! transfer cache and never touch the grid. Within a batch every lane is
//! scattered in index order, so accumulation order (and therefore every
//! floating-point result) is the same for any width.

use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    count: usize,
    width: usize,
}

impl BatchPlan {
    pub fn new(count: usize, width: usize) -> Self {
        Self {
            count,
            width: width.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of real lanes.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Lane count rounded up to a whole number of batches.
    pub fn padded_len(&self) -> usize {
        self.count.div_ceil(self.width) * self.width
    }

    pub fn batch_count(&self) -> usize {
        self.padded_len() / self.width
    }

    /// Lane ranges of each batch, including padding lanes.
    pub fn batches(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.batch_count()).map(move |b| b * self.width..(b + 1) * self.width)
    }

    #[inline(always)]
    pub fn is_padding(&self, lane: usize) -> bool {
        lane >= self.count
    }
}
