use crate::error::Error;
use crate::error::Result;

/// Number of buckets a table starts with when no capacity is requested.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Smallest bucket count a table may shrink to by default.
pub const DEFAULT_MIN_CAPACITY: usize = 1;

/// Factor by which the bucket array grows and shrinks.
pub const RESIZE_FACTOR: usize = 2;

/// Largest bucket count a table can be asked for.
const MAX_BUCKET_COUNT: usize = 1 << (usize::BITS - 1);

/// A load factor expressed as an exact fraction.
///
/// Comparisons against `len / capacity` are done in integer arithmetic so
/// that a bound of `3/4` triggers on exactly the insert that crosses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadFactor {
    numerator: usize,
    denominator: usize,
}

impl LoadFactor {
    /// Creates the load factor `numerator / denominator`.
    ///
    /// A zero denominator is accepted here and rejected by
    /// [`ResizePolicy::validate`].
    pub const fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Returns the numerator of the fraction.
    pub const fn numerator(self) -> usize {
        self.numerator
    }

    /// Returns the denominator of the fraction.
    pub const fn denominator(self) -> usize {
        self.denominator
    }

    /// Returns the fraction as a floating point ratio.
    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Returns `true` if `len / capacity` is strictly greater than this
    /// factor.
    #[inline(always)]
    pub(crate) fn is_exceeded_by(self, len: usize, capacity: usize) -> bool {
        len as u128 * self.denominator as u128 > capacity as u128 * self.numerator as u128
    }

    /// Returns `true` if `len / capacity` is strictly less than this factor.
    #[inline(always)]
    pub(crate) fn is_undercut_by(self, len: usize, capacity: usize) -> bool {
        (len as u128 * self.denominator as u128) < capacity as u128 * self.numerator as u128
    }
}

/// Controls when a table grows or shrinks its bucket array.
///
/// After an insert pushes the load factor above `upper`, the bucket count is
/// doubled. After an erase pulls it below `lower`, the bucket count is halved
/// (repeatedly, in a single rehash) until the load factor is back in range or
/// the next halving would go under `min_capacity`. Bucket counts are always
/// powers of two.
///
/// # Examples
///
/// ```rust
/// use chained_map::LoadFactor;
/// use chained_map::ResizePolicy;
///
/// let policy = ResizePolicy::default()
///     .with_upper(LoadFactor::new(1, 1))
///     .with_min_capacity(8);
/// assert!(policy.validate().is_ok());
///
/// let broken = ResizePolicy::default().with_lower(LoadFactor::new(1, 2));
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePolicy {
    lower: LoadFactor,
    upper: LoadFactor,
    min_capacity: usize,
    initial_capacity: usize,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            lower: LoadFactor::new(1, 4),
            upper: LoadFactor::new(3, 4),
            min_capacity: DEFAULT_MIN_CAPACITY,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl ResizePolicy {
    /// Sets the load factor below which an erase halves the bucket count.
    pub const fn with_lower(mut self, lower: LoadFactor) -> Self {
        self.lower = lower;
        self
    }

    /// Sets the load factor above which an insert doubles the bucket count.
    pub const fn with_upper(mut self, upper: LoadFactor) -> Self {
        self.upper = upper;
        self
    }

    /// Sets the bucket count under which the table never shrinks.
    pub const fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Sets the bucket count used when no explicit capacity is requested.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Returns the shrink threshold.
    pub const fn lower(&self) -> LoadFactor {
        self.lower
    }

    /// Returns the growth threshold.
    pub const fn upper(&self) -> LoadFactor {
        self.upper
    }

    /// Returns the minimum bucket count.
    pub const fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Returns the default bucket count for new tables.
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Checks that the policy keeps the table's invariants reachable.
    ///
    /// The lower bound must be at most half the upper bound so a single
    /// doubling or halving always lands between the two.
    pub fn validate(&self) -> Result<()> {
        if self.lower.denominator == 0 || self.upper.denominator == 0 {
            return Err(Error::InvalidPolicy("load factor denominator is zero"));
        }
        if self.upper.numerator == 0 {
            return Err(Error::InvalidPolicy("upper load factor is zero"));
        }
        if self.min_capacity == 0 || !self.min_capacity.is_power_of_two() {
            return Err(Error::InvalidPolicy(
                "minimum capacity must be a non-zero power of two",
            ));
        }
        if self.initial_capacity < self.min_capacity {
            return Err(Error::InvalidPolicy(
                "initial capacity is below the minimum capacity",
            ));
        }

        let doubled_lower = 2 * self.lower.numerator as u128 * self.upper.denominator as u128;
        let upper = self.upper.numerator as u128 * self.lower.denominator as u128;
        if doubled_lower > upper {
            return Err(Error::InvalidPolicy(
                "lower load factor exceeds half the upper load factor",
            ));
        }

        Ok(())
    }

    /// Rounds a requested bucket count to the power of two actually used.
    ///
    /// Requests past the largest representable power of two are clamped to
    /// it.
    pub(crate) fn bucket_count_for(&self, requested: usize) -> usize {
        requested
            .max(self.min_capacity)
            .checked_next_power_of_two()
            .unwrap_or(MAX_BUCKET_COUNT)
    }

    /// Returns the bucket count to grow to, if `len` entries in `capacity`
    /// buckets exceed the upper bound.
    #[inline]
    pub(crate) fn grow_target(&self, len: usize, capacity: usize) -> Option<usize> {
        let mut target = capacity;
        while self.upper.is_exceeded_by(len, target) {
            target = target.checked_mul(RESIZE_FACTOR)?;
        }

        (target != capacity).then_some(target)
    }

    /// Returns the bucket count to shrink to, if `len` entries in `capacity`
    /// buckets fall under the lower bound and the floor allows it.
    #[inline]
    pub(crate) fn shrink_target(&self, len: usize, capacity: usize) -> Option<usize> {
        let mut target = capacity;
        // `validate` keeps `2 * lower <= upper`, so each halving taken here
        // stays within the upper bound.
        while self.lower.is_undercut_by(len, target) {
            let halved = target / RESIZE_FACTOR;
            if halved < self.min_capacity {
                break;
            }
            target = halved;
        }

        (target != capacity).then_some(target)
    }
}
