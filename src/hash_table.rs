//! A separately chained hash table keyed by caller-supplied hashes.
//!
//! [`HashTable`] owns a power-of-two array of buckets. Each bucket is a
//! collision chain holding `(hash, value)` pairs in insertion order. Values
//! are routed to `hash & (capacity - 1)`; the table never hashes anything
//! itself, so it can back maps, sets, or any other keyed structure.
//!
//! The table grows and shrinks according to its [`ResizePolicy`]. A resize
//! builds the new bucket array off to the side and only swaps it in once the
//! allocation has succeeded, so a failed resize leaves the table untouched.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::Result;
use crate::policy::ResizePolicy;

type Chain<V> = Vec<(u64, V)>;

/// Routes a hash to its bucket in a table of `capacity` buckets.
#[inline(always)]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    hash as usize & (capacity - 1)
}

/// Bucket occupancy statistics collected by [`HashTable::bucket_stats`].
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStats {
    /// Number of live values.
    pub len: usize,
    /// Number of buckets.
    pub capacity: usize,
    /// Number of buckets with no values.
    pub empty_buckets: usize,
    /// Length of the longest collision chain.
    pub longest_chain: usize,
    /// `chain_histogram[n]` is the number of buckets holding exactly `n`
    /// values.
    pub chain_histogram: Vec<usize>,
}

#[cfg(feature = "stats")]
impl BucketStats {
    /// Prints the statistics to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        std::println!("Bucket statistics:");
        std::println!("  Entries:        {}", self.len);
        std::println!("  Buckets:        {}", self.capacity);
        std::println!(
            "  Load factor:    {:.3}",
            self.len as f64 / self.capacity as f64
        );
        std::println!(
            "  Empty buckets:  {} ({:.1}%)",
            self.empty_buckets,
            self.empty_buckets as f64 / self.capacity as f64 * 100.0
        );
        std::println!("  Longest chain:  {}", self.longest_chain);
        std::println!("  Chain length histogram:");
        for (length, count) in self.chain_histogram.iter().enumerate() {
            if *count > 0 {
                std::println!("    {length:>3}: {count}");
            }
        }
    }
}

/// A hash table of values, chained per bucket.
///
/// `HashTable<V>` is the storage layer beneath [`HashMap`](crate::HashMap).
/// Every operation takes the value's precomputed hash and an equality
/// predicate; the table stores the hash next to each value so that resizing
/// never needs to rehash keys.
///
/// Within a bucket, values keep their insertion order. Iteration walks the
/// buckets in ascending index order.
///
/// # Examples
///
/// ```rust
/// use chained_map::hash_table::Entry;
/// use chained_map::hash_table::HashTable;
///
/// let mut table: HashTable<(u64, &str)> = HashTable::with_capacity(16);
/// for (key, name) in [(1, "one"), (17, "seventeen"), (2, "two")] {
///     match table.entry(key, |&(k, _)| k == key) {
///         Entry::Vacant(entry) => {
///             entry.insert((key, name));
///         }
///         Entry::Occupied(_) => unreachable!(),
///     }
/// }
///
/// // 1 and 17 share bucket 1, in insertion order; 2 follows in bucket 2.
/// let names: Vec<&str> = table.iter().map(|&(_, name)| name).collect();
/// assert_eq!(names, ["one", "seventeen", "two"]);
/// assert_eq!(table.bucket_len(1), 2);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Chain<V>>,
    populated: usize,
    policy: ResizePolicy,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.buckets.len())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default policy and its default bucket
    /// count.
    pub fn new() -> Self {
        let policy = ResizePolicy::default();
        Self::with_buckets(policy.initial_capacity(), policy)
    }

    /// Creates an empty table with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to a power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::HashTable;
    /// let table: HashTable<u64> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let policy = ResizePolicy::default();
        Self::with_buckets(policy.bucket_count_for(capacity), policy)
    }

    /// Creates an empty table governed by `policy`, starting at the policy's
    /// initial bucket count.
    pub fn with_policy(policy: ResizePolicy) -> Result<Self> {
        Self::with_capacity_and_policy(policy.initial_capacity(), policy)
    }

    /// Creates an empty table governed by `policy` with at least `capacity`
    /// buckets.
    pub fn with_capacity_and_policy(capacity: usize, policy: ResizePolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self::with_buckets(policy.bucket_count_for(capacity), policy))
    }

    fn with_buckets(capacity: usize, policy: ResizePolicy) -> Self {
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self {
            buckets,
            populated: 0,
            policy,
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.buckets.len() as f64
    }

    /// Returns the policy governing resizes of this table.
    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Returns the bucket `hash` routes to under the current capacity.
    pub fn bucket_index(&self, hash: u64) -> usize {
        bucket_for(hash, self.buckets.len())
    }

    /// Returns the number of values chained in bucket `index`, or zero if
    /// `index` is out of range.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Vec::len)
    }

    /// Removes all values. The bucket count is left unchanged.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        log::trace!(
            "cleared {} values, keeping {} buckets",
            self.populated,
            self.buckets.len()
        );
        self.populated = 0;
    }

    /// Returns an iterator over the values, in bucket order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Locates the value matching `eq` in the bucket `hash` routes to.
    ///
    /// Returns the bucket index and the position within that bucket.
    fn locate(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .position(|(stored, value)| *stored == hash && eq(value))
            .map(|index| (bucket, index))
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::HashTable;
    /// let mut table = HashTable::with_capacity(8);
    /// table.entry(3, |&v: &u64| v == 3).or_insert(3);
    ///
    /// assert_eq!(table.find(3, |&v| v == 3), Some(&3));
    /// assert_eq!(table.find(4, |&v| v == 4), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (bucket, index) = self.locate(hash, eq)?;
        Some(&self.buckets[bucket][index].1)
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (bucket, index) = self.locate(hash, eq)?;
        Some(&mut self.buckets[bucket][index].1)
    }

    /// Removes and returns the value matching `eq`, if any.
    ///
    /// If the removal pulls the load factor under the policy's lower bound,
    /// the bucket count is halved until it is back in range or reaches the
    /// policy's minimum.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (bucket, index) = self.locate(hash, eq)?;
        Some(self.remove_at(bucket, index))
    }

    /// Gets the entry for the value matching `eq` in the bucket `hash`
    /// routes to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::Entry;
    /// # use chained_map::hash_table::HashTable;
    /// let mut table: HashTable<(u64, u32)> = HashTable::new();
    ///
    /// *table.entry(7, |&(k, _)| k == 7).or_insert((7, 0)) = (7, 1);
    /// match table.entry(7, |&(k, _)| k == 7) {
    ///     Entry::Occupied(entry) => assert_eq!(entry.get(), &(7, 1)),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.locate(hash, eq) {
            Some((bucket, index)) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                index,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Collects bucket occupancy statistics.
    #[cfg(feature = "stats")]
    pub fn bucket_stats(&self) -> BucketStats {
        let longest_chain = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut chain_histogram = alloc::vec![0; longest_chain + 1];
        for chain in &self.buckets {
            chain_histogram[chain.len()] += 1;
        }

        BucketStats {
            len: self.populated,
            capacity: self.buckets.len(),
            empty_buckets: chain_histogram[0],
            longest_chain,
            chain_histogram,
        }
    }

    /// Appends a new value to the bucket `hash` routes to, growing first if
    /// the value would push the load factor over the upper bound.
    ///
    /// Growing before the append yields the same layout as appending and then
    /// rehashing: a bucket's values only ever split between two buckets of
    /// the doubled array, in their existing order, and the new value lands
    /// after its former bucket-mates either way.
    fn push(&mut self, hash: u64, value: V) -> &mut V {
        if let Some(target) = self
            .policy
            .grow_target(self.populated + 1, self.buckets.len())
        {
            self.resize(target);
        }

        let bucket = self.bucket_index(hash);
        let chain = &mut self.buckets[bucket];
        let index = chain.len();
        chain.push((hash, value));
        self.populated += 1;

        &mut chain[index].1
    }

    fn remove_at(&mut self, bucket: usize, index: usize) -> V {
        let (_, value) = self.buckets[bucket].remove(index);
        self.populated -= 1;

        if let Some(target) = self
            .policy
            .shrink_target(self.populated, self.buckets.len())
        {
            self.resize(target);
        }

        value
    }

    /// Moves every value into a fresh array of `capacity` buckets.
    ///
    /// If the new array cannot be allocated the table keeps its current
    /// buckets and carries on at the old capacity.
    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity >= self.policy.min_capacity());

        let mut buckets: Vec<Chain<V>> = Vec::new();
        if buckets.try_reserve_exact(capacity).is_err() {
            log::warn!(
                "could not allocate {capacity} buckets, staying at {} with {} values",
                self.buckets.len(),
                self.populated
            );
            return;
        }
        buckets.resize_with(capacity, Vec::new);

        log::trace!(
            "resizing from {} to {capacity} buckets with {} values",
            self.buckets.len(),
            self.populated
        );

        let old = core::mem::replace(&mut self.buckets, buckets);
        for (hash, value) in old.into_iter().flatten() {
            self.buckets[bucket_for(hash, capacity)].push((hash, value));
        }
    }
}

/// A view into a single slot of a [`HashTable`], which may be vacant or
/// occupied.
///
/// This enum is constructed from [`HashTable::entry`].
pub enum Entry<'a, V> {
    /// No value matched.
    Vacant(VacantEntry<'a, V>),
    /// A value matched.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant slot of a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts `value`, growing the table if needed, and returns a mutable
    /// reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.push(self.hash, value)
    }
}

/// A view into an occupied slot of a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the index of the bucket holding the value.
    pub fn bucket_index(&self) -> usize {
        self.bucket
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket][self.index].1
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket][self.index].1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket][self.index].1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the value from the table, shrinking it if needed.
    pub fn remove(self) -> V {
        self.table.remove_at(self.bucket, self.index)
    }
}

/// A forward cursor over the values of a [`HashTable`].
///
/// The cursor is a `(bucket, position)` pair re-resolved against the table on
/// every step. It visits buckets in ascending order and each bucket's values
/// in insertion order, skipping empty buckets. Once past the last value it
/// rests on the end position.
///
/// The shared borrow of the table keeps it from being modified while the
/// iterator is alive. A new iterator from [`HashTable::iter`] always starts
/// over from the first value.
///
/// Two iterators compare equal when both are at the end, or when they read
/// the same table at the same position.
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    bucket: usize,
    index: usize,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(table: &'a HashTable<V>) -> Self {
        let mut iter = Self {
            table,
            bucket: 0,
            index: 0,
            remaining: table.populated,
        };
        iter.settle();
        iter
    }

    /// Moves forward to the next occupied position, or to the end.
    fn settle(&mut self) {
        let buckets = &self.table.buckets;
        while self.bucket < buckets.len() && self.index >= buckets[self.bucket].len() {
            self.bucket += 1;
            self.index = 0;
        }
    }

    /// Returns the value under the cursor without advancing.
    pub fn peek(&self) -> Option<&'a V> {
        self.table
            .buckets
            .get(self.bucket)
            .and_then(|chain| chain.get(self.index))
            .map(|(_, value)| value)
    }

    /// Returns the `(bucket, position)` under the cursor, or `None` at the
    /// end.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.is_end()).then_some((self.bucket, self.index))
    }

    /// Returns `true` once every value has been yielded.
    pub fn is_end(&self) -> bool {
        self.bucket >= self.table.buckets.len()
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            bucket: self.bucket,
            index: self.index,
            remaining: self.remaining,
        }
    }
}

impl<V> Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("position", &self.position())
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<V> PartialEq for Iter<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_end(), other.is_end()) {
            (true, true) => true,
            (false, false) => {
                core::ptr::eq(self.table, other.table)
                    && self.bucket == other.bucket
                    && self.index == other.index
            }
            _ => false,
        }
    }
}

impl<V> Eq for Iter<'_, V> {}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.peek()?;
        self.index += 1;
        self.remaining -= 1;
        self.settle();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::policy::LoadFactor;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    /// Inserts `key` under the identity hash so tests control bucket routing.
    fn insert_raw(table: &mut HashTable<Item>, key: u64, value: i32) -> bool {
        match table.entry(key, |v| v.key == key) {
            Entry::Vacant(entry) => {
                entry.insert(Item { key, value });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn keys(table: &HashTable<Item>) -> Vec<u64> {
        table.iter().map(|item| item.key).collect()
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            match table.entry(hash, |v: &Item| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: (k as i32) * 2,
                    });
                }
                Entry::Occupied(_) => panic!("unexpected occupied on first insert: {table:?}"),
            }
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{table:?}"
            );
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(&state, k);

        match table.entry(hash, |v| v.key == k) {
            Entry::Vacant(v) => {
                v.insert(Item { key: k, value: 7 });
            }
            Entry::Occupied(_) => panic!("should be vacant first time"),
        }

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                let prev = occ.insert(Item { key: k, value: 11 });
                assert_eq!(prev.value, 7);
            }
            Entry::Vacant(_) => panic!("should be occupied: {k}#{hash:02X} in {table:?}"),
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
    }

    #[test]
    fn find_mut_and_modify() {
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5u64 {
            insert_raw(&mut table, k, 1);
        }

        for k in 0..5u64 {
            table.find_mut(k, |v| v.key == k).unwrap().value += k as i32;
        }
        for k in 0..5u64 {
            assert_eq!(table.find(k, |v| v.key == k).unwrap().value, 1 + k as i32);
        }
        assert!(table.find_mut(9, |v| v.key == 9).is_none());
    }

    #[test]
    fn routing_masks_hash_by_capacity() {
        let table: HashTable<Item> = HashTable::with_capacity(16);
        assert_eq!(table.bucket_index(5), 5);
        assert_eq!(table.bucket_index(21), 5);
        assert_eq!(table.bucket_index(u64::MAX), 15);
    }

    #[test]
    fn collisions_chain_in_insertion_order() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        insert_raw(&mut table, 32, 0);
        insert_raw(&mut table, 3, 0);
        insert_raw(&mut table, 0, 0);
        insert_raw(&mut table, 16, 0);

        assert_eq!(table.bucket_len(0), 3);
        assert_eq!(table.bucket_len(3), 1);
        assert_eq!(table.bucket_len(99), 0);
        assert_eq!(keys(&table), vec![32, 0, 16, 3]);
    }

    #[test]
    fn grows_once_when_crossing_upper_bound() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in 0..12u64 {
            insert_raw(&mut table, k, 0);
        }
        assert_eq!(table.capacity(), 16);
        assert!((table.load_factor() - 0.75).abs() < f64::EPSILON);

        insert_raw(&mut table, 12, 0);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.len(), 13);
        for k in 0..13u64 {
            assert!(table.find(k, |v| v.key == k).is_some());
        }
    }

    #[test]
    fn grow_before_push_matches_append_then_rehash() {
        let mut table: HashTable<Item> = HashTable::with_capacity(4);
        // Bucket 0 collects 0, 4, 8 at capacity 4.
        insert_raw(&mut table, 0, 0);
        insert_raw(&mut table, 4, 0);
        insert_raw(&mut table, 1, 0);
        assert_eq!(table.capacity(), 4);

        // Fourth value crosses 3/4 and doubles to 8 before landing.
        match table.entry(8, |v| v.key == 8) {
            Entry::Vacant(entry) => {
                let value = entry.insert(Item { key: 8, value: 5 });
                value.value += 1;
            }
            Entry::Occupied(_) => unreachable!(),
        }
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.find(8, |v| v.key == 8).unwrap().value, 6);

        // At capacity 8: bucket 0 = [0, 8], bucket 1 = [1], bucket 4 = [4].
        assert_eq!(keys(&table), vec![0, 8, 1, 4]);
    }

    #[test]
    fn shrinks_after_erase_and_stops_at_floor() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in 0..13u64 {
            insert_raw(&mut table, k, k as i32);
        }
        assert_eq!(table.capacity(), 32);

        for k in 0..6u64 {
            assert!(table.remove(k, |v| v.key == k).is_some());
        }
        assert_eq!(table.len(), 7);
        assert_eq!(table.capacity(), 16);

        for k in 6..13u64 {
            assert_eq!(table.find(k, |v| v.key == k).unwrap().value, k as i32);
            table.remove(k, |v| v.key == k);
            assert!(table.capacity().is_power_of_two());
        }
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 1);
    }

    #[test]
    fn shrink_respects_policy_minimum() {
        let policy = ResizePolicy::default().with_min_capacity(8);
        let mut table: HashTable<Item> = HashTable::with_policy(policy).unwrap();
        assert_eq!(table.capacity(), 16);

        for k in 0..4u64 {
            insert_raw(&mut table, k, 0);
        }
        for k in 0..4u64 {
            table.remove(k, |v| v.key == k);
        }
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        insert_raw(&mut table, 1, 1);
        assert!(table.remove(2, |v| v.key == 2).is_none());
        assert_eq!(table.len(), 1);
        assert_eq!(table.capacity(), 16);
    }

    #[test]
    fn occupied_entry_remove_keeps_chain_order() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in [0u64, 16, 32, 48] {
            insert_raw(&mut table, k, 0);
        }

        match table.entry(16, |v| v.key == 16) {
            Entry::Occupied(entry) => {
                assert_eq!(entry.bucket_index(), 0);
                assert_eq!(entry.remove().key, 16);
            }
            Entry::Vacant(_) => unreachable!(),
        }
        assert_eq!(keys(&table), vec![0, 32, 48]);
    }

    #[test]
    fn entry_combinators() {
        let mut table: HashTable<(u64, Vec<u32>)> = HashTable::new();
        table.entry(1, |(k, _)| *k == 1).or_insert((1, vec![1])).1.push(2);
        table
            .entry(1, |(k, _)| *k == 1)
            .and_modify(|(_, v)| v.push(3))
            .or_insert_with(|| unreachable!());
        assert_eq!(table.find(1, |(k, _)| *k == 1), Some(&(1, vec![1, 2, 3])));

        let fresh = table.entry(2, |(k, _)| *k == 2).or_default();
        assert_eq!(fresh, &(0u64, Vec::<u32>::new()));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in 0..20u64 {
            insert_raw(&mut table, k, 0);
        }
        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert!(table.iter().next().is_none());
        assert!(table.find(3, |v| v.key == 3).is_none());
    }

    #[test]
    fn clone_is_deep_and_keeps_capacity() {
        let mut table: HashTable<Item> = HashTable::with_capacity(64);
        insert_raw(&mut table, 1, 1);
        insert_raw(&mut table, 2, 2);

        let mut copy = table.clone();
        assert_eq!(copy.capacity(), 64);
        copy.find_mut(1, |v| v.key == 1).unwrap().value = 100;

        assert_eq!(table.find(1, |v| v.key == 1).unwrap().value, 1);
        assert_eq!(copy.find(1, |v| v.key == 1).unwrap().value, 100);
    }

    #[test]
    fn take_leaves_empty_table() {
        let mut table: HashTable<Item> = HashTable::with_capacity(64);
        insert_raw(&mut table, 1, 1);

        let moved = core::mem::take(&mut table);
        assert_eq!(moved.len(), 1);
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 16);
    }

    #[test]
    fn iter_on_empty_table_is_at_end() {
        let table: HashTable<Item> = HashTable::new();
        let iter = table.iter();
        assert!(iter.is_end());
        assert_eq!(iter.position(), None);
        assert_eq!(iter.peek(), None);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn iter_skips_empty_buckets() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        insert_raw(&mut table, 7, 0);
        insert_raw(&mut table, 13, 0);
        insert_raw(&mut table, 23, 0);

        let mut iter = table.iter();
        assert_eq!(iter.position(), Some((7, 0)));
        assert_eq!(iter.next().map(|v| v.key), Some(7));
        assert_eq!(iter.position(), Some((7, 1)));
        assert_eq!(iter.next().map(|v| v.key), Some(23));
        assert_eq!(iter.position(), Some((13, 0)));
        assert_eq!(iter.next().map(|v| v.key), Some(13));
        assert!(iter.is_end());
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_equality_and_clone() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in [1u64, 2, 3] {
            insert_raw(&mut table, k, 0);
        }

        let mut a = table.iter();
        let b = table.iter();
        assert_eq!(a, b);

        // Post-increment: keep a copy, then advance.
        let before = a.clone();
        a.next();
        assert_ne!(a, before);
        assert_eq!(before, b);
        assert_eq!(before.peek().map(|v| v.key), Some(1));
        assert_eq!(a.peek().map(|v| v.key), Some(2));

        let mut end = table.iter();
        for _ in end.by_ref() {}
        let other = HashTable::<Item>::new();
        assert_eq!(end, other.iter());
        assert_ne!(end, b);

        let copy = table.clone();
        assert_ne!(table.iter(), copy.iter());
    }

    #[test]
    fn iter_reports_exact_len() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in 0..10u64 {
            insert_raw(&mut table, k * 3, 0);
        }
        let mut iter = table.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 8);
        assert_eq!(iter.count(), 8);
    }

    #[test]
    fn iter_walks_buckets_in_ascending_order() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..200u64 {
            let hash = hash_key(&state, k);
            table
                .entry(hash, |v| v.key == k)
                .or_insert(Item { key: k, value: 0 });
        }

        let mut iter = table.iter();
        let mut last = (0, 0);
        let mut seen = 0;
        while let Some(position) = iter.position() {
            assert!(position >= last);
            last = position;
            iter.next();
            seen += 1;
        }
        assert_eq!(seen, 200);
    }

    #[test]
    fn custom_policy_bounds() {
        let policy = ResizePolicy::default()
            .with_lower(LoadFactor::new(0, 1))
            .with_upper(LoadFactor::new(2, 1))
            .with_initial_capacity(4);
        let mut table: HashTable<Item> = HashTable::with_policy(policy).unwrap();
        for k in 0..8u64 {
            insert_raw(&mut table, k, 0);
        }
        assert_eq!(table.capacity(), 4);
        insert_raw(&mut table, 8, 0);
        assert_eq!(table.capacity(), 8);

        for k in 0..9u64 {
            table.remove(k, |v| v.key == k);
        }
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn erase_restores_lower_bound_above_one_half() {
        let policy = ResizePolicy::default()
            .with_lower(LoadFactor::new(1, 1))
            .with_upper(LoadFactor::new(2, 1))
            .with_initial_capacity(8);
        let mut table: HashTable<Item> = HashTable::with_policy(policy).unwrap();
        for k in 0..8u64 {
            insert_raw(&mut table, k, 0);
        }
        assert_eq!(table.capacity(), 8);

        assert!(table.remove(0, |v| v.key == 0).is_some());
        assert_eq!(table.len(), 7);
        assert_eq!(table.capacity(), 4);
        assert!((table.load_factor() - 1.75).abs() < f64::EPSILON);
        for k in 1..8u64 {
            assert!(table.find(k, |v| v.key == k).is_some());
        }
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let policy = ResizePolicy::default().with_min_capacity(3);
        assert!(HashTable::<Item>::with_policy(policy).is_err());
    }

    #[cfg(feature = "stats")]
    #[test]
    fn bucket_stats_histogram() {
        let mut table: HashTable<Item> = HashTable::with_capacity(16);
        for k in [0u64, 16, 32, 1, 17, 2] {
            insert_raw(&mut table, k, 0);
        }
        let stats = table.bucket_stats();
        assert_eq!(stats.len, 6);
        assert_eq!(stats.capacity, 16);
        assert_eq!(stats.longest_chain, 3);
        assert_eq!(stats.empty_buckets, 13);
        assert_eq!(stats.chain_histogram, vec![13, 1, 1, 1]);
    }
}
