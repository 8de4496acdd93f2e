use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::Error;
use crate::error::Result;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::policy::ResizePolicy;

/// Matches a stored `(key, value)` pair against a borrowed lookup key.
fn equivalent_key<K, Q, V>(key: &Q) -> impl Fn(&(K, V)) -> bool + '_
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    move |(k, _)| <K as Borrow<Q>>::borrow(k) == key
}

/// A hash map backed by a separately chained [`HashTable`].
///
/// `HashMap<K, V, S>` maps unique keys to values. Keys implement `Hash + Eq`
/// and are hashed with a configurable hasher builder `S`. Each key lives in
/// exactly one bucket, at `hash(key) & (capacity - 1)`.
///
/// Inserting never overwrites: [`insert`](Self::insert) on a present key is a
/// no-op that returns `false`. Use [`entry`](Self::entry),
/// [`get_mut`](Self::get_mut) or [`get_or_default`](Self::get_or_default) to
/// update a value in place.
///
/// The bucket count doubles when an insert pushes the load factor above the
/// policy's upper bound (3/4 by default) and halves when an erase pulls it
/// below the lower bound (1/4 by default), never going under the policy's
/// minimum.
///
/// Cloning deep-copies every entry and keeps the bucket count. Moving out
/// with [`core::mem::take`] leaves an empty map behind.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    /// Two maps are equal when they hold the same keys, each mapped to equal
    /// values. Bucket counts and hashers are not compared.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the policy governing resizes of this map.
    pub fn policy(&self) -> &ResizePolicy {
        self.table.policy()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all entries. The bucket count is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_capacity_and_hasher(64, RandomState::new());
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 64);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries, bucket by bucket.
    ///
    /// Buckets are visited in ascending index order, and the entries of a
    /// bucket in the order they were inserted. The order is stable until the
    /// next resize.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert("spam", 3);
    /// map.insert("offer", 2);
    ///
    /// let text = "spam spam special offer";
    /// let score: usize = map
    ///     .iter()
    ///     .map(|(phrase, weight)| text.matches(phrase).count() * weight)
    ///     .sum();
    /// assert_eq!(score, 8);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys, in the same order as
    /// [`iter`](Self::iter).
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in the same order as
    /// [`iter`](Self::iter).
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Collects bucket occupancy statistics.
    #[cfg(feature = "stats")]
    pub fn bucket_stats(&self) -> hash_table::BucketStats {
        self.table.bucket_stats()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the default policy and the given hasher
    /// builder. The map starts with 16 buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates an empty map governed by `policy`.
    ///
    /// Fails with [`Error::InvalidPolicy`] if the policy does not validate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// # use chained_map::ResizePolicy;
    /// let policy = ResizePolicy::default().with_min_capacity(16);
    /// let mut map = HashMap::with_policy_and_hasher(policy, RandomState::new()).unwrap();
    /// map.insert(1, 1);
    /// map.erase(&1);
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_policy_and_hasher(policy: ResizePolicy, hash_builder: S) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_policy(policy)?,
            hash_builder,
        })
    }

    /// Builds a map from parallel sequences of keys and values.
    ///
    /// When a key appears more than once, the last value supplied for it
    /// wins. Fails with [`Error::LengthMismatch`] if the sequences differ in
    /// length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::Error;
    /// # use chained_map::HashMap;
    /// let map = HashMap::try_from_parts_with_hasher(
    ///     ["x", "x", "y"],
    ///     [10, 20, 30],
    ///     RandomState::new(),
    /// )
    /// .unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.at(&"x"), Ok(&20));
    ///
    /// let err = HashMap::try_from_parts_with_hasher(["x"], [1, 2], RandomState::new());
    /// assert_eq!(err.unwrap_err(), Error::LengthMismatch { keys: 1, values: 2 });
    /// ```
    pub fn try_from_parts_with_hasher<I, J>(keys: I, values: J, hash_builder: S) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = V>,
        J::IntoIter: ExactSizeIterator,
    {
        let keys = keys.into_iter();
        let values = values.into_iter();
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut map = Self::with_hasher(hash_builder);
        for (key, value) in keys.zip(values) {
            match map.entry(key) {
                Entry::Occupied(mut entry) => {
                    entry.insert(value);
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }

        Ok(map)
    }

    /// Inserts `key` mapped to `value` if `key` is not already present.
    ///
    /// Returns `true` if the entry was added. If the key was present, the map
    /// is left unchanged (the stored value is not replaced) and `false` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns a reference to the value for `key`, if present.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns a reference to the value for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::Error;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert("a", 1);
    /// assert_eq!(map.at("a"), Ok(&1));
    /// assert_eq!(map.at("b"), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// The insert may grow the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut counts = HashMap::with_hasher(RandomState::new());
    /// for word in "a b a c a".split(' ') {
    ///     *counts.get_or_default(word) += 1;
    /// }
    /// assert_eq!(counts.at(&"a"), Ok(&3));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and value, if present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, equivalent_key(key))
    }

    /// Removes `key` from the map.
    ///
    /// Returns `true` if the key was present. A successful erase may shrink
    /// the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert!(map.erase(&1));
    /// assert!(!map.erase(&1));
    /// assert!(map.is_empty());
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).is_some()
    }

    /// Returns the index of the bucket holding `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_index<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, equivalent_key(key))
            .ok_or(Error::KeyNotFound)?;
        Ok(self.table.bucket_index(hash))
    }

    /// Returns the number of entries sharing `key`'s bucket, `key` included.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::Error;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert!(map.bucket_size(&1).unwrap() >= 1);
    /// assert_eq!(map.bucket_size(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn bucket_size<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ok(self.table.bucket_len(self.bucket_index(key)?))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let mut map = HashMap::with_hasher(RandomState::new());
    ///
    /// map.entry(1).or_insert("a");
    /// map.entry(1).and_modify(|v| *v = "b").or_insert("c");
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(slot) => Entry::Occupied(OccupiedEntry { slot }),
            TableEntry::Vacant(slot) => Entry::Vacant(VacantEntry { slot, key }),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with 16 buckets using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// # use chained_map::HashMap;
    /// let map: HashMap<i32, String, RandomState> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with at least `capacity` buckets using the
    /// default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty map governed by `policy` using the default hasher
    /// builder.
    pub fn with_policy(policy: ResizePolicy) -> Result<Self> {
        Self::with_policy_and_hasher(policy, S::default())
    }

    /// Builds a map from parallel sequences of keys and values using the
    /// default hasher builder. See
    /// [`try_from_parts_with_hasher`](Self::try_from_parts_with_hasher).
    pub fn try_from_parts<I, J>(keys: I, values: J) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = V>,
        J::IntoIter: ExactSizeIterator,
    {
        Self::try_from_parts_with_hasher(keys, values, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present. Use [`HashMap::at`] or
    /// [`HashMap::get`] to handle a missing key.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in HashMap")
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair whose key is not yet present. Pairs with a key
    /// already in the map are skipped, as with [`HashMap::insert`].
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The slot a key occupies, or would occupy, in a [`HashMap`].
///
/// Returned by [`HashMap::entry`]. Because [`HashMap::insert`] never
/// replaces a stored value, the entry API is the way to overwrite or to
/// insert-or-update in a single lookup.
pub enum Entry<'a, K, V> {
    /// The key is absent. Filling it may double the bucket count.
    Vacant(VacantEntry<'a, K, V>),
    /// The key is present in its bucket's chain.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Returns the stored value, or chains `default` under the key first.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Like [`or_insert`](Self::or_insert), but only builds the value when
    /// the key is absent.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Vacant(vacant) => vacant.insert(default()),
            Entry::Occupied(occupied) => occupied.into_mut(),
        }
    }

    /// Runs `f` on the stored value when the key is present. A vacant entry
    /// passes through untouched.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Vacant(vacant) => Entry::Vacant(vacant),
            Entry::Occupied(mut occupied) => {
                f(occupied.get_mut());
                Entry::Occupied(occupied)
            }
        }
    }

    /// The key this entry was looked up with (vacant) or the stored key
    /// (occupied).
    pub fn key(&self) -> &K {
        match self {
            Entry::Vacant(vacant) => vacant.key(),
            Entry::Occupied(occupied) => occupied.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Returns the stored value, or chains `V::default()` under the key
    /// first. [`HashMap::get_or_default`] is built on this.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A key that is not in the map yet, together with the chain it routes to.
pub struct VacantEntry<'a, K, V> {
    slot: hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// The key that [`insert`](Self::insert) will store.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives the key back without touching the map.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends `(key, value)` to the end of its bucket's chain.
    ///
    /// If the new entry would push the load factor past the policy's upper
    /// bound, the bucket count doubles first. The returned reference points
    /// at the value in its final bucket.
    pub fn insert(self, value: V) -> &'a mut V {
        let (_, stored) = self.slot.insert((self.key, value));
        stored
    }
}

/// A key that is present in the map, pinned to its bucket and chain
/// position.
pub struct OccupiedEntry<'a, K, V> {
    slot: hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// The key as stored in the map.
    pub fn key(&self) -> &K {
        &self.slot.get().0
    }

    /// The stored value.
    pub fn get(&self) -> &V {
        &self.slot.get().1
    }

    /// The stored value, mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.slot.get_mut().1
    }

    /// Consumes the entry, keeping the value borrowed for the map's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.slot.into_mut().1
    }

    /// Overwrites the stored value and hands back the previous one.
    ///
    /// [`HashMap::insert`] leaves existing values alone, so this is how an
    /// update in place is spelled. The stored key and the entry's chain
    /// position do not change.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Unlinks the entry from its chain and returns the value. The bucket
    /// count may halve afterwards.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Unlinks the entry from its chain and returns both key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.slot.remove()
    }
}

/// An iterator over the entries of a [`HashMap`], in bucket order.
///
/// See [`hash_table::Iter`] for the cursor and equality rules.
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Returns the entry under the cursor without advancing.
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        self.inner.peek().map(|(k, v)| (k, v))
    }

    /// Returns the `(bucket, position)` under the cursor, or `None` at the
    /// end.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.inner.position()
    }

    /// Returns `true` once every entry has been yielded.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<K, V> PartialEq for Iter<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
