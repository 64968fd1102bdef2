// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A fixed-capacity pool of reusable values.
///
/// Working-precision buffers for high-precision arithmetic can be expensive
/// to allocate. A `Pool` keeps a bounded free list of such values so they
/// can be reused rather than reallocated. Values are returned in LIFO order,
/// which keeps recently used allocations warm.
///
/// `Pool` is not thread-safe. Wrap it in a mutex to share it across
/// threads, or give each thread its own pool.
pub struct Pool<T> {
    free: Vec<T>,
    capacity: usize,
    factory: Box<dyn FnMut() -> T>,
}

impl<T> Pool<T> {
    /// Creates a pool that retains up to `capacity` values, constructing
    /// new values with `factory` when the free list is empty.
    pub fn new<F>(capacity: usize, factory: F) -> Pool<T>
    where
        F: FnMut() -> T + 'static,
    {
        Pool {
            free: Vec::with_capacity(capacity),
            capacity,
            factory: Box::new(factory),
        }
    }

    /// Takes a value from the pool, constructing a new one if the free list
    /// is empty.
    pub fn get(&mut self) -> T {
        match self.free.pop() {
            Some(v) => v,
            None => (self.factory)(),
        }
    }

    /// Returns a value to the pool.
    ///
    /// If the free list is already at capacity, the value is dropped.
    pub fn put(&mut self, v: T) {
        if self.free.len() < self.capacity {
            self.free.push(v);
        }
    }

    /// Returns the number of values currently on the free list.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Returns the maximum number of values the free list retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("available", &self.free.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_returned_values() {
        let mut pool = Pool::new(2, || Vec::<u8>::with_capacity(64));
        let mut v = pool.get();
        v.push(42);
        v.clear();
        pool.put(v);
        assert_eq!(pool.available(), 1);

        let v = pool.get();
        assert_eq!(v.capacity(), 64);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn lifo_order() {
        let mut counter = 0;
        let mut pool = Pool::new(4, move || {
            counter += 1;
            counter
        });
        let a = pool.get();
        let b = pool.get();
        pool.put(a);
        pool.put(b);
        assert_eq!(pool.get(), b);
        assert_eq!(pool.get(), a);
    }

    #[test]
    fn drops_when_full() {
        let mut pool = Pool::new(1, || 0u8);
        pool.put(1);
        pool.put(2);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.get(), 1);
    }

    #[test]
    fn empty_pool_constructs() {
        let mut pool = Pool::new(0, || "fresh".to_string());
        assert_eq!(pool.get(), "fresh");
        pool.put("stale".to_string());
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.get(), "fresh");
    }
}
