//! Capacity-bounded object pool for per-region scratch buffers.
//!
//! [`ObjectPool::get`] never blocks waiting for capacity: it pops a recycled
//! value if one is free and otherwise builds a fresh one. Values come back
//! when their [`Pooled`] guard drops, so every exit path (including unwinding)
//! releases. If the free list is already at capacity the value is dropped.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Supplier<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A bounded free list of reusable values.
pub struct ObjectPool<T> {
    capacity: usize,
    supplier: Supplier<T>,
    free: Mutex<Vec<T>>,
}

impl<T> ObjectPool<T> {
    /// Create a pool retaining at most `capacity` released values.
    pub fn new(capacity: usize, supplier: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            capacity,
            supplier: Box::new(supplier),
            free: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Acquire a value, recycled if one is free.
    ///
    /// Recycled values keep whatever state they were released with; callers
    /// reset what they need.
    pub fn get(&self) -> Pooled<'_, T> {
        let recycled = self.lock().pop();
        let item = recycled.unwrap_or_else(|| (self.supplier)());
        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    /// Number of values currently waiting on the free list.
    pub fn retained(&self) -> usize {
        self.lock().len()
    }

    /// Maximum number of values the free list keeps.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, item: T) {
        let mut free = self.lock();
        if free.len() < self.capacity {
            free.push(item);
        }
    }

    // A panic while holding the lock cannot leave the Vec half-modified.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A value on loan from an [`ObjectPool`]. Returned to the pool on drop.
pub struct Pooled<'a, T> {
    pool: &'a ObjectPool<T>,
    item: Option<T>,
}

impl<T> Pooled<'_, T> {
    /// Return the value to the pool now.
    pub fn release(self) {
        drop(self);
    }

    /// Keep the value; it will not go back to the pool.
    pub fn detach(mut self) -> T {
        match self.item.take() {
            Some(item) => item,
            None => unreachable!("pooled item is only taken on drop or detach"),
        }
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled item is only taken on drop or detach"),
        }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled item is only taken on drop or detach"),
        }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_builds_when_empty() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let pool = ObjectPool::new(2, move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Vec::<f32>::new()
        });

        let a = pool.get();
        let b = pool.get();
        assert_eq!(built.load(Ordering::Relaxed), 2);
        drop(a);
        drop(b);
        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn test_released_value_is_recycled() {
        let pool = ObjectPool::new(4, Vec::<u32>::new);
        {
            let mut buf = pool.get();
            buf.extend([1, 2, 3]);
        }
        let buf = pool.get();
        assert_eq!(*buf, vec![1, 2, 3], "recycled value keeps its retained state");
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_capacity_bound_never_exceeded() {
        let pool = ObjectPool::new(3, || 0_u64);
        let held: Vec<_> = (0..10).map(|_| pool.get()).collect();
        drop(held);
        assert_eq!(pool.retained(), 3);

        for round in 0..50 {
            let a = pool.get();
            let b = pool.get();
            let c = pool.get();
            let d = pool.get();
            if round % 2 == 0 {
                a.release();
                b.release();
            }
            drop((c, d));
            assert!(
                pool.retained() <= pool.capacity(),
                "retained {} exceeds capacity {}",
                pool.retained(),
                pool.capacity()
            );
        }
    }

    #[test]
    fn test_zero_capacity_discards_everything() {
        let pool = ObjectPool::new(0, || [0_u8; 16]);
        pool.get().release();
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_detach_keeps_value_out_of_pool() {
        let pool = ObjectPool::new(4, || String::from("scratch"));
        let owned = pool.get().detach();
        assert_eq!(owned, "scratch");
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_release_on_unwind() {
        let pool = Arc::new(ObjectPool::new(4, Vec::<i32>::new));
        let shared = Arc::clone(&pool);
        let result = std::thread::spawn(move || {
            let _buf = shared.get();
            panic!("task failed while holding a pooled buffer");
        })
        .join();
        assert!(result.is_err());
        assert_eq!(pool.retained(), 1, "guard must release during unwinding");
    }

    #[test]
    fn test_concurrent_get_release() {
        let pool = Arc::new(ObjectPool::new(8, || vec![0.0_f32; 64]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let mut buf = pool.get();
                        buf[i % 64] += 1.0;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(pool.retained() <= 8);
    }
}
