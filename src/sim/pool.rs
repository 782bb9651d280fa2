//! Object pool for short-lived entities
//!
//! Retired instances are parked per category and handed back out instead of
//! constructing new ones. Ownership makes the core invariant structural: an
//! instance is moved into the free list on recovery and moved out on
//! acquisition, so it can never sit in a free list and a live collection at
//! the same time. The free lists never shrink.

use std::collections::HashMap;

use super::effects::CoinFly;
use super::monster::Monster;
use super::projectile::{Bullet, Splash};

/// Pool key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolCategory {
    Monster,
    Bullet,
    Splash,
    CoinFly,
}

/// A parked instance of any pooled kind
#[derive(Debug, Clone)]
pub enum Pooled {
    Monster(Monster),
    Bullet(Bullet),
    Splash(Splash),
    CoinFly(CoinFly),
}

/// Implemented by every kind the pool can hold
pub trait Poolable: Sized {
    const CATEGORY: PoolCategory;

    fn into_pooled(self) -> Pooled;
    fn from_pooled(pooled: Pooled) -> Option<Self>;
}

macro_rules! impl_poolable {
    ($ty:ident) => {
        impl Poolable for $ty {
            const CATEGORY: PoolCategory = PoolCategory::$ty;

            fn into_pooled(self) -> Pooled {
                Pooled::$ty(self)
            }

            fn from_pooled(pooled: Pooled) -> Option<Self> {
                match pooled {
                    Pooled::$ty(item) => Some(item),
                    _ => None,
                }
            }
        }
    };
}

impl_poolable!(Monster);
impl_poolable!(Bullet);
impl_poolable!(Splash);
impl_poolable!(CoinFly);

#[derive(Debug, Default)]
pub struct ObjectPool {
    free: HashMap<PoolCategory, Vec<Pooled>>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a retired instance, or build one with `factory` when the
    /// category's free list is empty. The caller must re-initialize it.
    pub fn acquire<T: Poolable>(&mut self, factory: impl FnOnce() -> T) -> T {
        self.free
            .get_mut(&T::CATEGORY)
            .and_then(Vec::pop)
            .and_then(T::from_pooled)
            .unwrap_or_else(factory)
    }

    /// Park an instance for reuse. It must already be out of every live
    /// collection, which holds by construction since this takes ownership.
    pub fn recover<T: Poolable>(&mut self, item: T) {
        self.free
            .entry(T::CATEGORY)
            .or_default()
            .push(item.into_pooled());
    }

    /// Number of parked instances in a category
    pub fn available(&self, category: PoolCategory) -> usize {
        self.free.get(&category).map_or(0, Vec::len)
    }

    pub fn total_available(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_acquire_builds_when_empty() {
        let mut pool = ObjectPool::new();
        let mut built = 0;
        let bullet: Bullet = pool.acquire(|| {
            built += 1;
            Bullet::default()
        });
        assert_eq!(built, 1);
        assert!(!bullet.body.active);
        assert_eq!(pool.available(PoolCategory::Bullet), 0);
    }

    #[test]
    fn test_recovered_instance_is_reused() {
        let mut pool = ObjectPool::new();
        let mut bullet = Bullet::default();
        bullet.init(42, Vec2::new(3.0, 4.0), 10.0, 1.0);
        pool.recover(bullet);
        assert_eq!(pool.available(PoolCategory::Bullet), 1);

        let reused: Bullet = pool.acquire(|| panic!("factory must not run"));
        assert_eq!(reused.body.id, 42);
        assert_eq!(pool.available(PoolCategory::Bullet), 0);
    }

    #[test]
    fn test_categories_are_separate() {
        let mut pool = ObjectPool::new();
        pool.recover(Splash::default());
        pool.recover(CoinFly::default());
        assert_eq!(pool.available(PoolCategory::Splash), 1);
        assert_eq!(pool.available(PoolCategory::CoinFly), 1);
        assert_eq!(pool.available(PoolCategory::Monster), 0);

        let mut built = false;
        let _monster: Monster = pool.acquire(|| {
            built = true;
            Monster::default()
        });
        assert!(built, "a monster is never taken from another category");
        assert_eq!(pool.total_available(), 2);
    }
}
