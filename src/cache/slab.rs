// Copyright 2022 - 2024 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh
// -----
// Created Date: 2024/05/24 03:04:11

use std::{
    mem,
    ops::{Index, IndexMut},
};

#[derive(Clone)]
enum Entry<T> {
    /// 空闲槽位, 记录下一个空闲槽位
    Vacant(usize),
    Occupied(T),
}

/// 以下标寻址的对象池, 删除后的槽位会被串成空闲链表复用
///
/// # Examples
///
/// ```
/// use arena_lru::Slab;
/// fn main() {
///     let mut slab = Slab::new();
///     let hello = slab.insert("hello");
///     let world = slab.insert("world");
///     assert_eq!(slab[hello], "hello");
///     assert_eq!(slab.remove(hello), "hello");
///     assert_eq!(slab.insert("again"), hello);
///     assert_eq!(slab.get(world), Some(&"world"));
///     assert_eq!(slab.len(), 2);
/// }
/// ```
#[derive(Clone)]
pub struct Slab<T> {
    entries: Vec<Entry<T>>,
    len: usize,
    next: usize,
}

impl<T> Slab<T> {
    pub fn new() -> Self {
        Slab {
            entries: vec![],
            len: 0,
            next: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Slab {
            entries: Vec::with_capacity(capacity),
            len: 0,
            next: 0,
        }
    }

    /// 当前占用的槽位数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: usize) -> Option<&T> {
        match self.entries.get(key) {
            Some(Entry::Occupied(t)) => Some(t),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        match self.entries.get_mut(key) {
            Some(Entry::Occupied(t)) => Some(t),
            _ => None,
        }
    }

    pub fn contains(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    /// 放入数据, 返回其下标, 优先复用最近释放的槽位
    pub fn insert(&mut self, t: T) -> usize {
        let key = self.next;
        if key == self.entries.len() {
            self.entries.push(Entry::Occupied(t));
            self.next = key + 1;
        } else {
            match mem::replace(&mut self.entries[key], Entry::Occupied(t)) {
                Entry::Vacant(next) => self.next = next,
                Entry::Occupied(_) => unreachable!("slab free list points at a live slot"),
            }
        }
        self.len += 1;
        key
    }

    pub fn remove(&mut self, key: usize) -> T {
        match self.try_remove(key) {
            Some(t) => t,
            None => panic!("index error"),
        }
    }

    pub fn try_remove(&mut self, key: usize) -> Option<T> {
        let entry = self.entries.get_mut(key)?;
        match mem::replace(entry, Entry::Vacant(self.next)) {
            Entry::Occupied(t) => {
                self.len -= 1;
                self.next = key;
                Some(t)
            }
            vacant => {
                *entry = vacant;
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
        self.next = 0;
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Slab::new()
    }
}

impl<T> Index<usize> for Slab<T> {
    type Output = T;

    #[inline]
    fn index(&self, key: usize) -> &T {
        match self.entries.get(key) {
            Some(Entry::Occupied(t)) => t,
            _ => panic!("invalid slab key {}", key),
        }
    }
}

impl<T> IndexMut<usize> for Slab<T> {
    #[inline]
    fn index_mut(&mut self, key: usize) -> &mut T {
        match self.entries.get_mut(key) {
            Some(Entry::Occupied(t)) => t,
            _ => panic!("invalid slab key {}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Slab;

    #[test]
    fn test_insert_get() {
        let mut slab = Slab::new();
        assert!(slab.is_empty());
        let a = slab.insert(1);
        let b = slab.insert(2);
        assert_eq!(slab.len(), 2);
        assert_eq!(slab[a], 1);
        assert_eq!(slab.get(b), Some(&2));
        assert_eq!(slab.get(7), None);
        slab[a] = 10;
        assert_eq!(slab.get(a), Some(&10));
    }

    #[test]
    fn test_reuse_freed_slot() {
        let mut slab = Slab::new();
        let a = slab.insert("a");
        let b = slab.insert("b");
        let c = slab.insert("c");
        assert_eq!(slab.remove(b), "b");
        assert_eq!(slab.remove(a), "a");
        assert!(!slab.contains(a));
        assert_eq!(slab.len(), 1);
        // 后释放的先复用
        assert_eq!(slab.insert("x"), a);
        assert_eq!(slab.insert("y"), b);
        assert_eq!(slab.insert("z"), 3);
        assert_eq!(slab[c], "c");
        assert_eq!(slab.len(), 4);
    }

    #[test]
    fn test_try_remove_vacant() {
        let mut slab = Slab::new();
        let a = slab.insert(5u8);
        assert_eq!(slab.try_remove(a), Some(5));
        assert_eq!(slab.try_remove(a), None);
        assert_eq!(slab.try_remove(100), None);
        assert_eq!(slab.len(), 0);
        assert_eq!(slab.insert(6), a);
    }

    #[test]
    #[should_panic]
    fn test_remove_vacant_panics() {
        let mut slab: Slab<u8> = Slab::new();
        slab.remove(0);
    }

    #[test]
    fn test_clear() {
        let mut slab = Slab::with_capacity(4);
        slab.insert(1);
        slab.insert(2);
        slab.clear();
        assert!(slab.is_empty());
        assert_eq!(slab.insert(3), 0);
    }
}
