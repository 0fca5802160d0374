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
    borrow::Borrow,
    fmt::{self, Debug},
    hash::{BuildHasher, Hash},
    iter::FusedIterator,
};

use hashbrown::HashTable;
use log::{debug, trace};

use super::{CacheError, Slab};
use crate::DefaultHasher;

/// 链表哨兵的下标, 不对应slab中的任何槽位
const GUARD: usize = usize::MAX;

/// 构造时最多预分配的槽位数
const PREALLOC_LIMIT: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Links {
    prev: usize,
    next: usize,
}

impl Links {
    const fn guard() -> Self {
        Links {
            prev: GUARD,
            next: GUARD,
        }
    }
}

#[derive(Clone)]
struct LruEntry<K, V> {
    key: K,
    val: V,
    links: Links,
}

/// 一个 LRU 缓存的实现, 接口参照Hashmap保持一致
/// 设置容量之后将最大保持该容量大小的数据
/// 后进的数据将会淘汰最久没有被访问的数据
///
/// 节点存放在slab中, 索引表只记录节点下标, 链表的前后指针也是下标,
/// 所以整个结构没有任何裸指针
///
/// # Examples
///
/// ```
/// use arena_lru::LruCache;
/// fn main() {
///     let mut lru = LruCache::new(3);
///     lru.put("now", "ok");
///     lru.put("hello", "algorithm");
///     lru.put("this", "lru");
///     lru.put("auth", "tickbh");
///     assert!(lru.len() == 3);
///     assert_eq!(lru.get("hello"), Some(&"algorithm"));
///     assert_eq!(lru.get("this"), Some(&"lru"));
///     assert_eq!(lru.get("now"), None);
/// }
/// ```
#[derive(Clone)]
pub struct LruCache<K, V, S = DefaultHasher> {
    index: HashTable<usize>,
    entries: Slab<LruEntry<K, V>>,
    /// 哨兵节点, next为头部(最近使用), prev为尾部(最久未使用)
    guard: Links,
    cap: usize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHasher> {
    /// 容量为0时将按1处理
    pub fn new(cap: usize) -> Self {
        LruCache::with_hasher(cap, DefaultHasher::default())
    }

    /// 容量为0时返回错误
    ///
    /// ```
    /// use arena_lru::{CacheError, LruCache};
    /// fn main() {
    ///     assert!(LruCache::<u32, u32>::try_new(0).err() == Some(CacheError::ZeroCapacity));
    ///     assert_eq!(LruCache::<u32, u32>::try_new(2).unwrap().capacity(), 2);
    /// }
    /// ```
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        LruCache::try_with_hasher(cap, DefaultHasher::default())
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// 提供hash函数
    pub fn with_hasher(cap: usize, hash_builder: S) -> LruCache<K, V, S> {
        if cap == 0 {
            debug!("lru capacity 0 raised to 1");
        }
        let cap = cap.max(1);
        let reserve = cap.min(PREALLOC_LIMIT);
        Self {
            index: HashTable::with_capacity(reserve),
            entries: Slab::with_capacity(reserve),
            guard: Links::guard(),
            cap,
            hash_builder,
        }
    }

    pub fn try_with_hasher(cap: usize, hash_builder: S) -> Result<LruCache<K, V, S>, CacheError> {
        if cap == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(LruCache::with_hasher(cap, hash_builder))
    }

    /// 获取当前容量
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// 获取当前长度
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 清理当前数据
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("now", "ok");
    ///     lru.put("hello", "algorithm");
    ///     assert!(lru.len() == 2);
    ///     lru.clear();
    ///     assert!(lru.len() == 0);
    ///     assert_eq!(lru.get("now"), None);
    /// }
    /// ```
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.guard = Links::guard();
    }

    /// 遍历当前的所有值, 从最近使用到最久未使用, 不影响访问顺序
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm");
    ///     lru.put("this", "lru");
    ///     let mut iter = lru.iter();
    ///     assert_eq!(iter.next(), Some((&"this", &"lru")));
    ///     assert_eq!(iter.next(), Some((&"hello", &"algorithm")));
    ///     assert_eq!(iter.next(), None);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: &self.entries,
            front: self.guard.next,
            back: self.guard.prev,
            len: self.len(),
        }
    }

    /// 遍历当前的key值
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// 遍历当前的value值
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    fn links(&self, idx: usize) -> Links {
        if idx == GUARD {
            self.guard
        } else {
            self.entries[idx].links
        }
    }

    fn links_mut(&mut self, idx: usize) -> &mut Links {
        if idx == GUARD {
            &mut self.guard
        } else {
            &mut self.entries[idx].links
        }
    }

    /// 从队列中节点剥离
    fn detach(&mut self, idx: usize) {
        let Links { prev, next } = self.links(idx);
        self.links_mut(prev).next = next;
        self.links_mut(next).prev = prev;
    }

    /// 加到队列头部
    fn attach(&mut self, idx: usize) {
        let first = self.guard.next;
        *self.links_mut(idx) = Links {
            prev: GUARD,
            next: first,
        };
        self.links_mut(first).prev = idx;
        self.guard.next = idx;
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.guard.next == idx {
            return;
        }
        self.detach(idx);
        self.attach(idx);
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    fn find_index<Q>(&self, hash: u64, k: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .find(hash, |&idx| Q::eq(k, self.entries[idx].key.borrow()))
            .copied()
    }

    /// 同时从索引表和链表中移除节点
    fn unlink(&mut self, hash: u64, idx: usize) -> (K, V) {
        match self.index.find_entry(hash, |&i| i == idx) {
            Ok(slot) => {
                slot.remove();
            }
            Err(_) => debug_assert!(false, "lru index lost slot {}", idx),
        }
        self.detach(idx);
        let LruEntry { key, val, .. } = self.entries.remove(idx);
        (key, val)
    }

    fn unlink_slot(&mut self, idx: usize) -> (K, V) {
        let hash = self.hash_builder.hash_one(&self.entries[idx].key);
        self.unlink(hash, idx)
    }

    /// 获取key值相对应的value值, 并将其标记为最近使用
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm");
    ///     lru.put("this", "lru");
    ///     assert!(lru.get(&"this") == Some(&"lru"));
    ///     assert!(lru.get(&"that") == None);
    /// }
    /// ```
    pub fn get<Q>(&mut self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(k);
        let idx = self.find_index(hash, k)?;
        self.move_to_head(idx);
        Some(&self.entries[idx].val)
    }

    /// 获取key值相对应的value值, 可编辑被改变, 同样标记为最近使用
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm".to_string());
    ///     lru.put("this", "lru".to_string());
    ///     lru.get_mut(&"this").unwrap().insert_str(3, " good");
    ///     assert_eq!(lru.get(&"this"), Some(&"lru good".to_string()));
    /// }
    /// ```
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(k);
        let idx = self.find_index(hash, k)?;
        self.move_to_head(idx);
        Some(&mut self.entries[idx].val)
    }

    /// 查看key值对应的value值, 不改变访问顺序
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(2);
    ///     lru.put(1, "a");
    ///     lru.put(2, "b");
    ///     assert_eq!(lru.peek(&1), Some(&"a"));
    ///     lru.put(3, "c");
    ///     assert_eq!(lru.peek(&1), None);
    /// }
    /// ```
    pub fn peek<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(k);
        self.find_index(hash, k).map(|idx| &self.entries[idx].val)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(k);
        self.find_index(hash, k).is_some()
    }

    /// 插入值, 已存在则原地覆盖, 超出容量时淘汰最久未使用的数据
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(2);
    ///     lru.put(1, 10);
    ///     lru.put(2, 20);
    ///     assert_eq!(lru.get(&1), Some(&10));
    ///     lru.put(3, 30);
    ///     assert_eq!(lru.get(&2), None);
    ///     assert_eq!(lru.get(&3), Some(&30));
    /// }
    /// ```
    pub fn put(&mut self, k: K, v: V) {
        self.capture_put(k, v);
    }

    /// 同put, 返回因本次插入而被淘汰的数据
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(2);
    ///     assert_eq!(lru.capture_put("hello", "algorithm"), None);
    ///     assert_eq!(lru.capture_put("this", "lru"), None);
    ///     assert_eq!(lru.capture_put("this", "lru good"), None);
    ///     assert_eq!(lru.capture_put("auth", "tickbh"), Some(("hello", "algorithm")));
    /// }
    /// ```
    pub fn capture_put(&mut self, k: K, v: V) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(&k);
        if let Some(idx) = self.find_index(hash, &k) {
            self.entries[idx].val = v;
            self.move_to_head(idx);
            return None;
        }

        let idx = self.entries.insert(LruEntry {
            key: k,
            val: v,
            links: Links::guard(),
        });
        let entries = &self.entries;
        let hash_builder = &self.hash_builder;
        self.index
            .insert_unique(hash, idx, |&i| hash_builder.hash_one(&entries[i].key));
        self.attach(idx);

        if self.len() > self.cap {
            let tail = self.guard.prev;
            trace!("lru over capacity {}, evict slot {}", self.cap, tail);
            Some(self.unlink_slot(tail))
        } else {
            None
        }
    }

    /// 移除元素
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm");
    ///     lru.put("this", "lru");
    ///     assert!(lru.remove("this") == Some(("this", "lru")));
    ///     assert!(lru.len() == 1);
    /// }
    /// ```
    pub fn remove<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(k);
        let idx = self.find_index(hash, k)?;
        Some(self.unlink(hash, idx))
    }

    /// 弹出栈顶上的数据, 最近使用的数据
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm");
    ///     lru.put("this", "lru");
    ///     assert!(lru.pop() == Some(("this", "lru")));
    ///     assert!(lru.len() == 1);
    /// }
    /// ```
    pub fn pop(&mut self) -> Option<(K, V)> {
        let head = self.guard.next;
        if head == GUARD {
            return None;
        }
        Some(self.unlink_slot(head))
    }

    /// 弹出栈尾上的数据, 最久未使用的数据
    ///
    /// ```
    /// use arena_lru::LruCache;
    /// fn main() {
    ///     let mut lru = LruCache::new(3);
    ///     lru.put("hello", "algorithm");
    ///     lru.put("this", "lru");
    ///     assert!(lru.pop_last() == Some(("hello", "algorithm")));
    ///     assert!(lru.len() == 1);
    /// }
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let tail = self.guard.prev;
        if tail == GUARD {
            return None;
        }
        Some(self.unlink_slot(tail))
    }
}

impl<K: Debug, V: Debug, S> Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

pub struct Iter<'a, K, V> {
    entries: &'a Slab<LruEntry<K, V>>,
    front: usize,
    back: usize,
    len: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            entries: self.entries,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let entries = self.entries;
        let entry = &entries[self.front];
        self.front = entry.links.next;
        self.len -= 1;
        Some((&entry.key, &entry.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let entries = self.entries;
        let entry = &entries[self.back];
        self.back = entry.links.prev;
        self.len -= 1;
        Some((&entry.key, &entry.val))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
