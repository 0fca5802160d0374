use arena_lru::LruCache;

fn main() {
    let mut lru = LruCache::new(2);
    lru.put(1, 10);
    lru.put(2, 20);
    assert_eq!(lru.get(&1), Some(&10));
    lru.put(3, 30);
    assert_eq!(lru.get(&2), None);
    assert_eq!(lru.get(&3), Some(&30));
    println!("{:?}", lru);
}
