// bench.rs
#![feature(test)]

extern crate test;

use std::collections::hash_map::RandomState;

use arena_lru::LruCache;
use test::Bencher;

static BENCH_SIZE: usize = 10000;

macro_rules! do_test_bench {
    ($cache: expr) => {
        for i in 0..BENCH_SIZE {
            $cache.put(i, i);
            $cache.get(&i);
        }
    };
}

#[bench]
fn calc_lru(b: &mut Bencher) {
    b.iter(|| {
        let mut lru = LruCache::new(BENCH_SIZE / 2);
        do_test_bench!(lru);
    })
}

#[bench]
fn calc_lru_std_hasher(b: &mut Bencher) {
    b.iter(|| {
        let mut lru = LruCache::with_hasher(BENCH_SIZE / 2, RandomState::new());
        do_test_bench!(lru);
    })
}

#[bench]
fn calc_lru_hit(b: &mut Bencher) {
    let mut lru = LruCache::new(BENCH_SIZE);
    for i in 0..BENCH_SIZE {
        lru.put(i, i);
    }
    b.iter(|| {
        for i in 0..BENCH_SIZE {
            test::black_box(lru.get(&i));
        }
    })
}
