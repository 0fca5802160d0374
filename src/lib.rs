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

mod cache;

pub use cache::{CacheError, Iter, Keys, LruCache, Slab, Values};

#[cfg(feature = "hashbrown")]
extern crate hashbrown;

#[cfg(feature = "hashbrown")]
pub use hashbrown::{HashMap, HashSet};
#[cfg(not(feature = "hashbrown"))]
pub use std::collections::{HashMap, HashSet};

#[cfg(feature = "hashbrown")]
pub type DefaultHasher = hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
pub type DefaultHasher = std::collections::hash_map::RandomState;
