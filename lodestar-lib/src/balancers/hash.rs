// SPDX-FileCopyrightText: © 2025 Huawei Cloud Computing Technologies Co., Ltd
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Huawei Cloud Computing Technologies Co., Ltd
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use parking_lot::Mutex;

use super::{check_key, collect_targets, BalancerError, KeyedBalancer, Result};
use crate::thread_local::{LocalBuilder, LocalPool};

/// A resettable 32 bit streaming hash.
pub trait Hash32 {
    fn write(&mut self, bytes: &[u8]);
    fn sum32(&self) -> u32;
    fn reset(&mut self);
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32 bit FNV-1a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a32 {
    state: u32,
}

impl Fnv1a32 {
    pub const fn new() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash32 for Fnv1a32 {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= u32::from(*byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    fn sum32(&self) -> u32 {
        self.state
    }

    fn reset(&mut self) {
        self.state = FNV_OFFSET_BASIS;
    }
}

impl Hash32 for crc32fast::Hasher {
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    fn sum32(&self) -> u32 {
        self.clone().finalize()
    }

    fn reset(&mut self) {
        crc32fast::Hasher::reset(self);
    }
}

/// Per-thread hashers shared by any number of [HashBalancer]s.
pub type HasherPool<H, B = fn() -> H> = LocalPool<H, B>;

enum HasherSource<H, B>
where
    H: Send,
    B: LocalBuilder<H>,
{
    Pooled(Arc<HasherPool<H, B>>),
    Shared(Mutex<H>),
}

/// Maps a partition key to a target with a pluggable [Hash32]:
///
/// ```text
/// offset = (sum32(key) as i32) % (targets as i32)
/// if offset < 0 { offset = -offset }
/// ```
///
/// The signed fold is kept so that producers agree on the placement of every key with other
/// clients using the same scheme. It is not the same as `sum32 % targets`.
///
/// Hashers come either from a [HasherPool], so callers on different threads never contend,
/// or from a single instance guarded by a lock when built with [HashBalancer::with_hasher].
pub struct HashBalancer<E, H = Fnv1a32, B = fn() -> H>
where
    H: Hash32 + Send,
    B: LocalBuilder<H>,
{
    items: Vec<Arc<E>>,
    len: i32,
    hasher: HasherSource<H, B>,
}

impl<E> HashBalancer<E> {
    /// FNV-1a balancer with a pool of its own.
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        Self::with_pool(targets, Arc::new(HasherPool::new(Fnv1a32::new as fn() -> Fnv1a32)))
    }
}

impl<E, H> HashBalancer<E, H>
where
    H: Hash32 + Send,
{
    /// Uses `hasher` for every key, one caller at a time.
    pub fn with_hasher(targets: impl IntoIterator<Item = Arc<E>>, hasher: H) -> Result<Self> {
        Self::build(targets, HasherSource::Shared(Mutex::new(hasher)))
    }
}

impl<E, H, B> HashBalancer<E, H, B>
where
    H: Hash32 + Send,
    B: LocalBuilder<H>,
{
    pub fn with_pool(targets: impl IntoIterator<Item = Arc<E>>, pool: Arc<HasherPool<H, B>>) -> Result<Self> {
        Self::build(targets, HasherSource::Pooled(pool))
    }

    fn build(targets: impl IntoIterator<Item = Arc<E>>, hasher: HasherSource<H, B>) -> Result<Self> {
        let items = collect_targets("hash", targets)?;
        let len = i32::try_from(items.len()).map_err(|_| {
            tracing::warn!("Hash balancer can't address {} targets", items.len());
            BalancerError::TooManyTargets { len: items.len() }
        })?;
        Ok(Self { items, len, hasher })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }

    fn hash(&self, key: &[u8]) -> u32 {
        fn sum(hasher: &mut impl Hash32, key: &[u8]) -> u32 {
            hasher.reset();
            hasher.write(key);
            hasher.sum32()
        }
        match &self.hasher {
            HasherSource::Pooled(pool) => sum(&mut *pool.checkout(), key),
            HasherSource::Shared(hasher) => sum(&mut *hasher.lock(), key),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn offset(&self, sum: u32) -> usize {
        (sum as i32 % self.len).unsigned_abs() as usize
    }
}

impl<E, H, B> KeyedBalancer<E> for HashBalancer<E, H, B>
where
    H: Hash32 + Send,
    B: LocalBuilder<H>,
{
    fn next_item_for_key(&self, key: &[u8]) -> Result<Arc<E>> {
        check_key(key)?;
        let offset = self.offset(self.hash(key));
        Ok(Arc::clone(&self.items[offset]))
    }
}

impl<E: Debug, H, B> Debug for HashBalancer<E, H, B>
where
    H: Hash32 + Send,
    B: LocalBuilder<H>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hasher = match self.hasher {
            HasherSource::Pooled(_) => "pooled",
            HasherSource::Shared(_) => "shared",
        };
        f.debug_struct("HashBalancer").field("items", &self.items).field("hasher", &hasher).finish()
    }
}
