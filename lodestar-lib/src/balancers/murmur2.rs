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

use std::sync::Arc;

use super::{check_key, collect_targets, KeyedBalancer, Result};

const SEED: u32 = 0x9747_b28c;
const M: u32 = 0x5bd1_e995;
const R: u32 = 24;

/// 32 bit Murmur2 as used by the Kafka default partitioner.
#[allow(clippy::cast_possible_wrap)]
pub fn murmur2(data: &[u8]) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let mut h = SEED ^ data.len() as u32;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = blocks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if let Some(first) = tail.first() {
        h ^= u32::from(*first);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h as i32
}

/// Kafka compatible key placement: `(murmur2(key) & 0x7fffffff) % targets`.
///
/// A producer using this balancer writes every key to the same partition as the Java client.
#[derive(Debug)]
pub struct Murmur2Balancer<E> {
    items: Vec<Arc<E>>,
}

impl<E> Murmur2Balancer<E> {
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        Ok(Self { items: collect_targets("murmur2", targets)? })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }
}

impl<E> KeyedBalancer<E> for Murmur2Balancer<E> {
    #[allow(clippy::cast_sign_loss)]
    fn next_item_for_key(&self, key: &[u8]) -> Result<Arc<E>> {
        check_key(key)?;
        let positive = (murmur2(key) & 0x7fff_ffff) as usize;
        Ok(Arc::clone(&self.items[positive % self.items.len()]))
    }
}
