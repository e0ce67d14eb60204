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

use parking_lot::Mutex;

use super::{Balancer, BalancerError, Result};

#[derive(Clone, Debug)]
pub struct LbItem<E> {
    weight: u32,
    item: Arc<E>,
}

impl<E> LbItem<E> {
    pub fn new(weight: u32, item: Arc<E>) -> Self {
        Self { weight, item }
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn item(&self) -> &Arc<E> {
        &self.item
    }
}

#[derive(Debug)]
struct Cursor {
    current_weight: u32,
    current_offset: usize,
}

/// The weighted balancer walks a table sorted by descending weight, staying on each entry
/// for `weight / gcd` calls, where `gcd` is the greatest common divisor of all weights.
///
/// Over one cycle of `sum(weights) / gcd` calls every target is chosen exactly
/// `weight / gcd` times.
#[derive(Debug)]
pub struct WeightedBalancer<E> {
    items: Vec<LbItem<E>>,
    gcd: u32,
    cursor: Mutex<Cursor>,
}

impl<E> WeightedBalancer<E> {
    /// Pairs `targets[i]` with `weights[i]`.
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>, weights: impl IntoIterator<Item = u32>) -> Result<Self> {
        let targets: Vec<_> = targets.into_iter().collect();
        let weights: Vec<_> = weights.into_iter().collect();
        if targets.len() != weights.len() {
            tracing::warn!("Weighted balancer got {} targets and {} weights", targets.len(), weights.len());
            return Err(BalancerError::UnequalLength { targets: targets.len(), weights: weights.len() });
        }
        Self::from_items(targets.into_iter().zip(weights).map(|(item, weight)| LbItem::new(weight, item)))
    }

    pub fn from_items(items: impl IntoIterator<Item = LbItem<E>>) -> Result<Self> {
        let mut items = collect_checked(items)?;
        // stable, equal weights keep their construction order
        items.sort_by(|a, b| b.weight.cmp(&a.weight));
        let gcd = items.iter().map(LbItem::weight).fold(0, gcd);
        let cursor = Cursor { current_weight: items[0].weight, current_offset: 0 };
        tracing::debug!("Weighted balancer with {} targets, gcd {gcd}", items.len());
        Ok(Self { items, gcd, cursor: Mutex::new(cursor) })
    }

    /// Targets in selection order, heaviest first.
    pub fn targets(&self) -> impl Iterator<Item = &Arc<E>> {
        self.items.iter().map(LbItem::item)
    }

    pub fn items(&self) -> &[LbItem<E>] {
        &self.items
    }
}

/// Rejects empty sets and zero weights.
fn collect_checked<E>(items: impl IntoIterator<Item = LbItem<E>>) -> Result<Vec<LbItem<E>>> {
    let items: Vec<_> = items.into_iter().collect();
    if items.is_empty() {
        tracing::warn!("Refusing to build weighted balancer without targets");
        return Err(BalancerError::NoTargets);
    }
    if let Some(index) = items.iter().position(|item| item.weight == 0) {
        tracing::warn!("Weighted balancer target at index {index} has a zero weight");
        return Err(BalancerError::ZeroWeight { index });
    }
    Ok(items)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl<E> Balancer<E> for WeightedBalancer<E> {
    fn next_item(&self) -> Arc<E> {
        let mut cursor = self.cursor.lock();
        if cursor.current_weight > self.gcd {
            cursor.current_weight -= self.gcd;
        } else {
            cursor.current_offset = (cursor.current_offset + 1) % self.items.len();
            cursor.current_weight = self.items[cursor.current_offset].weight;
        }
        Arc::clone(&self.items[cursor.current_offset].item)
    }
}
