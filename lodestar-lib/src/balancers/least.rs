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

use super::{collect_targets, CostBalancer, Result};

/// Picks the target with the lowest accumulated cost and charges it the cost of the call.
/// Ties go to the target that comes first in the list.
#[derive(Debug)]
pub struct LeastCostBalancer<E> {
    items: Vec<Arc<E>>,
    costs: Mutex<Vec<u64>>,
}

impl<E> LeastCostBalancer<E> {
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        let items = collect_targets("least cost", targets)?;
        let costs = Mutex::new(vec![0; items.len()]);
        Ok(Self { items, costs })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }

    /// Accumulated cost per target, in target order.
    pub fn costs(&self) -> Vec<u64> {
        self.costs.lock().clone()
    }
}

impl<E> CostBalancer<E> for LeastCostBalancer<E> {
    fn next_item_with_cost(&self, cost: u64) -> Arc<E> {
        let mut costs = self.costs.lock();
        // min_by_key keeps the first of equal elements
        let index = costs.iter().enumerate().min_by_key(|(_, total)| **total).map_or(0, |(index, _)| index);
        costs[index] = costs[index].saturating_add(cost);
        Arc::clone(&self.items[index])
    }
}
