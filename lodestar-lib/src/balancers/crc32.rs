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

/// `crc32(key) % targets` with the IEEE polynomial, read as an unsigned value.
///
/// Adding or removing a target remaps most keys.
#[derive(Debug)]
pub struct Crc32Balancer<E> {
    items: Vec<Arc<E>>,
}

impl<E> Crc32Balancer<E> {
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        Ok(Self { items: collect_targets("crc32", targets)? })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }
}

impl<E> KeyedBalancer<E> for Crc32Balancer<E> {
    fn next_item_for_key(&self, key: &[u8]) -> Result<Arc<E>> {
        check_key(key)?;
        let offset = crc32fast::hash(key) as usize % self.items.len();
        Ok(Arc::clone(&self.items[offset]))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::balancers::{
        test_support::{numbered_keys, partitions, Partition},
        BalancerError, KeyedBalancer,
    };

    use super::Crc32Balancer;

    fn select_all(balancer: &Crc32Balancer<Partition>, keys: usize) -> Vec<usize> {
        numbered_keys(keys).map(|key| balancer.next_item_for_key(key.as_bytes()).unwrap().0).collect()
    }

    #[test]
    pub fn test_crc32_numbered_keys() {
        let balancer = Crc32Balancer::new(partitions(6)).unwrap();
        assert_eq!(select_all(&balancer, 12), vec![5, 5, 1, 1, 4, 4, 4, 0, 5, 3, 3, 3]);
    }

    #[test]
    pub fn test_crc32_deterministic() {
        let targets = partitions(5);
        let first = Crc32Balancer::new(targets.clone()).unwrap();
        let second = Crc32Balancer::new(targets).unwrap();
        assert_eq!(select_all(&first, 100), select_all(&second, 100));
        assert_eq!(select_all(&first, 100), select_all(&first, 100));
        // crc32("hello") = 907060870
        assert_eq!(first.next_item_for_key(b"hello").unwrap().0, 0);
    }

    #[test]
    pub fn test_crc32_resizing_remaps_most_keys() {
        let six = select_all(&Crc32Balancer::new(partitions(6)).unwrap(), 1000);
        let seven = select_all(&Crc32Balancer::new(partitions(7)).unwrap(), 1000);
        let moved = six.iter().zip(&seven).filter(|(a, b)| a != b).count();
        assert_eq!(moved, 873);
    }

    #[test]
    pub fn test_crc32_identity() {
        let targets = partitions(3);
        let balancer = Crc32Balancer::new(targets.clone()).unwrap();
        let item = balancer.next_item_for_key(b"0").unwrap();
        assert!(Arc::ptr_eq(&item, &targets[2]));
    }

    #[test]
    pub fn test_crc32_rejects_bad_input() {
        assert_eq!(Crc32Balancer::<Partition>::new([]).unwrap_err(), BalancerError::NoTargets);
        let balancer = Crc32Balancer::new(partitions(3)).unwrap();
        assert_eq!(balancer.next_item_for_key(b"").unwrap_err(), BalancerError::EmptyKey);
    }
}
