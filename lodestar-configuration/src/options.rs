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

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

const DEFAULT_REQUESTS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(999);

#[derive(Parser, Debug, Clone)]
#[command(name = "lodestar-sim", about = "Drive a configured balancer and report how selections were spread")]
pub struct Options {
    #[arg(help = "Configuration file", short = 'c', long = "config")]
    pub config: PathBuf,
    #[arg(help = "Number of selections to simulate", short = 'n', long = "requests", default_value_t = DEFAULT_REQUESTS)]
    pub requests: NonZeroUsize,
    #[arg(help = "Number of threads sharing the balancer", short = 't', long = "threads", default_value_t = NonZeroUsize::MIN)]
    pub threads: NonZeroUsize,
    #[arg(help = "Prefix of the generated partition keys", long = "key-prefix", default_value = "key-")]
    pub key_prefix: String,
    #[arg(help = "Cost charged for every selection by the least cost policy", long = "cost", default_value_t = 1)]
    pub cost: u64,
}

impl Options {
    pub fn parse_options() -> Self {
        Options::parse()
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: path.into(),
            requests: DEFAULT_REQUESTS,
            threads: NonZeroUsize::MIN,
            key_prefix: "key-".into(),
            cost: 1,
        }
    }
}
