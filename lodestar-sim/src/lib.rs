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

use std::path::PathBuf;

use lodestar_configuration::{config::Config, options::Options, GenericError};
use lodestar_lib::{BalancerError, ConfiguredBalancer};

mod sim_tracing;
mod simulation;

pub use simulation::{simulate, Report, Workload};

#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] GenericError),
    #[error(transparent)]
    Balancer(#[from] BalancerError),
    #[error("failed to install the log subscriber")]
    TracingInit(#[from] tracing_subscriber::util::TryInitError),
    #[error("failed to reload the log configuration")]
    TracingReload(#[from] tracing_subscriber::reload::Error),
    #[error("log file \"{}\" has no file name", .0.display())]
    LogFile(PathBuf),
    #[error("a simulation thread panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, SimError>;

pub fn run() -> Result<()> {
    let mut tracing_manager = sim_tracing::TracingManager::new()?;

    let options = Options::parse_options();
    let Config { logging, balancer } = Config::new(&options)?;

    tracing_manager.update(&logging)?;

    let balancer = ConfiguredBalancer::from_config(&balancer)?;
    let report = simulate(&balancer, &Workload::from(&options))?;
    print!("{report}");
    Ok(())
}
