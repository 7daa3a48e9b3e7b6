// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod rates;
pub mod ledger;
pub mod budget;
pub mod missions;
pub mod store;
pub mod utils;
pub mod log;
pub mod commands;
