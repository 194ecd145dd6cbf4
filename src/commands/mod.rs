// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod bills;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod reports;
pub mod transactions;

/// The owner id from the global --owner flag. Empty when absent; the
/// store rejects that with MissingOwner rather than guessing.
pub fn owner_of(m: &clap::ArgMatches) -> &str {
    m.get_one::<String>("owner").map(|s| s.as_str()).unwrap_or("")
}
