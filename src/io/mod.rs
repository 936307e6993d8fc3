// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading inputs: FoM result files and strategy tables. Every file is opened,
//! read in full and closed within a single call.

mod error;
mod find;
mod fom;
mod strategy_table;
#[cfg(test)]
mod tests;

pub use error::{LoadError, MissingInput};
pub use find::find_year_file;
pub use fom::{load_grid, load_year_grid};
pub use strategy_table::{load_strategy_table, strategy_table_path};
