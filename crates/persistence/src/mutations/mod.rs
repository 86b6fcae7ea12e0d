// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side database access.
//!
//! Mutations that touch more than one table run inside a single
//! transaction and record their audit event in it.

pub mod audit;
pub mod locations;
pub mod rentals;
pub mod users;
pub mod vehicles;
