// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side database access.
//!
//! Every function here is generated for both backends by `backend_fn!`
//! and dispatched from the `Persistence` adapter.

pub mod audit;
pub mod locations;
pub mod rentals;
pub mod users;
pub mod vehicles;
