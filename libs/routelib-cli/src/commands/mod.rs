// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod actions;
pub mod dot;
pub mod inspect;
pub mod schema;
pub mod simulate;
pub mod validate;
