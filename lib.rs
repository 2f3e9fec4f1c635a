/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Spatial bookmark graph editor.
//!
//! Imports a browser bookmark export into a folder tree with 2D layout,
//! edits it through undoable intents and exports the visible part back.

pub mod app;
pub mod input;
pub mod layout;
pub mod model;
pub mod prefs;
pub mod services;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
