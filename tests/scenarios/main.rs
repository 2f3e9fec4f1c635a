/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::VERSION;

mod harness;

mod drop_targets;
mod import_export;
mod layout;
mod persistence;
mod undo_redo;
mod visibility;

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}
