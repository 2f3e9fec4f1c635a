/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::{Point2D, Size2D};
use serde::{Deserialize, Serialize};

/// Geometry constants shared by layout, hit testing and rendering.
///
/// Loaded from the `[layout]` table of the preferences file; every field
/// falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub folder_width: f32,
    pub folder_height: f32,
    pub bookmark_width: f32,
    pub bookmark_height: f32,
    /// Gap between cells of the root grid.
    pub node_gap: f32,
    pub root_columns: usize,
    pub folder_header_height: f32,
    pub folder_padding: f32,
    pub bookmark_columns: usize,
    pub bookmark_column_gap: f32,
    pub bookmark_row_gap: f32,
    /// Extra room added to the largest folder box when sizing tree slots.
    pub tree_padding: f32,
    pub tree_vertical_separation: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            folder_width: 360.0,
            folder_height: 260.0,
            bookmark_width: 100.0,
            bookmark_height: 36.0,
            node_gap: 40.0,
            root_columns: 4,
            folder_header_height: 40.0,
            folder_padding: 12.0,
            bookmark_columns: 3,
            bookmark_column_gap: 10.0,
            bookmark_row_gap: 8.0,
            tree_padding: 40.0,
            tree_vertical_separation: 60.0,
        }
    }
}

impl LayoutMetrics {
    pub fn folder_size(&self) -> Size2D<f32> {
        Size2D::new(self.folder_width, self.folder_height)
    }

    pub fn bookmark_size(&self) -> Size2D<f32> {
        Size2D::new(self.bookmark_width, self.bookmark_height)
    }

    /// Cell pitch of the root grid.
    pub fn root_pitch(&self) -> Size2D<f32> {
        Size2D::new(
            self.folder_width + self.node_gap,
            self.folder_height + self.node_gap,
        )
    }

    /// Bookmarks that fit on one page of a folder of `folder_size`.
    ///
    /// `None` when the interior below the header band is not positive.
    /// Otherwise floors at 1.
    pub fn page_capacity(&self, folder_size: Size2D<f32>) -> Option<usize> {
        let interior = folder_size.height - self.folder_header_height - 2.0 * self.folder_padding;
        if interior <= 0.0 {
            return None;
        }
        let row_pitch = self.bookmark_height + self.bookmark_row_gap;
        let rows = if row_pitch > 0.0 {
            (interior / row_pitch).floor() as usize
        } else {
            0
        };
        Some(rows.saturating_mul(self.bookmark_columns.max(1)).max(1))
    }

    /// Folder-relative origin of page slot `slot`.
    pub fn bookmark_slot(&self, slot: usize) -> Point2D<f32> {
        let columns = self.bookmark_columns.max(1);
        let (row, column) = (slot / columns, slot % columns);
        Point2D::new(
            self.folder_padding + column as f32 * (self.bookmark_width + self.bookmark_column_gap),
            self.folder_header_height
                + self.folder_padding
                + row as f32 * (self.bookmark_height + self.bookmark_row_gap),
        )
    }
}
