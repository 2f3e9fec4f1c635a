/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor session state and the intent reducer.
//!
//! `EditorSession` owns the undoable node store plus all UI state (view
//! filter, pagination, selection, in-flight gestures). Hosts feed it
//! `EditorIntent`s and render `scene()`. Points carried by intents are in
//! world coordinates; use `ViewTransform::screen_to_world` first.

use euclid::default::{Point2D, Size2D, Vector2D};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

use crate::input::{
    self, DragState, FolderPages, KeyPress, ReparentClick, ReparentSelector, Selection,
};
use crate::layout::{self, LayoutMetrics, page_count};
use crate::model::graph::geometry::{AbsolutePositions, node_size};
use crate::model::graph::{NodeId, NodeKind, NodeStore};
use crate::model::view::{ViewFilterState, ViewTransform};
use crate::prefs::EditorPreferences;
use crate::services::bookmarks;
use crate::services::history::{DEFAULT_UNDO_LIMIT, History};
use crate::services::persistence::EditorStore;

/// Everything a host can ask the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorIntent {
    Undo,
    Redo,
    AutoLayout,
    ResetView,
    /// Escape: abort the drag, disarm reparenting, clear the selection.
    CancelGesture,
    DeleteSelected,
    DeleteNode {
        node: NodeId,
    },
    RenameNode {
        node: NodeId,
        label: String,
    },
    CreateFolder {
        label: String,
        at: Point2D<f32>,
        parent: Option<NodeId>,
    },
    SelectNode {
        node: NodeId,
        additive: bool,
    },
    ClearSelection,
    /// Double-click on a node.
    ActivateNode {
        node: NodeId,
    },
    BeginDrag {
        node: NodeId,
        pointer: Point2D<f32>,
    },
    DragTo {
        pointer: Point2D<f32>,
    },
    EndDrag,
    /// Click on a folder's reparent control.
    ReparentClick {
        folder: NodeId,
    },
    DetachFolder {
        folder: NodeId,
    },
    ToggleFolderActive {
        folder: NodeId,
    },
    SetFolderActive {
        folder: NodeId,
        active: bool,
    },
    ActivateAllFolders,
    ClearActiveFolders,
    SetSearchQuery {
        query: String,
    },
    NextPage {
        folder: NodeId,
    },
    PreviousPage {
        folder: NodeId,
    },
    NextPageOfPrimary,
    PreviousPageOfPrimary,
    Pan {
        delta: Vector2D<f32>,
    },
    Zoom {
        anchor: Point2D<f32>,
        factor: f32,
    },
}

/// Side effects the host has to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    OpenUrl(String),
    BeginRename(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing message queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// One renderable node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub url: Option<String>,
    pub absolute: Point2D<f32>,
    pub size: Size2D<f32>,
    pub dimmed: bool,
    /// Armed as reparent source.
    pub armed: bool,
    pub selected: bool,
    /// `(current, total)` pages for folders holding bookmarks.
    pub pages: Option<(usize, usize)>,
}

pub struct EditorSession {
    history: History<NodeStore>,
    view: ViewFilterState,
    pages: FolderPages,
    reparent: ReparentSelector,
    selection: Selection,
    drag: Option<DragState>,
    metrics: LayoutMetrics,
    notices: Vec<Notice>,
    pending_clear: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(LayoutMetrics::default(), DEFAULT_UNDO_LIMIT)
    }
}

impl EditorSession {
    pub fn new(metrics: LayoutMetrics, undo_limit: usize) -> Self {
        Self {
            history: History::with_limit(NodeStore::empty(), undo_limit),
            view: ViewFilterState::new(),
            pages: FolderPages::default(),
            reparent: ReparentSelector::default(),
            selection: Selection::default(),
            drag: None,
            metrics,
            notices: Vec::new(),
            pending_clear: false,
        }
    }

    pub fn from_prefs(prefs: &EditorPreferences) -> Self {
        Self::new(prefs.layout.clone(), prefs.undo_limit)
    }

    pub fn store(&self) -> &NodeStore {
        self.history.present()
    }

    pub fn history(&self) -> &History<NodeStore> {
        &self.history
    }

    pub fn view(&self) -> &ViewFilterState {
        &self.view
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn armed_folder(&self) -> Option<NodeId> {
        self.reparent.armed()
    }

    pub fn dragging(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn current_page(&self, folder: NodeId) -> usize {
        self.pages.current(folder)
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn apply_intents<I>(&mut self, intents: I) -> Vec<EditorEvent>
    where
        I: IntoIterator<Item = EditorIntent>,
    {
        intents
            .into_iter()
            .filter_map(|intent| self.apply_intent(intent))
            .collect()
    }

    /// Collect, convert and apply one frame of key presses.
    pub fn handle_keys(&mut self, presses: &[KeyPress], text_entry_active: bool) -> Vec<EditorEvent> {
        let actions = input::collect_actions(presses, text_entry_active);
        self.apply_intents(input::intents_from_actions(&actions))
    }

    pub fn apply_intent(&mut self, intent: EditorIntent) -> Option<EditorEvent> {
        match intent {
            EditorIntent::Undo => {
                self.undo();
            },
            EditorIntent::Redo => {
                self.redo();
            },
            EditorIntent::AutoLayout => {
                self.auto_layout();
            },
            EditorIntent::ResetView => self.view.transform = ViewTransform::identity(),
            EditorIntent::CancelGesture => {
                self.drag = None;
                self.reparent.cancel();
                self.selection.clear();
            },
            EditorIntent::DeleteSelected => {
                let ids: Vec<NodeId> = self.selection.iter().collect();
                self.commit(|store| input::delete_nodes(store, &ids));
            },
            EditorIntent::DeleteNode { node } => {
                self.commit(|store| input::delete_node(store, node));
            },
            EditorIntent::RenameNode { node, label } => {
                self.commit(|store| input::rename_node(store, node, &label));
            },
            EditorIntent::CreateFolder { label, at, parent } => {
                self.create_folder(&label, at, parent);
            },
            EditorIntent::SelectNode { node, additive } => {
                if self.store().contains(node) {
                    self.selection.click(node, additive);
                }
            },
            EditorIntent::ClearSelection => self.selection.clear(),
            EditorIntent::ActivateNode { node } => return self.activate_node(node),
            EditorIntent::BeginDrag { node, pointer } => {
                let positions = AbsolutePositions::compute(self.store());
                self.drag = DragState::start(&positions, node, pointer);
            },
            EditorIntent::DragTo { pointer } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.update(pointer);
                }
            },
            EditorIntent::EndDrag => self.end_drag(),
            EditorIntent::ReparentClick { folder } => self.reparent_click(folder),
            EditorIntent::DetachFolder { folder } => {
                self.commit(|store| input::detach_folder(store, folder));
            },
            EditorIntent::ToggleFolderActive { folder } => self.view.toggle_active(folder),
            EditorIntent::SetFolderActive { folder, active } => self.view.set_active(folder, active),
            EditorIntent::ActivateAllFolders => {
                let store = self.store().clone();
                self.view.activate_all(&store);
            },
            EditorIntent::ClearActiveFolders => self.view.clear_active(),
            EditorIntent::SetSearchQuery { query } => self.view.set_query(query),
            EditorIntent::NextPage { folder } => self.turn_page(folder, true),
            EditorIntent::PreviousPage { folder } => self.turn_page(folder, false),
            EditorIntent::NextPageOfPrimary => {
                if let Some(folder) = self.primary_folder() {
                    self.turn_page(folder, true);
                }
            },
            EditorIntent::PreviousPageOfPrimary => {
                if let Some(folder) = self.primary_folder() {
                    self.turn_page(folder, false);
                }
            },
            EditorIntent::Pan { delta } => self.view.transform.pan(delta),
            EditorIntent::Zoom { anchor, factor } => self.view.transform.zoom_about(anchor, factor),
        }
        None
    }

    /// Record one undoable store mutation and resync UI state.
    fn commit(&mut self, f: impl FnOnce(&NodeStore) -> Option<NodeStore>) -> bool {
        let changed = self.history.mutate(f);
        if changed {
            debug!(
                "Store mutated: {} nodes, undo depth {}",
                self.store().len(),
                self.history.undo_depth()
            );
            self.sync_ui_state();
        }
        changed
    }

    /// Drop UI references to nodes that no longer exist.
    fn sync_ui_state(&mut self) {
        let store = self.history.present().clone();
        self.pages.clamp_all(&store, &self.metrics);
        self.view.prune(&store);
        self.selection.prune(&store);
        if self.reparent.armed().is_some_and(|id| !store.contains(id)) {
            self.reparent.cancel();
        }
        if self.drag.is_some_and(|d| !store.contains(d.node())) {
            self.drag = None;
        }
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            self.sync_ui_state();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            self.sync_ui_state();
        }
        changed
    }

    /// Re-run layout as one undo step and reset pan/zoom.
    pub fn auto_layout(&mut self) -> bool {
        let metrics = self.metrics.clone();
        let changed = self.commit(|store| layout::auto_layout(store, &metrics));
        self.view.transform = ViewTransform::identity();
        changed
    }

    /// Replace the store with the bookmarks in `document`, laid out.
    ///
    /// Undoable. Returns the number of imported nodes; a document with no
    /// bookmark list imports nothing and queues a warning.
    pub fn import_document(&mut self, document: &str) -> usize {
        let nodes = bookmarks::decode(document);
        if nodes.is_empty() {
            self.notify(NoticeLevel::Warning, "No bookmarks found in the import document");
            return 0;
        }
        let count = nodes.len();
        let imported = layout::layout(&NodeStore::new(nodes), &self.metrics);
        self.history.mutate(move |_| Some(imported));

        self.pages.reset();
        self.selection.clear();
        self.reparent.cancel();
        self.drag = None;
        self.view.transform = ViewTransform::identity();
        let store = self.store().clone();
        self.view.activate_all(&store);

        info!("Imported {count} bookmark nodes");
        self.notify(NoticeLevel::Info, format!("Imported {count} nodes"));
        count
    }

    /// Read `path` and import it. Read failures queue an error notice.
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(document) => self.import_document(&document),
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                self.notify(NoticeLevel::Error, format!("Could not read {}: {e}", path.display()));
                0
            },
        }
    }

    /// Bookmark document of the currently visible nodes.
    pub fn export_visible(&self) -> String {
        let flagged = self.view.with_hidden_flags(self.store());
        let nodes: Vec<_> = flagged.iter().filter(|n| !n.hidden).cloned().collect();
        bookmarks::encode(&nodes)
    }

    /// Nodes to render, in store order.
    ///
    /// Bookmarks inside a folder are only listed while their page is the
    /// folder's current page; bookmarks without a page index always are.
    pub fn scene(&self) -> Vec<SceneNode> {
        let store = self.store();
        let positions = AbsolutePositions::compute(store);
        let visible = self.view.visible_nodes(store);
        let dimmed = self.view.dimmed_nodes(store);
        let armed = self.reparent.armed();

        store
            .iter()
            .filter(|n| visible.contains(&n.id))
            .filter(|n| match (n.kind, n.parent_id, n.page_index) {
                (NodeKind::Bookmark, Some(parent), Some(page)) => self.pages.current(parent) == page,
                _ => true,
            })
            .filter_map(|n| {
                let absolute = positions.get(n.id)?;
                let pages = (n.is_folder() && store.bookmark_children(n.id).next().is_some())
                    .then(|| (self.pages.current(n.id), page_count(store, &self.metrics, n.id)));
                Some(SceneNode {
                    id: n.id,
                    kind: n.kind,
                    label: n.label.clone(),
                    url: n.url.clone(),
                    absolute,
                    size: node_size(n, &self.metrics),
                    dimmed: dimmed.contains(&n.id),
                    armed: armed == Some(n.id),
                    selected: self.selection.contains(n.id),
                    pages,
                })
            })
            .collect()
    }

    fn create_folder(&mut self, label: &str, at: Point2D<f32>, parent: Option<NodeId>) {
        let label = label.trim();
        let label = if label.is_empty() { "New folder" } else { label };
        let mut created = None;
        self.commit(|store| {
            let (next, id) = input::create_folder(store, label, at, parent);
            created = Some(id);
            Some(next)
        });
        if let Some(id) = created {
            self.view.set_active(id, true);
            self.selection.click(id, false);
        }
    }

    fn activate_node(&mut self, node: NodeId) -> Option<EditorEvent> {
        let node = self.store().get(node)?;
        match node.kind {
            NodeKind::Bookmark => node.url.clone().map(EditorEvent::OpenUrl),
            NodeKind::Folder => Some(EditorEvent::BeginRename(node.id)),
        }
    }

    fn end_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let (node, drop_at) = drag.finish();
        let visible: HashSet<NodeId> = self.view.visible_nodes(self.store());
        let metrics = self.metrics.clone();
        self.commit(|store| {
            input::drop_node(store, &metrics, node, drop_at, |folder| visible.contains(&folder.id))
        });
    }

    fn reparent_click(&mut self, folder: NodeId) {
        if !self.store().get(folder).is_some_and(|n| n.is_folder()) {
            return;
        }
        match self.reparent.click(folder) {
            ReparentClick::Armed(id) => debug!("Armed folder {id} for reparenting"),
            ReparentClick::Disarmed => debug!("Disarmed folder {folder}"),
            ReparentClick::Commit { source, target } => {
                if !self.commit(|store| input::reparent_folder(store, source, target)) {
                    self.notify(
                        NoticeLevel::Warning,
                        "A folder cannot be moved into itself or one of its subfolders",
                    );
                }
            },
        }
    }

    fn turn_page(&mut self, folder: NodeId, forward: bool) {
        if !self.store().get(folder).is_some_and(|n| n.is_folder()) {
            return;
        }
        let total = page_count(self.store(), &self.metrics, folder);
        if forward {
            self.pages.next(folder, total);
        } else {
            self.pages.previous(folder, total);
        }
    }

    /// Primary selection if it is a folder, else its parent folder.
    fn primary_folder(&self) -> Option<NodeId> {
        let node = self.store().get(self.selection.primary()?)?;
        if node.is_folder() { Some(node.id) } else { node.parent_id }
    }

    /// Write nodes and view transform. Failures queue a notice.
    pub fn save(&mut self, store: &mut EditorStore) -> bool {
        let result = store
            .save_nodes(self.history.present())
            .and_then(|()| store.save_view(&self.view.transform));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save editor state: {e}");
                self.notify(NoticeLevel::Error, format!("Save failed: {e}"));
                false
            },
        }
    }

    /// Replace the session with persisted state. Not undoable.
    ///
    /// Returns whether a node snapshot was found.
    pub fn load(&mut self, store: &EditorStore) -> bool {
        let nodes = match store.load_nodes() {
            Ok(Some(nodes)) => nodes,
            Ok(None) => {
                info!("No persisted bookmark graph");
                return false;
            },
            Err(e) => {
                warn!("Failed to load editor state: {e}");
                self.notify(NoticeLevel::Error, format!("Load failed: {e}"));
                return false;
            },
        };
        info!("Loaded {} persisted nodes", nodes.len());
        self.history.reset(nodes);
        self.pages.reset();
        self.selection.clear();
        self.reparent.cancel();
        self.drag = None;
        let present = self.store().clone();
        self.view.activate_all(&present);

        match store.load_view() {
            Ok(transform) => self.view.transform = transform.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable view transform: {e}");
                self.view.transform = ViewTransform::identity();
            },
        }
        true
    }

    /// First step of clearing persisted state.
    pub fn request_clear(&mut self) {
        self.pending_clear = true;
    }

    pub fn cancel_clear(&mut self) {
        self.pending_clear = false;
    }

    pub fn clear_pending(&self) -> bool {
        self.pending_clear
    }

    /// Delete persisted state and start over with an empty store.
    ///
    /// Refused unless `request_clear` came first.
    pub fn confirm_clear(&mut self, store: &mut EditorStore) -> bool {
        if !std::mem::take(&mut self.pending_clear) {
            self.notify(NoticeLevel::Warning, "Clear was not requested");
            return false;
        }
        if let Err(e) = store.clear_all() {
            warn!("Failed to clear persisted state: {e}");
            self.notify(NoticeLevel::Error, format!("Clear failed: {e}"));
            return false;
        }
        self.history.reset(NodeStore::empty());
        self.view = ViewFilterState::new();
        self.pages.reset();
        self.selection.clear();
        self.reparent.cancel();
        self.drag = None;
        self.notify(NoticeLevel::Info, "Cleared saved bookmarks");
        true
    }
}
