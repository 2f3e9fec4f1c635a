/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command-line host for the bookmark graph editor.
//!
//! Every command opens the local store, loads the saved session, applies its
//! change and saves again.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use bookmark_graph::app::{EditorIntent, EditorSession, NoticeLevel};
use bookmark_graph::model::graph::{NodeId, NodeStore};
use bookmark_graph::prefs::EditorPreferences;
use bookmark_graph::services::persistence::EditorStore;
use bpaf::Bpaf;
use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Spatial bookmark graph editor
struct Cli {
    /// Preferences file (TOML)
    #[bpaf(long, argument("PATH"))]
    config: Option<PathBuf>,
    /// Directory holding the saved graph
    #[bpaf(long("data-dir"), argument("PATH"))]
    data_dir: Option<PathBuf>,
    #[bpaf(external(command))]
    command: Command,
}

#[derive(Debug, Clone, Bpaf)]
enum Command {
    /// Import a bookmark file, replacing the saved graph
    #[bpaf(command)]
    Import {
        #[bpaf(positional("FILE"))]
        file: PathBuf,
    },
    /// Export the visible bookmarks
    #[bpaf(command)]
    Export {
        /// Write to FILE instead of stdout
        #[bpaf(long, short, argument("FILE"))]
        out: Option<PathBuf>,
    },
    /// Re-run automatic layout
    #[bpaf(command)]
    Layout,
    /// Print the folder tree
    #[bpaf(command)]
    Tree,
    /// List nodes matching QUERY
    #[bpaf(command)]
    Search {
        #[bpaf(positional("QUERY"))]
        query: String,
    },
    /// Delete the saved graph
    #[bpaf(command)]
    Clear {
        /// Confirm the deletion
        yes: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = cli().run();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let prefs = EditorPreferences::load_or_default(cli.config.as_deref());
    let data_dir = cli
        .data_dir
        .or_else(|| prefs.resolved_data_dir())
        .ok_or("no data directory available; pass --data-dir")?;
    let mut store = EditorStore::open(&data_dir)?;
    let mut session = EditorSession::from_prefs(&prefs);
    session.load(&store);
    info!("bookmark-graph {} using {}", bookmark_graph::VERSION, store.path().display());

    let save = match cli.command {
        Command::Import { file } => {
            session.import_file(&file).await > 0
        },
        Command::Export { out } => {
            let document = session.export_visible();
            match out {
                Some(path) => tokio::fs::write(&path, document).await?,
                None => print!("{document}"),
            }
            false
        },
        Command::Layout => session.auto_layout(),
        Command::Tree => {
            print_tree(session.store(), &HashSet::new());
            false
        },
        Command::Search { query } => {
            session.apply_intent(EditorIntent::SetSearchQuery { query });
            let matches = session.view().search_matches(session.store());
            print_tree(session.store(), &matches);
            false
        },
        Command::Clear { yes } => {
            if !yes {
                warn!("Refusing to clear without --yes");
                return Err("pass --yes to delete the saved graph".into());
            }
            session.request_clear();
            session.confirm_clear(&mut store);
            false
        },
    };

    if save {
        session.save(&mut store);
    }

    let mut failed = false;
    for notice in session.take_notices() {
        match notice.level {
            NoticeLevel::Info => info!("{}", notice.message),
            NoticeLevel::Warning => warn!("{}", notice.message),
            NoticeLevel::Error => {
                error!("{}", notice.message);
                failed = true;
            },
        }
    }
    if failed {
        return Err("command finished with errors".into());
    }
    Ok(())
}

/// Print the tree; with a non-empty `only` set, just those nodes.
fn print_tree(store: &NodeStore, only: &HashSet<NodeId>) {
    fn walk(store: &NodeStore, id: NodeId, depth: usize, only: &HashSet<NodeId>) {
        let Some(node) = store.get(id) else {
            return;
        };
        if only.is_empty() || only.contains(&id) {
            let indent = "  ".repeat(depth);
            match (&node.url, node.page_index) {
                (Some(url), Some(page)) if page > 0 => {
                    println!("{indent}{} <{url}> (page {})", node.label, page + 1)
                },
                (Some(url), _) => println!("{indent}{} <{url}>", node.label),
                (None, _) => println!("{indent}{}/", node.label),
            }
        }
        for child in store.children(id) {
            walk(store, child.id, depth + 1, only);
        }
    }

    for root in store.roots() {
        walk(store, root.id, 0, only);
    }
}
