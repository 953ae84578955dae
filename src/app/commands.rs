use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use super::cli::Command;
use super::config::{AppConfig, PersistentState, UserConfig};
use super::session::{LoadOutcome, Session};
use super::state::GalleryStore;
use crate::api::GalleryApi;
use crate::error::GalleryError;
use crate::gallery::paths::{is_this_or_child_path, parse_location, rebase_path};
use crate::gallery::{
    AddedAlbum, Patch, RemovedAlbum, RemovedFile, UpdatedAlbum, UpdatedFile,
};
use crate::ui;

/// Run one command against the saved session and write the session back,
/// whether or not the command succeeded.
pub async fn run(
    command: Command,
    api_url: Option<String>,
    config: &AppConfig,
    user_config: &UserConfig,
    state: PersistentState,
) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(user_config.request_timeout_secs))
        .build()
        .context("building HTTP client")?;
    let api = GalleryApi::new(
        client,
        api_url.as_deref().unwrap_or(&user_config.api_url),
        user_config.auth_mode,
    );

    let mut store = GalleryStore::new();
    state.restore(&mut store);
    let token = state.token.clone();
    store.set_showing_properties("", None, &token);

    let mut session = Session::new(store, api, state);
    let result = execute(&mut session, command).await;

    let (store, mut state) = session.into_parts();
    state.capture(&store);
    state
        .save(&config.get_state_path())
        .context("saving session state")?;
    result
}

fn require_edit_mode(store: &GalleryStore) -> Result<()> {
    if !store.is_edit_mode_enabled {
        bail!("edit mode is off, run `gallery edit-mode on` first");
    }
    Ok(())
}

/// Stale references are reported, not fatal.
fn notice(result: Result<(), GalleryError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("{}", err);
            eprintln!("notice: {}", err);
            false
        }
    }
}

/// Path the backend knows for an album the queue may have renamed.
fn base_path(store: &GalleryStore, path: &str) -> String {
    store
        .changes
        .update
        .albums
        .iter()
        .filter(|update| update.new_path.is_set())
        .find(|update| is_this_or_child_path(path, update.effective_path()))
        .and_then(|update| rebase_path(path, update.effective_path(), &update.path))
        .unwrap_or_else(|| path.to_string())
}

/// Load the page at `path` so edits resolve against current data.
async fn open(session: &mut Session<PersistentState>, path: &str) {
    let token = session.store.token.clone();
    let path = base_path(&session.store, path);
    session.store.set_showing_properties(&path, None, &token);

    if session.load(false).await == LoadOutcome::Failed {
        eprintln!("could not load {:?}, editing against what is cached", path);
    }
}

async fn execute(session: &mut Session<PersistentState>, command: Command) -> Result<()> {
    match command {
        Command::Show { location, reload } => {
            let location = parse_location(&location);
            let token = if location.token.is_empty() {
                session.store.token.clone()
            } else {
                location.token
            };
            session
                .store
                .set_showing_properties(&location.current_path, location.date_ranges, &token);

            if reload || session.store.should_load() {
                match session.load(reload).await {
                    LoadOutcome::Loaded => {}
                    LoadOutcome::Skipped => info!("load already in flight"),
                    LoadOutcome::Failed => eprintln!("could not load {}", session.store.path_with_date_ranges()),
                }
            }
            print!("{}", ui::render_page(&session.store));
        }

        Command::Login { google_token } => {
            if !session.login(&google_token).await {
                bail!("login failed");
            }
            match &session.store.user {
                Some(user) => println!("signed in as {}", user.email),
                None => println!("signed in"),
            }
        }

        Command::Logout => {
            if !session.logout().await {
                bail!("logout failed");
            }
            println!("signed out");
        }

        Command::Pending => {
            if session.store.changes.is_empty() {
                println!("no pending changes");
            } else {
                let json = serde_json::to_string_pretty(&session.store.changes)
                    .context("serializing pending changes")?;
                println!("{}", json);
            }
        }

        Command::Discard => {
            let dropped = session.store.changes.len();
            session.store.reset_updated();
            println!("discarded {} pending changes", dropped);
        }

        Command::Commit => {
            let pending = session.store.changes.len();
            if !session.commit().await {
                bail!("commit failed, {} changes kept", pending);
            }
            println!("committed {} changes", pending);
        }

        Command::EditMode { state } => {
            session.store.switch_edit_mode(state.map(bool::from));
            println!(
                "edit mode {}",
                if session.store.is_edit_mode_enabled { "on" } else { "off" }
            );
        }

        Command::Select {
            filename,
            remove,
            clear,
        } => {
            if clear {
                session.store.remove_selected_file(None);
            } else if let Some(filename) = filename {
                if remove {
                    session.store.remove_selected_file(Some(&filename));
                } else {
                    session.store.add_selected_file(&filename);
                }
            }
            for filename in &session.store.selected_files {
                println!("{}", filename);
            }
        }

        Command::RemoveAlbum { path } => {
            require_edit_mode(&session.store)?;
            session.store.add_removed_album(RemovedAlbum { path });
            println!("{} pending changes", session.store.changes.len());
        }

        Command::RemoveFile { filename } => {
            require_edit_mode(&session.store)?;
            session.store.remove_selected_file(Some(&filename));
            session.store.add_removed_file(RemovedFile { filename });
            println!("{} pending changes", session.store.changes.len());
        }

        Command::AddAlbum {
            related,
            relation,
            path_part,
            title,
            text,
        } => {
            require_edit_mode(&session.store)?;
            let added = AddedAlbum {
                path_part,
                title,
                text,
                related_path: related,
                relation: relation.into(),
            };
            println!("adding {}", added.path());
            session.store.add_added_album(added);
        }

        Command::UpdateAlbum {
            path,
            new_path,
            title,
            text,
            order,
            accesses,
        } => {
            require_edit_mode(&session.store)?;
            open(session, &path).await;

            let patch = UpdatedAlbum {
                title: title.into(),
                text: text.into(),
                order: order.into(),
                accesses: accesses.into(),
                ..UpdatedAlbum::new(&path)
            };
            let mut applied = true;
            if patch.has_changes() {
                applied = notice(session.store.add_updated_album(patch));
            }
            if let Some(new_path) = new_path.filter(|_| applied) {
                notice(session.store.new_album_path(&path, &new_path));
            }
            println!("{} pending changes", session.store.changes.len());
        }

        Command::UpdateFile {
            filename,
            album,
            path,
            description,
            text,
            accesses,
        } => {
            require_edit_mode(&session.store)?;
            open(session, &album).await;

            notice(session.store.add_updated_file(UpdatedFile {
                path: Patch::from(path),
                description: description.into(),
                text: text.into(),
                accesses: accesses.into(),
                ..UpdatedFile::new(&filename)
            }));
            println!("{} pending changes", session.store.changes.len());
        }
    }
    Ok(())
}
