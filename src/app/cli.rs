use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::gallery::Relation;

/// Gallery - browse a photo gallery and batch album edits from the terminal 📷
#[derive(Parser, Debug)]
#[command(name = "gallery", version, about)]
pub struct Args {
    /// Directory holding config.toml, state.toml and logs
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Backend base URL (overrides config.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a page, e.g. `/trips/alps` or `/?date-ranges=2023-2023`
    Show {
        #[arg(default_value = "/")]
        location: String,

        /// Reload everything instead of merging
        #[arg(long)]
        reload: bool,
    },

    /// Exchange an identity-provider token for a session
    Login { google_token: String },

    Logout,

    /// Print the queued changes
    Pending,

    /// Drop the queued changes and the selection
    Discard,

    /// Send the queued changes to the backend
    Commit,

    /// Turn edit mode on or off (toggles without an argument)
    EditMode { state: Option<Toggle> },

    /// Select a file, or unselect it with --remove
    Select {
        filename: Option<String>,

        #[arg(long, requires = "filename")]
        remove: bool,

        /// Clear the whole selection
        #[arg(long, conflicts_with = "filename")]
        clear: bool,
    },

    RemoveAlbum { path: String },

    RemoveFile { filename: String },

    AddAlbum {
        /// Existing album the new one is placed against
        #[arg(long)]
        related: String,

        #[arg(long, value_enum, default_value_t = RelationArg::In)]
        relation: RelationArg,

        /// Last path segment of the new album
        #[arg(long)]
        path_part: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        text: String,
    },

    UpdateAlbum {
        path: String,

        /// Move the album and everything below it
        #[arg(long)]
        new_path: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        order: Option<i64>,

        #[arg(long, value_delimiter = ',')]
        accesses: Option<Vec<String>>,
    },

    UpdateFile {
        filename: String,

        /// Album the file currently belongs to
        #[arg(long)]
        album: String,

        /// Move the file to another album
        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        text: Option<String>,

        #[arg(long, value_delimiter = ',')]
        accesses: Option<Vec<String>>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> bool {
        toggle == Toggle::On
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationArg {
    Before,
    After,
    In,
}

impl From<RelationArg> for Relation {
    fn from(relation: RelationArg) -> Relation {
        match relation {
            RelationArg::Before => Relation::Before,
            RelationArg::After => Relation::After,
            RelationArg::In => Relation::In,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_album_parses_accesses_list() {
        let args = Args::parse_from([
            "gallery",
            "update-album",
            "trips/alps",
            "--new-path",
            "trips/alpen",
            "--accesses",
            "family,friends",
        ]);
        match args.command {
            Command::UpdateAlbum {
                path,
                new_path,
                accesses,
                title,
                ..
            } => {
                assert_eq!(path, "trips/alps");
                assert_eq!(new_path.as_deref(), Some("trips/alpen"));
                assert_eq!(accesses, Some(vec!["family".to_string(), "friends".to_string()]));
                assert!(title.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["gallery", "pending", "--config-dir", "/tmp/g"]);
        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/g")));
        assert!(matches!(args.command, Command::Pending));
    }
}
