//! Command-line arguments for `content-cli`.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ClientSettings;
use crate::domain::Role;

/// `content-cli` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "content-cli",
    about = "Drive the content API from a terminal: sign in, manage posts, upload images",
    version
)]
pub struct Cli {
    /// Base URL of the content API.
    #[arg(long, global = true, value_name = "url")]
    pub base_url: Option<String>,
    /// Directory holding the persisted credential.
    #[arg(long, global = true, value_name = "path")]
    pub session_dir: Option<String>,
    /// Transport timeout in seconds.
    #[arg(long, global = true, value_name = "secs")]
    pub timeout_secs: Option<u64>,
    /// Login path announced when the credential expires.
    #[arg(long, global = true, value_name = "path")]
    pub login_path: Option<String>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Layer command-line overrides over loaded settings.
    #[must_use]
    pub fn apply_overrides(&self, mut settings: ClientSettings) -> ClientSettings {
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(session_dir) = &self.session_dir {
            settings.session_dir = Some(session_dir.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = Some(timeout_secs);
        }
        if let Some(login_path) = &self.login_path {
            settings.login_path = Some(login_path.clone());
        }
        settings.json_logs |= self.json_logs;
        settings
    }
}

/// Top-level operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and persist the credential.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the credential.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Exchange the stored credential for a fresh one.
    Refresh,
    /// Create an account through self-registration.
    Register {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Role to grant.
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
    },
    /// Manage posts.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Upload an image and print its URL.
    Upload {
        /// Image file to upload.
        path: Utf8PathBuf,
    },
    /// List category labels.
    Categories,
    /// List tag labels.
    Tags,
    /// Show aggregate counters.
    Stats,
    /// Send a message through the contact form.
    Contact {
        /// Sender name.
        #[arg(long)]
        name: String,
        /// Contact email address.
        #[arg(long)]
        email: String,
        /// Category label.
        #[arg(long)]
        category: String,
        /// Message subject.
        #[arg(long)]
        subject: String,
        /// Message body.
        #[arg(long)]
        message: String,
    },
    /// Create an account on someone else's behalf (admin only).
    CreateAccount {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Contact email address.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Role to grant.
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
    },
}

/// Post operations.
#[derive(Debug, Clone, Subcommand)]
pub enum PostsCommand {
    /// List posts, optionally of one type.
    List {
        /// Post type, such as `news`, `event` or `blog`.
        #[arg(long = "type", value_name = "type")]
        post_type: Option<String>,
    },
    /// Show one post.
    Show {
        /// Post identifier.
        id: i64,
    },
    /// Create a post.
    Create(PostFields),
    /// Update the given fields of a post.
    Update {
        /// Post identifier.
        id: i64,
        /// Fields to change.
        #[command(flatten)]
        fields: PostChanges,
    },
    /// Delete a post.
    Delete {
        /// Post identifier.
        id: i64,
    },
}

/// Fields of a new post.
#[derive(Debug, Clone, Args)]
pub struct PostFields {
    /// Headline.
    #[arg(long)]
    pub title: String,
    /// Full body.
    #[arg(long)]
    pub content: String,
    /// Author name.
    #[arg(long)]
    pub author: String,
    /// Post type, such as `news`, `event` or `blog`.
    #[arg(long = "type", value_name = "type", default_value = "news")]
    pub post_type: String,
    /// Short summary.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// Category label.
    #[arg(long)]
    pub category: Option<String>,
    /// Publication date (`YYYY-MM-DD`); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Estimated reading time, e.g. `5 min`.
    #[arg(long)]
    pub read_time: Option<String>,
    /// Image reference, typically an uploaded image URL.
    #[arg(long)]
    pub image: Option<String>,
    /// Highlight the post on listing pages.
    #[arg(long)]
    pub featured: bool,
    /// Tag to attach; repeat for several.
    #[arg(long = "tag", value_name = "tag")]
    pub tags: Vec<String>,
}

/// Optional post fields for an update.
#[derive(Debug, Clone, Args)]
pub struct PostChanges {
    /// Headline.
    #[arg(long)]
    pub title: Option<String>,
    /// Full body.
    #[arg(long)]
    pub content: Option<String>,
    /// Author name.
    #[arg(long)]
    pub author: Option<String>,
    /// Post type, such as `news`, `event` or `blog`.
    #[arg(long = "type", value_name = "type")]
    pub post_type: Option<String>,
    /// Short summary.
    #[arg(long)]
    pub excerpt: Option<String>,
    /// Category label.
    #[arg(long)]
    pub category: Option<String>,
    /// Publication date (`YYYY-MM-DD`).
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Estimated reading time, e.g. `5 min`.
    #[arg(long)]
    pub read_time: Option<String>,
    /// Image reference, typically an uploaded image URL.
    #[arg(long)]
    pub image: Option<String>,
    /// New highlight flag.
    #[arg(long)]
    pub featured: Option<bool>,
    /// Replacement tag list; repeat for several.
    #[arg(long = "tag", value_name = "tag")]
    pub tags: Vec<String>,
    /// Remove every tag from the post.
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,
}

/// Account role as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Administrator.
    Admin,
    /// Regular user.
    User,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Self::Admin,
            RoleArg::User => Self::User,
        }
    }
}
