//! Terminal collaborator for the content client.
//!
//! Parsing lives in the `args` submodule; this module turns a parsed
//! [`Command`] into calls on an [`AuthSession`] and renders the result as
//! JSON. The binary only wires adapters and prints, so every command can be
//! exercised here against in-memory ports.

mod args;

use std::io;

use camino::Utf8Path;
use mockable::Clock;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub use self::args::{Cli, Command, PostChanges, PostFields, PostsCommand, RoleArg};
use crate::domain::ports::{ContentApi, SessionStore};
use crate::domain::{
    AuthEvent, AuthSession, ClientError, ContactMessage, ImageUpload, NewAccount, NewPost,
    PostId, PostPatch, Registration,
};

/// Failures surfaced by `content-cli`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded or are malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The client reported a failure.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A local file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// File that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The command needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,
    /// An update named no field to change.
    #[error("nothing to update: pass at least one field")]
    EmptyPatch,
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
    /// The result could not be rendered as JSON.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Collaborators a command needs besides the session.
pub struct CommandContext<'a, A, S> {
    /// Session the command runs against.
    pub session: &'a AuthSession<A, S>,
    /// Source of "today" for new posts.
    pub clock: &'a dyn Clock,
    /// Reads local files for uploads.
    pub read_file: &'a (dyn Fn(&Utf8Path) -> io::Result<Vec<u8>> + Sync),
}

/// Run one command and return the JSON document to print.
///
/// # Errors
///
/// Returns [`CliError`] when validation or the underlying operation fails.
pub async fn run_command<A, S>(
    context: &CommandContext<'_, A, S>,
    command: Command,
) -> Result<Value, CliError>
where
    A: ContentApi,
    S: SessionStore,
{
    let session = context.session;
    let client = session.client();
    match command {
        Command::Login { username, password } => {
            let user = session.sign_in(&username, &password).await?;
            Ok(json!(user))
        }
        Command::Logout => {
            session.sign_out().await;
            Ok(json!({ "signedOut": true }))
        }
        Command::Whoami => {
            let user = session.restore().await.ok_or(CliError::NotSignedIn)?;
            Ok(json!(user))
        }
        Command::Refresh => {
            let grant = session.refresh().await?;
            Ok(json!({ "refreshed": true, "tokenType": grant.token_type }))
        }
        Command::Register {
            username,
            password,
            role,
        } => {
            let registration = Registration::try_from_parts(&username, &password, role.into())
                .map_err(|err| CliError::Validation(err.to_string()))?;
            let receipt = session.sign_up(&registration).await?;
            Ok(json!({ "message": receipt.message, "username": receipt.username }))
        }
        Command::Posts(posts) => run_posts(context, posts).await,
        Command::Upload { path } => {
            let bytes = (context.read_file)(&path).map_err(|source| CliError::ReadFile {
                path: path.to_string(),
                source,
            })?;
            let file_name = path.file_name().unwrap_or(path.as_str());
            let uploaded = client
                .upload_image(&ImageUpload::new(file_name, bytes))
                .await?;
            Ok(json!(uploaded))
        }
        Command::Categories => Ok(json!(client.list_categories().await)),
        Command::Tags => Ok(json!(client.list_tags().await)),
        Command::Stats => Ok(json!(client.fetch_stats().await)),
        Command::Contact {
            name,
            email,
            category,
            subject,
            message,
        } => {
            let message = ContactMessage::try_new(&name, &email, &category, &subject, &message)
                .map_err(|err| CliError::Validation(err.to_string()))?;
            let receipt = client.submit_contact(&message).await?;
            Ok(json!({ "id": receipt.id, "createdAt": receipt.created_at }))
        }
        Command::CreateAccount {
            username,
            email,
            password,
            role,
        } => {
            let account = NewAccount::try_new(&username, &email, &password, role.into())
                .map_err(|err| CliError::Validation(err.to_string()))?;
            client.create_account(&account).await?;
            Ok(json!({ "created": account.username() }))
        }
    }
}

async fn run_posts<A, S>(
    context: &CommandContext<'_, A, S>,
    command: PostsCommand,
) -> Result<Value, CliError>
where
    A: ContentApi,
    S: SessionStore,
{
    let client = context.session.client();
    match command {
        PostsCommand::List { post_type } => {
            Ok(json!(client.list_posts(post_type.as_deref()).await))
        }
        PostsCommand::Show { id } => Ok(json!(client.fetch_post(PostId::new(id)).await?)),
        PostsCommand::Create(fields) => {
            let draft = new_post(fields, context.clock);
            Ok(json!(client.create_post(&draft).await?))
        }
        PostsCommand::Update { id, fields } => {
            let patch = post_patch(fields);
            if patch.is_empty() {
                return Err(CliError::EmptyPatch);
            }
            Ok(json!(client.update_post(PostId::new(id), &patch).await?))
        }
        PostsCommand::Delete { id } => {
            client.delete_post(PostId::new(id)).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}

fn new_post(fields: PostFields, clock: &dyn Clock) -> NewPost {
    let date = fields.date.unwrap_or_else(|| clock.utc().date_naive());
    let mut draft = NewPost::new(
        fields.title,
        fields.content,
        fields.author,
        fields.post_type,
        date,
    );
    if let Some(excerpt) = fields.excerpt {
        draft.excerpt = excerpt;
    }
    if let Some(category) = fields.category {
        draft.category = category;
    }
    if let Some(read_time) = fields.read_time {
        draft.read_time = read_time;
    }
    draft.image = fields.image;
    draft.featured = fields.featured;
    draft.tags = fields.tags;
    draft
}

fn post_patch(fields: PostChanges) -> PostPatch {
    let tags = if fields.clear_tags {
        Some(Vec::new())
    } else {
        (!fields.tags.is_empty()).then_some(fields.tags)
    };
    PostPatch {
        title: fields.title,
        content: fields.content,
        excerpt: fields.excerpt,
        category: fields.category,
        author: fields.author,
        date: fields.date,
        read_time: fields.read_time,
        image: fields.image,
        featured: fields.featured,
        tags,
        post_type: fields.post_type,
    }
}

/// Note to print when the credential expired while a command ran.
///
/// Drains every event already published on `events`.
pub fn expiry_notice(events: &mut broadcast::Receiver<AuthEvent>) -> Option<String> {
    let mut notice = None;
    loop {
        match events.try_recv() {
            Ok(AuthEvent::Expired {
                operation,
                login_path,
            }) => {
                notice = Some(format!(
                    "session expired during {operation}; sign in again at {login_path}"
                ));
            }
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => return notice,
        }
    }
}
