//! File-backed session store.
//!
//! The credential lives in a single `token` file inside the session
//! directory. Access goes through a `cap_std` directory handle so the store
//! can never reach outside that directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::replace_file;
use crate::domain::Credential;
use crate::domain::ports::{SessionStore, SessionStoreError};

const TOKEN_FILE: &str = "token";

/// Session store persisting the credential under a directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl FileSessionStore {
    /// Open the session directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let path = root.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            dir,
            root: path.to_path_buf(),
        })
    }

    /// Directory holding the credential file.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn token_path(&self) -> Utf8PathBuf {
        self.root.join(TOKEN_FILE)
    }
}

impl SessionStore for FileSessionStore {
    fn credential(&self) -> Result<Option<Credential>, SessionStoreError> {
        match self.dir.read_to_string(TOKEN_FILE) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| Credential::new(token)))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SessionStoreError::read(format!(
                "{}: {err}",
                self.token_path()
            ))),
        }
    }

    fn store(&self, credential: &Credential) -> Result<(), SessionStoreError> {
        replace_file(&self.dir, TOKEN_FILE, credential.expose().as_bytes()).map_err(|err| {
            SessionStoreError::write(format!("{}: {err}", self.token_path()))
        })?;
        debug!(path = %self.token_path(), "credential stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match self.dir.remove_file(TOKEN_FILE) {
            Ok(()) => {
                debug!(path = %self.token_path(), "credential removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::write(format!(
                "{}: {err}",
                self.token_path()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Persistence coverage against a scratch directory.

    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Scratch {
        _temp: TempDir,
        store: FileSessionStore,
    }

    #[fixture]
    fn scratch() -> Scratch {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("session"))
            .expect("utf-8 temp path");
        let store = FileSessionStore::open(&root).expect("open store");
        Scratch { _temp: temp, store }
    }

    #[rstest]
    fn round_trips_the_credential(scratch: Scratch) {
        scratch
            .store
            .store(&Credential::new("eyJ.token"))
            .expect("store");

        assert_eq!(
            scratch.store.credential().expect("read"),
            Some(Credential::new("eyJ.token"))
        );
    }

    #[rstest]
    fn missing_file_reads_as_absent(scratch: Scratch) {
        assert_eq!(scratch.store.credential().expect("read"), None);
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    fn blank_file_reads_as_absent(scratch: Scratch, #[case] contents: &str) {
        scratch
            .store
            .dir
            .write(TOKEN_FILE, contents)
            .expect("seed token file");

        assert_eq!(scratch.store.credential().expect("read"), None);
    }

    #[rstest]
    fn clearing_is_idempotent(scratch: Scratch) {
        scratch.store.store(&Credential::new("t")).expect("store");
        scratch.store.clear().expect("first clear");
        scratch.store.clear().expect("second clear");

        assert_eq!(scratch.store.credential().expect("read"), None);
    }

    #[rstest]
    fn reopening_sees_the_persisted_credential(scratch: Scratch) {
        scratch.store.store(&Credential::new("kept")).expect("store");

        let reopened = FileSessionStore::open(scratch.store.root()).expect("reopen");

        assert_eq!(
            reopened.credential().expect("read"),
            Some(Credential::new("kept"))
        );
    }
}
