use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::model::session::AuthSession;

const SESSION_FILE_NAME: &str = "session.json";

/// Where session credentials live between commands. For the terminal client
/// the file under the home directory plays the role browser session storage
/// played for the web client: login writes it, logout removes it, nothing
/// else is durable.
pub trait SessionStore {
    fn load(&self) -> Result<AuthSession>;
    fn save(&self, session: &AuthSession) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?
                .join(".timechart"),
        };
        fs::create_dir_all(&path)?;

        Ok(FileSessionStore {
            file_path: path.join(SESSION_FILE_NAME),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<AuthSession> {
        if !self.file_path.exists() {
            return Ok(AuthSession::default());
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let session = serde_json::from_reader(reader)?;
        Ok(session)
    }

    fn save(&self, session: &AuthSession) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, session)?;
        writer.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }
}

/// Single owner of the session. Views ask this object whether a user is
/// logged in and for the token; nothing else reads the store, so there is
/// exactly one invalidation point.
pub struct AuthContext<S: SessionStore> {
    store: S,
    session: AuthSession,
}

impl<S: SessionStore> AuthContext<S> {
    pub fn load(store: S) -> Result<Self> {
        let session = store.load()?;
        Ok(Self { store, session })
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in && self.session.access_token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        if self.session.is_logged_in {
            self.session.access_token.as_deref()
        } else {
            None
        }
    }

    /// The token, or the error every authenticated command reports.
    pub fn require_token(&self) -> Result<&str> {
        self.token()
            .ok_or_else(|| anyhow!("Login required. Run `timechart login` first."))
    }

    /// Records a successful login. Must not be called for a failed one; the
    /// session stays untouched in that case.
    pub fn record_login(&mut self, access_token: String) -> Result<()> {
        self.session = AuthSession {
            is_logged_in: true,
            access_token: Some(access_token),
        };
        self.store.save(&self.session)
    }

    pub fn invalidate(&mut self) -> Result<()> {
        self.session = AuthSession::default();
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_store() -> FileSessionStore {
        let dir = env::temp_dir().join(format!(
            "timechart_session_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        FileSessionStore::new(Some(dir)).unwrap()
    }

    #[test]
    fn missing_file_means_logged_out() {
        let auth = AuthContext::load(scratch_store()).unwrap();
        assert!(!auth.is_logged_in());
        assert!(auth.require_token().is_err());
    }

    #[test]
    fn login_round_trips_through_the_store() {
        let store = scratch_store();
        {
            let mut auth = AuthContext::load(store_clone(&store)).unwrap();
            auth.record_login("tok-1".to_string()).unwrap();
        }
        let auth = AuthContext::load(store).unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.require_token().unwrap(), "tok-1");
    }

    #[test]
    fn invalidate_clears_the_store() {
        let store = scratch_store();
        let mut auth = AuthContext::load(store_clone(&store)).unwrap();
        auth.record_login("tok-2".to_string()).unwrap();
        auth.invalidate().unwrap();
        assert!(!auth.is_logged_in());

        let reloaded = AuthContext::load(store).unwrap();
        assert!(!reloaded.is_logged_in());
    }

    fn store_clone(store: &FileSessionStore) -> FileSessionStore {
        FileSessionStore {
            file_path: store.file_path.clone(),
        }
    }
}
