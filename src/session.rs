//! Session manager: credential rules and the single signed-in session.
//!
//! The session has two states, logged out (initial) and logged in with an
//! account. A successful signup or login moves to logged in; logout moves
//! back. There is no expiry and only one session per process.
//!
//! Account lookup and creation go through the [`DataStore`] passed to each
//! call; the manager only owns the session and its persisted record.

use serde::Serialize;

use crate::error::AuthFailure;
use crate::model::{Account, Session};
use crate::storage::{erase_record, load_record, save_record, StoreHandle, SESSION_KEY};
use crate::store::DataStore;

// Lengths are in UTF-16 code units, the unit browser form fields count in.
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 8;

/// A password needs at least one of these.
pub const PASSWORD_SPECIAL_CHARS: [char; 8] = ['!', '@', '#', '$', '%', '^', '&', '*'];

/// Result of a signup or login attempt as the forms see it.
///
/// `message` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

impl<T> From<Result<T, AuthFailure>> for AuthOutcome {
    fn from(result: Result<T, AuthFailure>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: String::new(),
            },
            Err(failure) => Self {
                success: false,
                message: failure.to_string(),
            },
        }
    }
}

/// Check signup rules in their fixed order; the first violation wins.
pub fn validate_signup(
    store: &DataStore,
    username: &str,
    password: &str,
) -> Result<(), AuthFailure> {
    if store.find_account_by_username(username).is_some() {
        return Err(AuthFailure::UsernameTaken);
    }

    let username_len = utf16_len(username);
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
        return Err(AuthFailure::UsernameLength);
    }

    if utf16_len(password) < PASSWORD_MIN_LEN {
        return Err(AuthFailure::PasswordTooShort);
    }

    if !password.contains(&PASSWORD_SPECIAL_CHARS[..]) {
        return Err(AuthFailure::PasswordMissingSpecial);
    }

    Ok(())
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

pub struct SessionManager {
    storage: StoreHandle,
    session: Session,
}

impl SessionManager {
    /// Build the manager, restoring a persisted session if one decodes.
    pub fn load(storage: StoreHandle) -> Self {
        let session = match load_record::<Session>(storage.as_ref(), SESSION_KEY) {
            Some(session) if session.is_logged_in && session.current_account.is_some() => {
                session
            }
            Some(_) | None => Session::logged_out(),
        };
        tracing::debug!(logged_in = session.is_logged_in, "loaded session");
        Self { storage, session }
    }

    /// Register a new account and sign it in.
    pub fn signup(
        &mut self,
        store: &mut DataStore,
        username: &str,
        password: &str,
    ) -> AuthOutcome {
        self.try_signup(store, username, password).into()
    }

    /// [`signup`](Self::signup), returning the new account or the failed rule.
    pub fn try_signup(
        &mut self,
        store: &mut DataStore,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthFailure> {
        if let Err(failure) = validate_signup(store, username, password) {
            tracing::debug!(username, reason = %failure, "signup rejected");
            return Err(failure);
        }

        let account = Account::new(username, password);
        store.add_account(account.clone());
        tracing::info!(username, account_id = %account.id, "signed up");
        self.begin(account.clone());
        Ok(account)
    }

    /// Sign in to an existing account.
    pub fn login(&mut self, store: &DataStore, username: &str, password: &str) -> AuthOutcome {
        self.try_login(store, username, password).into()
    }

    /// [`login`](Self::login), returning the account or the failed rule.
    pub fn try_login(
        &mut self,
        store: &DataStore,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthFailure> {
        let account = match store.find_account_by_username(username) {
            Some(account) => account,
            None => {
                tracing::debug!(username, "login rejected: unknown user");
                return Err(AuthFailure::UserNotFound);
            }
        };

        if account.password != password {
            tracing::debug!(username, "login rejected: wrong password");
            return Err(AuthFailure::IncorrectPassword);
        }

        let account = account.clone();
        tracing::info!(username, account_id = %account.id, "logged in");
        self.begin(account.clone());
        Ok(account)
    }

    /// Clear the session and erase its persisted record.
    pub fn logout(&mut self) {
        if let Some(account) = &self.session.current_account {
            tracing::info!(username = %account.username, "logged out");
        }
        self.session = Session::logged_out();
        erase_record(self.storage.as_ref(), SESSION_KEY);
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.session.current_account.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in
    }

    pub fn session_state(&self) -> &Session {
        &self.session
    }

    fn begin(&mut self, account: Account) {
        self.session = Session::logged_in(account);
        save_record(self.storage.as_ref(), SESSION_KEY, &self.session);
    }
}
