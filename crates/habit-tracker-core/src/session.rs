//! Login flow glue between the identity service and whatever shows it.
//!
//! The controller gets an [`AuthSurface`] once, at construction, and drives
//! it on every state change. Failures end up as status text on the surface;
//! only expected outcomes (logged in, conflict, logged out) are returned.

use tracing::{info, warn};

use crate::error::ServiceError;
use crate::identity::{Identity, User};

/// Capabilities the login flow needs from the presentation layer.
pub trait AuthSurface {
    /// Logged-in mode shows "back to home" instead of the login form.
    fn set_home_mode(&mut self, logged_in: bool);
    fn set_logout_visible(&mut self, visible: bool);
    fn set_signup_visible(&mut self, visible: bool);
    fn set_status(&mut self, message: &str);
}

/// Result of a sign-up attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUp {
    Created(User),
    /// Email already registered; the user should log in instead.
    AlreadyExists,
    /// Email or password was blank; nothing was sent.
    MissingCredentials,
}

pub struct SessionController<I, S> {
    identity: I,
    surface: S,
    current: Option<User>,
}

impl<I: Identity, S: AuthSurface> SessionController<I, S> {
    pub fn new(identity: I, surface: S) -> Self {
        Self {
            identity,
            surface,
            current: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Resume an existing session, if the service still accepts it.
    pub async fn check_session(&mut self) -> Option<User> {
        match self.identity.current_user().await {
            Ok(user) => {
                self.logged_in(user.clone());
                Some(user)
            }
            Err(e) => {
                info!(error = %e, "no active session");
                self.logged_out("Please log in to continue.");
                None
            }
        }
    }

    /// Create an account and log straight into it.
    ///
    /// The name is `first last`, trimmed.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<SignUp, ServiceError> {
        let Some((email, password)) = self.credentials(email, password) else {
            return Ok(SignUp::MissingCredentials);
        };
        let full_name = format!("{} {}", first_name.trim(), last_name.trim())
            .trim()
            .to_string();

        let result = match self
            .identity
            .create_account(&email, &password, &full_name)
            .await
        {
            Ok(_) => self.open_session(&email, &password).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => Ok(SignUp::Created(user)),
            Err(e) if e.is_conflict() => {
                self.surface
                    .set_status("Account already exists. Please log in instead.");
                Ok(SignUp::AlreadyExists)
            }
            Err(e) => {
                self.surface.set_status(&format!("Signup failed: {e}"));
                Err(e)
            }
        }
    }

    /// `Ok(None)` when email or password is blank; the surface says so.
    pub async fn log_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ServiceError> {
        let Some((email, password)) = self.credentials(email, password) else {
            return Ok(None);
        };

        match self.open_session(&email, &password).await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                self.surface.set_status(&format!("Login failed: {e}"));
                Err(e)
            }
        }
    }

    async fn open_session(&mut self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.identity.create_session(email, password).await?;
        let user = self.identity.current_user().await?;
        self.logged_in(user.clone());
        Ok(user)
    }

    /// End the session. The surface is reset whether or not the call succeeds.
    pub async fn log_out(&mut self) {
        if let Err(e) = self.identity.delete_session().await {
            warn!(error = %e, "remote logout failed");
        }
        self.logged_out("Logged out.");
    }

    fn credentials(&mut self, email: &str, password: &str) -> Option<(String, String)> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.surface.set_status("Please enter email and password.");
            return None;
        }
        Some((email.to_string(), password.to_string()))
    }

    fn logged_in(&mut self, user: User) {
        self.surface.set_home_mode(true);
        self.surface.set_logout_visible(true);
        self.surface.set_signup_visible(false);
        self.surface.set_status(&format!("Logged in as {}", user.email));
        self.current = Some(user);
    }

    fn logged_out(&mut self, status: &str) {
        self.current = None;
        self.surface.set_home_mode(false);
        self.surface.set_logout_visible(false);
        self.surface.set_signup_visible(true);
        self.surface.set_status(status);
    }
}
