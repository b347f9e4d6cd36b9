use clap::Subcommand;
use habit_tracker_core::identity::{clear_session, load_session, save_session, AccountClient, StoredSession, User};
use habit_tracker_core::{AuthSurface, Config, Database, ServiceClient, ServiceError, SessionController, SignUp};
use serde_json::json;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Check whether the stored session is still valid
    Status,
}

/// Terminal stand-in for the login screen: only the status line shows.
struct ConsoleSurface;

impl AuthSurface for ConsoleSurface {
    fn set_home_mode(&mut self, _logged_in: bool) {}
    fn set_logout_visible(&mut self, _visible: bool) {}
    fn set_signup_visible(&mut self, _visible: bool) {}
    fn set_status(&mut self, message: &str) {
        println!("{message}");
    }
}

type Controller = SessionController<AccountClient, ConsoleSurface>;

fn controller(config: &Config, secret: Option<String>) -> Result<Controller, Box<dyn std::error::Error>> {
    let client = ServiceClient::new(&config.service)?.with_session(secret);
    Ok(SessionController::new(AccountClient::new(client), ConsoleSurface))
}

fn remember(db: &Database, controller: &Controller, user: User) -> CmdResult {
    let secret = controller
        .identity()
        .session_secret()
        .ok_or_else(|| ServiceError::InvalidResponse("no session secret".into()))?
        .to_string();
    save_session(db, &StoredSession { user, secret })?;
    Ok(())
}

pub fn run(action: AuthAction) -> CmdResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(action))
}

async fn run_async(action: AuthAction) -> CmdResult {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        AuthAction::Signup {
            email,
            password,
            first_name,
            last_name,
        } => {
            let mut controller = controller(&config, None)?;
            match controller
                .sign_up(&email, &password, &first_name, &last_name)
                .await?
            {
                SignUp::Created(user) => remember(&db, &controller, user)?,
                SignUp::AlreadyExists | SignUp::MissingCredentials => {}
            }
        }
        AuthAction::Login { email, password } => {
            let mut controller = controller(&config, None)?;
            if let Some(user) = controller.log_in(&email, &password).await? {
                remember(&db, &controller, user)?;
            }
        }
        AuthAction::Logout => {
            let secret = load_session(&db).map(|s| s.secret);
            let mut controller = controller(&config, secret)?;
            controller.log_out().await;
            clear_session(&db)?;
        }
        AuthAction::Status => match load_session(&db) {
            None => print_json(&json!({ "loggedIn": false }))?,
            Some(stored) => {
                let mut controller = controller(&config, Some(stored.secret))?;
                let user = controller.check_session().await;
                print_json(&json!({ "loggedIn": user.is_some(), "user": user }))?;
            }
        },
    }
    Ok(())
}
