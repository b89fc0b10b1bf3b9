use clap::Subcommand;
use focusos_core::auth::{AuthProvider, LocalAuth, ProfileUpdate, Role};
use focusos_core::storage::LocalStorage;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and sign in
    Signup {
        email: String,
        /// Display name shown to friends
        #[arg(long)]
        name: String,
        /// Accepted but not checked in local mode
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign in (creates a local account on first use)
    Signin {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign out and forget the local account
    Signout,
    /// Print the current session
    Whoami,
    /// Change profile fields
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// admin or friend
        #[arg(long)]
        role: Option<Role>,
    },
}

pub fn run(action: AuthAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let auth = LocalAuth::new(&storage);

    match action {
        AuthAction::Signup {
            email,
            name,
            password,
        } => {
            let session = auth.sign_up(&email, &password, &name)?;
            print_json(&session)?;
        }
        AuthAction::Signin { email, password } => {
            let session = auth.sign_in(&email, &password)?;
            print_json(&session)?;
        }
        AuthAction::Signout => {
            auth.sign_out()?;
            println!("signed out");
        }
        AuthAction::Whoami => {
            let session = auth.require_session()?;
            print_json(&session.user)?;
        }
        AuthAction::UpdateProfile { name, email, role } => {
            let update = ProfileUpdate {
                email,
                display_name: name,
                role,
            };
            if update.is_empty() {
                return Err("nothing to update (use --name, --email or --role)".into());
            }
            let profile = auth.update_profile(update)?;
            print_json(&profile)?;
        }
    }
    Ok(())
}
