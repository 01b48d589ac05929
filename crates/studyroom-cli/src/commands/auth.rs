use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::{AuthError, Registration};

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account
    Register {
        email: String,
        password: String,
        /// Full name
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        university: String,
        #[arg(long, default_value = "")]
        major: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
    },
    /// Sign in
    Login {
        email: String,
        password: String,
        /// Keep the session after the temp directory is cleared
        #[arg(long)]
        remember: bool,
    },
    /// Sign out
    Logout,
    /// Print the current session
    Whoami,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        AuthAction::Register {
            email,
            password,
            name,
            university,
            major,
            dob,
        } => {
            let user = app.register(Registration {
                email,
                password,
                full_name: name,
                date_of_birth: dob,
                university,
                major,
            })?;
            eprintln!("Registered {}", user.email);
            print_json(&serde_json::json!({
                "email": user.email,
                "fullName": user.full_name,
                "university": user.university,
            }))?;
        }
        AuthAction::Login {
            email,
            password,
            remember,
        } => {
            let session = app.login(&email, &password, remember)?;
            print_json(&session)?;
        }
        AuthAction::Logout => {
            app.logout()?;
            println!("signed out");
        }
        AuthAction::Whoami => {
            let session = app.session().ok_or(AuthError::NotSignedIn)?;
            print_json(session)?;
        }
    }
    Ok(())
}
