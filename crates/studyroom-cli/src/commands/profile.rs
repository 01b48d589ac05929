use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::user::{display_name, initials, university_display};
use studyroom_core::{AuthError, ProfileUpdate};

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the signed-in user's profile
    Show,
    /// Edit profile fields; omitted fields keep their value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        university: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        major: Option<String>,
        /// Avatar URL or data URI
        #[arg(long)]
        avatar: Option<String>,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        ProfileAction::Show => {}
        ProfileAction::Update {
            name,
            university,
            dob,
            major,
            avatar,
        } => {
            let user = app.current_user().ok_or(AuthError::NotSignedIn)?;
            let mut update = ProfileUpdate::from_user(user);
            if let Some(name) = name {
                update.full_name = name;
            }
            if let Some(university) = university {
                update.university = university;
            }
            if dob.is_some() {
                update.date_of_birth = dob;
            }
            if let Some(major) = major {
                update.major = major;
            }
            if avatar.is_some() {
                update.avatar = avatar;
            }
            if !app.update_profile(update)? {
                eprintln!("No changes");
            }
        }
    }

    let user = app.current_user().ok_or(AuthError::NotSignedIn)?;
    print_json(&serde_json::json!({
        "email": user.email,
        "fullName": user.full_name,
        "displayName": display_name(&user.full_name),
        "initials": initials(&user.full_name),
        "university": university_display(&user.university),
        "major": user.major,
        "dateOfBirth": user.date_of_birth,
        "avatar": user.avatar,
        "createdAt": user.created_at,
    }))?;
    Ok(())
}
