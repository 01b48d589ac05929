//! Profile edits and display helpers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{User, DEFAULT_UNIVERSITY};
use crate::error::ValidationError;

const MIN_AGE: i32 = 16;
const MAX_AGE: i32 = 100;

/// Editable profile fields.
///
/// Built from the current user with [`ProfileUpdate::from_user`] and then
/// modified, the way a profile form is pre-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub university: String,
    pub date_of_birth: Option<NaiveDate>,
    pub major: String,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            university: user.university.clone(),
            date_of_birth: user.date_of_birth,
            major: user.major.clone(),
            avatar: user.avatar.clone(),
        }
    }

    /// Check every field, returning the first failure.
    ///
    /// Age is the plain difference of calendar years, as shown on the form.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ValidationError::invalid("full_name", "must not be empty"));
        }
        if full_name.chars().count() < 2 {
            return Err(ValidationError::invalid("full_name", "must be at least 2 characters"));
        }

        if self.university.trim().is_empty() {
            return Err(ValidationError::invalid("university", "please choose a university"));
        }

        if let Some(dob) = self.date_of_birth {
            let age = today.year() - dob.year();
            if age < MIN_AGE {
                return Err(ValidationError::invalid(
                    "date_of_birth",
                    format!("age must be at least {MIN_AGE}"),
                ));
            }
            if age > MAX_AGE {
                return Err(ValidationError::invalid("date_of_birth", "age is not valid"));
            }
        }

        let major = self.major.trim();
        if !major.is_empty() && major.chars().count() < 2 {
            return Err(ValidationError::invalid("major", "must be at least 2 characters"));
        }
        Ok(())
    }

    pub(crate) fn differs_from(&self, user: &User) -> bool {
        *self != Self::from_user(user)
    }

    pub(crate) fn apply_to(self, user: &mut User) {
        user.full_name = self.full_name.trim().to_string();
        user.university = self.university;
        user.date_of_birth = self.date_of_birth;
        user.major = self.major;
        user.avatar = self.avatar;
    }
}

/// Up to two upper-cased initials, e.g. "Nguyen Van An" -> "NV".
pub fn initials(full_name: &str) -> String {
    let initials: String = full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if initials.is_empty() {
        "SV".to_string()
    } else {
        initials
    }
}

pub fn display_name(full_name: &str) -> &str {
    if full_name.trim().is_empty() {
        "Student"
    } else {
        full_name
    }
}

pub fn university_display(university: &str) -> &str {
    if university.trim().is_empty() {
        DEFAULT_UNIVERSITY
    } else {
        university
    }
}
