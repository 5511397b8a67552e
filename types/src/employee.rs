use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{Field, FieldErrors, Result};

/// Positions offered by the employee form.
pub const POSITIONS: &[&str] = &[
    "Frontend Developer",
    "Backend Developer",
    "Fullstack Developer",
    "Mobile Developer",
    "UI/UX Designer",
    "QA Engineer",
    "DevOps Engineer",
    "Cloud Engineer",
    "Data Analyst",
    "Security Specialist",
    "System Architect",
    "Product Manager",
    "Scrum Master",
    "Business Analyst",
    "Digital Marketer",
    "HR Staff",
    "IT Support",
];

const MAX_POSITION_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
}

impl Division {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub position: String,
    pub division: Option<Division>,
    pub image: Option<Url>,
    pub created_at: Timestamp,
}

impl Employee {
    /// Build a new employee from a validated draft.
    pub fn from_draft(id: Uuid, valid: ValidDraft, division: Option<Division>) -> Self {
        Self {
            id,
            name: valid.name,
            phone: valid.phone,
            position: valid.position,
            division,
            image: valid.image,
            created_at: Timestamp::now(),
        }
    }

    /// Overwrite the editable attributes, keeping identity and creation time.
    pub fn apply(&mut self, valid: ValidDraft, division: Option<Division>) {
        self.name = valid.name;
        self.phone = valid.phone;
        self.position = valid.position;
        self.division = division;
        self.image = valid.image;
    }

    pub fn division_name(&self) -> &str {
        self.division.as_ref().map(|d| d.name.as_str()).unwrap_or("N/A")
    }

    /// First letter of the name, for avatar placeholders.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string()
    }

    pub fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            position: self.position.clone(),
            division_id: self
                .division
                .as_ref()
                .map(|d| d.id.clone())
                .unwrap_or_default(),
            image: self.image.as_ref().map(Url::to_string).unwrap_or_default(),
        }
    }
}

/// Raw form input for creating or updating an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub phone: String,
    pub position: String,
    /// Empty means no division.
    #[serde(default)]
    pub division_id: String,
    /// Empty means no image.
    #[serde(default)]
    pub image: String,
}

/// A draft that passed [`EmployeeDraft::validate`], trimmed and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub name: String,
    pub phone: String,
    pub position: String,
    pub division_id: Option<String>,
    pub image: Option<Url>,
}

impl EmployeeDraft {
    /// Check the field constraints that do not need the store.
    ///
    /// Whether `division_id` names an existing division is checked by
    /// [`validate_against`](Self::validate_against).
    pub fn validate(&self) -> Result<ValidDraft> {
        let mut errors = FieldErrors::new();
        let valid = self.check(&mut errors);
        errors.into_result()?;
        Ok(valid)
    }

    /// Full validation against the store's divisions. Every bad field is
    /// reported in one error, the division included.
    pub fn validate_against(
        &self,
        divisions: &[Division],
    ) -> Result<(ValidDraft, Option<Division>)> {
        let mut errors = FieldErrors::new();
        let valid = self.check(&mut errors);

        let division = match valid.division_id.as_deref() {
            None => None,
            Some(id) => {
                let found = divisions.iter().find(|d| d.id == id).cloned();
                if found.is_none() {
                    errors.add(Field::Division, "Unknown division.");
                }
                found
            }
        };

        errors.into_result()?;
        Ok((valid, division))
    }

    fn check(&self, errors: &mut FieldErrors) -> ValidDraft {
        let name = self.name.trim();
        if name.chars().count() < 3 {
            errors.add(Field::Name, "Name must be at least 3 characters.");
        }

        let phone = self.phone.trim();
        if !is_valid_phone(phone) {
            errors.add(
                Field::Phone,
                "Phone number must have 8 to 15 digits (spaces, dashes and a leading + are allowed).",
            );
        }

        let position = self.position.trim();
        if position.is_empty() {
            errors.add(Field::Position, "Position is required.");
        } else if position.chars().count() > MAX_POSITION_LEN {
            errors.add(
                Field::Position,
                format!("Position must be at most {MAX_POSITION_LEN} characters."),
            );
        }

        let image = match self.image.trim() {
            "" => None,
            raw => match Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
                _ => {
                    errors.add(Field::Image, "Image must be an http(s) URL.");
                    None
                }
            },
        };

        let division_id = match self.division_id.trim() {
            "" => None,
            id => Some(id.to_string()),
        };

        ValidDraft {
            name: name.to_string(),
            phone: phone.to_string(),
            position: position.to_string(),
            division_id,
            image,
        }
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => return false,
        }
    }
    (8..=15).contains(&digits)
}
