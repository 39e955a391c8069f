use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Staff,
}

impl StaffRole {
    /// Accepts `admin`/`staff` in any letter case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(StaffRole::Admin),
            "staff" => Some(StaffRole::Staff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Staff => "staff",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trims and strips angle brackets.
pub fn sanitize_string(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

pub fn sanitize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keeps digits and `+` only.
pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

/// `Jane  Doe` -> `Jane-Doe-Health-Report.pdf`
pub fn report_file_name(member_name: &str) -> String {
    let dashed = member_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}-Health-Report.pdf", dashed)
}
