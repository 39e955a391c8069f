use chrono::NaiveDateTime;
use common::misc::StaffRole;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StaffUser {
    /// Rows are constrained to admin/staff; anything else is treated as staff.
    pub fn staff_role(&self) -> StaffRole {
        StaffRole::parse(&self.role).unwrap_or(StaffRole::Staff)
    }
}
