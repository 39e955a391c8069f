use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::bmi::{BmiRecord, BmiSummary};

pub const CUSTOMER_NEW: &str = "new";
pub const CUSTOMER_EXISTING: &str = "existing";

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i32,
    pub member_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub relationship_status: Option<String>,
    pub service_looking: Option<String>,
    pub platform: Option<String>,
    pub customer_type: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Member {
    pub fn is_new_customer(&self) -> bool {
        self.customer_type == CUSTOMER_NEW
    }
}

/// List entry: the member plus its most recent BMI summary, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithLatest {
    #[serde(flatten)]
    pub member: Member,
    pub bmi_records: Vec<BmiSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    pub bmi_records: Vec<BmiRecord>,
}

/// `M` + id padded to three digits.
pub fn format_member_id(next_id: i32) -> String {
    format!("M{:03}", next_id)
}
