use chrono::NaiveDateTime;
use serde::Serialize;

use super::member::Member;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRecord {
    pub id: i32,
    pub member_id: i32,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub category: String,
    pub age: Option<f64>,
    pub ideal_body_weight: Option<f64>,
    pub total_fat_percentage: Option<f64>,
    pub subcutaneous_fat: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub resting_metabolism: Option<f64>,
    pub biological_age: Option<f64>,
    pub health_conclusion: Option<String>,
    pub attended_by: Option<String>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiSummary {
    pub id: i32,
    pub bmi: f64,
    pub category: String,
    pub recorded_at: NaiveDateTime,
}

/// A record joined with the member it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRecordWithMember {
    #[serde(flatten)]
    pub record: BmiRecord,
    pub member: Member,
}
