use bmi::{Assessment, Measurement, UnitSystem};
use common::error::{AppError, Res};
use db::dtos::bmi::BodyMetrics;
use notify::UploadedImageInfo;
use serde::Deserialize;
use validator::Validate;

use super::input::{empty_as_none, lenient_number};

/// New assessment as submitted by staff. Numeric fields may arrive as numbers
/// or numeric strings; blank values count as not measured.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BmiRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<UnitSystem>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 100, message = "Attended by too long"))]
    pub attended_by: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 500, message = "Health conclusion too long"))]
    pub health_conclusion: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 150.0, message = "Invalid age"))]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 500.0, message = "Invalid ideal body weight"))]
    pub ideal_body_weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 100.0, message = "Invalid total fat percentage"))]
    pub total_fat_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 100.0, message = "Invalid subcutaneous fat"))]
    pub subcutaneous_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 50.0, message = "Invalid visceral fat"))]
    pub visceral_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 200.0, message = "Invalid muscle mass"))]
    pub muscle_mass: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 10000.0, message = "Invalid resting metabolism"))]
    pub resting_metabolism: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, max = 150.0, message = "Invalid biological age"))]
    pub biological_age: Option<f64>,

    #[serde(default)]
    pub uploaded_image_info: Option<UploadedImageInfo>,
}

/// A request that passed validation, with height and weight in metric.
#[derive(Debug)]
pub struct ValidBmi {
    pub assessment: Assessment,
    pub metrics: BodyMetrics,
    pub attended_by: Option<String>,
    pub health_conclusion: Option<String>,
    pub uploaded_image_info: Option<UploadedImageInfo>,
}

fn bad(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

impl BmiRequest {
    pub fn into_valid(self) -> Res<ValidBmi> {
        let height = self.height.ok_or_else(|| bad("Height is required"))?;
        let weight = self.weight.ok_or_else(|| bad("Weight is required"))?;
        self.validate()?;

        let assessment = bmi::assess(Measurement {
            height,
            weight,
            unit: self.unit.unwrap_or_default(),
        });

        let (h, w) = (assessment.height_cm, assessment.weight_kg);
        if !(50.0..=300.0).contains(&h) {
            return Err(bad(if h > 300.0 { "Height too high" } else { "Height too low" }));
        }
        if !(20.0..=500.0).contains(&w) {
            return Err(bad(if w > 500.0 { "Weight too high" } else { "Weight too low" }));
        }

        Ok(ValidBmi {
            assessment,
            metrics: BodyMetrics {
                age: self.age,
                ideal_body_weight: self.ideal_body_weight,
                total_fat_percentage: self.total_fat_percentage,
                subcutaneous_fat: self.subcutaneous_fat,
                visceral_fat: self.visceral_fat,
                muscle_mass: self.muscle_mass,
                resting_metabolism: self.resting_metabolism,
                biological_age: self.biological_age,
            },
            attended_by: self.attended_by.map(|v| v.trim().to_string()),
            health_conclusion: self.health_conclusion.map(|v| v.trim().to_string()),
            uploaded_image_info: self.uploaded_image_info,
        })
    }
}
