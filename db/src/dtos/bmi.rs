/// Optional body-composition readings captured alongside height and weight.
#[derive(Debug, Clone, Default)]
pub struct BodyMetrics {
    pub age: Option<f64>,
    pub ideal_body_weight: Option<f64>,
    pub total_fat_percentage: Option<f64>,
    pub subcutaneous_fat: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub resting_metabolism: Option<f64>,
    pub biological_age: Option<f64>,
}

#[derive(Debug)]
pub struct BmiRecordCreateRequest {
    pub member_id: i32,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub category: String,
    pub metrics: BodyMetrics,
    pub health_conclusion: Option<String>,
    pub attended_by: Option<String>,
}
