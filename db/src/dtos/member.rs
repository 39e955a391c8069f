use chrono::NaiveDate;

#[derive(Debug)]
pub struct MemberCreateRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub relationship_status: Option<String>,
    pub service_looking: Option<String>,
    pub platform: Option<String>,
}

/// Full replacement of the editable fields. `customer_type` is kept when `None`.
#[derive(Debug)]
pub struct MemberUpdateRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub relationship_status: Option<String>,
    pub service_looking: Option<String>,
    pub platform: Option<String>,
    pub customer_type: Option<String>,
}
