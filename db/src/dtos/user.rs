use common::misc::StaffRole;

#[derive(Debug)]
pub struct StaffUserCreateRequest {
    pub username: String,
    pub password_hash: String,
    pub role: StaffRole,
}

#[derive(Debug)]
pub struct StaffUserUpdateRequest {
    pub username: String,
    pub password_hash: String,
    pub role: StaffRole,
}
