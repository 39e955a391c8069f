use common::error::Res;
use db::{
    dtos::member::{MemberCreateRequest, MemberUpdateRequest},
    models::member::{Member, MemberDetail, MemberWithLatest},
};
use sqlx::PgPool;

pub async fn list_members(pool: &PgPool) -> Res<Vec<MemberWithLatest>> {
    db::member::list_members_with_latest(pool).await
}

pub async fn create_member(pool: &PgPool, data: MemberCreateRequest) -> Res<Member> {
    db::member::create_member(pool, data).await
}

pub async fn get_member(pool: &PgPool, id: i32) -> Res<MemberDetail> {
    db::member::get_member_detail(pool, id).await
}

pub async fn update_member(pool: &PgPool, id: i32, data: MemberUpdateRequest) -> Res<Member> {
    db::member::update_member(pool, id, data).await
}
