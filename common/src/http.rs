use actix_web::{HttpResponse, Responder, http::header::CONTENT_DISPOSITION};
use serde::Serialize;

use super::error::Res;

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(body))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
    /// Binary PDF served as a download.
    pub fn pdf(bytes: Vec<u8>, file_name: String) -> Res<impl Responder> {
        Result::Ok(
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ))
                .body(bytes),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::misc::report_file_name;

    fn download(member: &str) -> Res<impl Responder> {
        let file_name = report_file_name(member);
        Success::pdf(b"%PDF-1.3".to_vec(), file_name)
    }

    #[test]
    fn pdf_is_an_attachment_named_after_the_member() {
        let req = TestRequest::default().to_http_request();
        let resp = download("Jane Doe").unwrap().respond_to(&req);

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Jane-Doe-Health-Report.pdf\""
        );
        assert_eq!(
            resp.headers().get(actix_web::http::header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
    }
}
