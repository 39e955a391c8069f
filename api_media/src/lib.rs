//! Marketing image uploads and on-demand health report PDFs.

use actix_web::{Scope, web};

pub mod routes {
    pub mod report;
    pub mod upload;
}
pub mod dtos {
    pub mod report;
    pub mod upload;
}
pub mod services {
    pub mod report;
    pub mod upload;
}

/// Mounted under the authenticated `/api` scope.
pub fn mount_media() -> Scope {
    web::scope("")
        .service(routes::upload::post_upload_image)
        .service(routes::upload::get_uploaded_images)
        .service(routes::report::post_generate_pdf)
}
