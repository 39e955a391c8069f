//! Four-page health report: personal details, body metrics, a marketing
//! image and a closing page.
//!
//! [`ReportLayout::build`] decides every string on the page and is pure;
//! [`render`] only draws it.

use std::sync::Arc;

use common::{
    env_config::GymConfig,
    error::{AppError, Res},
};
use db::models::bmi::BmiRecordWithMember;
use printpdf::image_crate;
use thiserror::Error;

use crate::{
    images::{UploadedImageInfo, select_marketing_image},
    ports::ImageSource,
    templates::DATE_FORMAT,
};

mod render;

pub use render::render;

pub const MISSING_VALUE: &str = "-";
pub const TOUR_MESSAGE: &str = "Experience a personalised tour of our gym and explore our latest offers with one of our trainers. Don't miss out!";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("font error: {0}")]
    Font(String),
    #[error("image error: {0}")]
    Image(String),
    #[error("could not write document: {0}")]
    Save(String),
}

impl From<ReportError> for AppError {
    fn from(error: ReportError) -> Self {
        AppError::Pdf(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub parameter: &'static str,
    pub value: String,
    pub reference: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarketingPage {
    Image(Vec<u8>),
    Placeholder { headline: String, hint: String },
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub document_title: String,
    pub logo: Option<Arc<Vec<u8>>>,

    pub personal_title: String,
    pub attended_by: String,
    pub personal_rows: Vec<(&'static str, String)>,

    pub metrics_title: String,
    pub metric_header: [&'static str; 3],
    pub metric_rows: Vec<MetricRow>,
    pub conclusion: Option<String>,

    pub marketing: MarketingPage,

    pub closing_title: String,
    pub closing_link: String,
    pub closing_message: String,
}

/// Images the PDF backend cannot decode get the placeholder page instead.
fn decodes(bytes: &[u8]) -> bool {
    match image_crate::load_from_memory(bytes) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Marketing image skipped, cannot decode: {}", e);
            false
        }
    }
}

/// Blank or zero readings print as [`MISSING_VALUE`].
fn reading(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => v.to_string(),
        _ => MISSING_VALUE.to_string(),
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

impl ReportLayout {
    pub fn build(
        data: &BmiRecordWithMember,
        gym: &GymConfig,
        marketing_image: Option<Vec<u8>>,
        logo: Option<Arc<Vec<u8>>>,
    ) -> Self {
        let member = &data.member;
        let r = &data.record;

        let personal_rows = vec![
            ("Name -", member.name.clone()),
            ("Contact -", member.phone.clone()),
            ("Email -", or_default(&member.email, "Not provided")),
            (
                "DOB -",
                member
                    .date_of_birth
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "Not provided".to_string()),
            ),
            (
                "Relationship Status -",
                or_default(&member.relationship_status, "Not provided"),
            ),
            ("Service looking -", or_default(&member.service_looking, "Member")),
            ("Platform -", or_default(&member.platform, "Member")),
        ];

        let row = |parameter, value, reference| MetricRow {
            parameter,
            value,
            reference,
        };
        let metric_rows = vec![
            row("Age", reading(r.age), MISSING_VALUE),
            row("Present Body Weight", reading(Some(r.weight)), MISSING_VALUE),
            row("Ideal body weight", reading(r.ideal_body_weight), MISSING_VALUE),
            row("Total Fat %", reading(r.total_fat_percentage), "12 to 15"),
            row("Subcutaneous fat", reading(r.subcutaneous_fat), MISSING_VALUE),
            row("Visceral fat", reading(r.visceral_fat), "2 - 5%"),
            row("Muscle Mass", reading(r.muscle_mass), MISSING_VALUE),
            row("Resting Metabolism", reading(r.resting_metabolism), MISSING_VALUE),
            row("Biological Age", reading(r.biological_age), MISSING_VALUE),
            row(
                "Body Mass index",
                reading(Some(r.bmi)),
                "(18.5 to 24.9, it falls within the Healthy Weight range)",
            ),
        ];

        let conclusion = r
            .health_conclusion
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("• \"{}\"", c));

        let marketing = match marketing_image.filter(|bytes| decodes(bytes)) {
            Some(bytes) => MarketingPage::Image(bytes),
            None => MarketingPage::Placeholder {
                headline: "No marketing image uploaded".to_string(),
                hint: "Upload a marketing image through the admin panel".to_string(),
            },
        };

        ReportLayout {
            document_title: format!("{} Health Report", member.name),
            logo,
            personal_title: format!("Personal Details of {} :", member.name),
            attended_by: format!("Attend By: {}", or_default(&r.attended_by, "Staff")),
            personal_rows,
            metrics_title: format!("BMI Report of {} :", member.name),
            metric_header: ["Parameter", "Value", "Reference"],
            metric_rows,
            conclusion,
            marketing,
            closing_title: "Check out our gym location & Reviews on the map:".to_string(),
            closing_link: format!("{} Link: {}", gym.name, gym.map_url),
            closing_message: TOUR_MESSAGE.to_string(),
        }
    }
}

/// Builds complete report PDFs: picks and downloads the marketing image,
/// lays out and renders the pages.
pub struct ReportGenerator {
    images: Arc<dyn ImageSource>,
    gym: GymConfig,
    logo: Option<Arc<Vec<u8>>>,
}

impl ReportGenerator {
    pub fn new(images: Arc<dyn ImageSource>, gym: GymConfig, logo: Option<Arc<Vec<u8>>>) -> Self {
        Self { images, gym, logo }
    }

    pub fn images(&self) -> &Arc<dyn ImageSource> {
        &self.images
    }

    pub async fn generate(
        &self,
        data: &BmiRecordWithMember,
        uploaded: Option<&UploadedImageInfo>,
    ) -> Res<Vec<u8>> {
        let marketing_url =
            select_marketing_image(&data.member.customer_type, uploaded, self.images.as_ref()).await;

        let marketing_image = match marketing_url {
            Some(url) => {
                log::debug!("Using marketing image {}", url);
                let bytes = self.images.fetch(&url).await.map_err(|e| {
                    AppError::Pdf(format!("marketing image {} unavailable: {}", url, e))
                })?;
                Some(bytes)
            }
            None => None,
        };

        let layout = ReportLayout::build(data, &self.gym, marketing_image, self.logo.clone());
        Ok(render(&layout)?)
    }
}
