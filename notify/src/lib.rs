//! Post-assessment member notifications: WhatsApp text, emailed PDF report
//! and the delivery ledger.

pub mod images;
pub mod ledger;
pub mod mailer;
pub mod outcome;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod templates;
pub mod whatsapp;

pub use images::{StorageImageSource, UploadedImageInfo};
pub use ledger::PgLedger;
pub use mailer::SmtpMailer;
pub use outcome::{ChannelOutcome, NotificationOutcome};
pub use pipeline::NotificationPipeline;
pub use report::ReportGenerator;
pub use whatsapp::LogWhatsApp;
