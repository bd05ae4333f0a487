mod audit_client;
mod report_service;

pub use audit_client::AuditClient;
pub use report_service::ReportService;
