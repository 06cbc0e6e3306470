pub mod error;
pub mod escrow_service;
pub mod job_service;
pub mod notification_service;
pub mod review_service;
pub mod stellar;
