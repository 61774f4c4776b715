mod complaint_repository;

pub use complaint_repository::{ComplaintRepository, PgComplaintRepository};
