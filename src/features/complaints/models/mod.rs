mod complaint;
mod location;

pub use complaint::{ComplaintRecord, Department, NewComplaint};
pub use location::Location;
