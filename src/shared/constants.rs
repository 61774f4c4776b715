/// Status given to a complaint that arrives without one
pub const DEFAULT_STATUS: &str = "Pending";

/// Status a department sets once the issue is fixed
pub const STATUS_RESOLVED: &str = "Resolved";

/// Route prefix under which uploaded media is served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Multipart field name carrying complaint images
pub const IMAGES_FIELD: &str = "images";

/// Geohash length used for complaint locations
pub const GEOHASH_PRECISION: usize = 9;
