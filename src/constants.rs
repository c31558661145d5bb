/// Upper bound on a whole multipart request body.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub const SESSION_COOKIE: &str = "portfolio_session";
pub const FLASH_COOKIE: &str = "flash";

pub const LOGIN_PATH: &str = "/login";
pub const GALLERY_PATH: &str = "/portfolio";
