pub mod otp;
pub mod passwords;
pub mod tokens;
pub mod validation;
