pub mod my_applications;
pub mod submit_application;
