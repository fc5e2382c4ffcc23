use crate::application::ports::mail_sender::OutgoingMail;

pub mod admin_login;
pub mod change_password;
pub mod forgot_password;
pub mod login;
pub mod me;
pub mod register;
pub mod resend_otp;
pub mod reset_password;
pub mod update_profile;
pub mod verify_registration;

pub(crate) fn otp_mail(to: &str, subject: &str, otp: &str, ttl_secs: i64) -> OutgoingMail {
    let minutes = (ttl_secs / 60).max(1);
    OutgoingMail {
        to: to.to_string(),
        subject: subject.to_string(),
        text: format!(
            "Your BizNest verification code is {otp}. It expires in {minutes} minutes.\n\
             If you did not request this code you can ignore this email."
        ),
    }
}
