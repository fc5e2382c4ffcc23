use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};

pub const OTP_DIGITS: usize = 6;

/// Knobs for issuing and checking one-time passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    pub ttl_secs: i64,
    pub max_attempts: i32,
    pub resend_cooldown_secs: i64,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_attempts: 5,
            resend_cooldown_secs: 60,
        }
    }
}

impl OtpPolicy {
    pub fn expiry_from(&self, now: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
        now + chrono::Duration::seconds(self.ttl_secs)
    }
}

/// Persisted OTP state. Only the digest is ever stored.
#[derive(Debug, Clone)]
pub struct OtpState {
    pub otp_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerdict {
    Valid,
    Mismatch,
    Expired,
    Exhausted,
}

pub fn generate_otp() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:0width$}", n, width = OTP_DIGITS)
}

pub fn hash_otp(otp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(otp.trim().as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Exhaustion wins over expiry, expiry wins over the digest comparison.
pub fn evaluate(
    state: &OtpState,
    candidate: &str,
    now: chrono::DateTime<chrono::Utc>,
    max_attempts: i32,
) -> OtpVerdict {
    if state.attempts >= max_attempts {
        return OtpVerdict::Exhausted;
    }
    if state.expires_at <= now {
        return OtpVerdict::Expired;
    }
    let candidate = hash_otp(candidate);
    if constant_time_eq(candidate.as_bytes(), state.otp_hash.as_bytes()) {
        OtpVerdict::Valid
    } else {
        OtpVerdict::Mismatch
    }
}
