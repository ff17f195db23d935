/// Password-reset state shared by the whole process.
///
/// `code` is present while an OTP is outstanding. `reset_authorized` is set by a
/// successful verification and cleared by a completed password reset. The two
/// are tracked independently: issuing a new code leaves an open reset window
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpSession {
    pub code: Option<String>,
    pub reset_authorized: bool,
}

impl OtpSession {
    /// Stores `code`, replacing any outstanding one.
    pub fn issue(&mut self, code: String) {
        self.code = Some(code);
    }

    /// Consumes the outstanding code if `candidate` matches it numerically and
    /// opens the reset window. Leaves the session untouched on a mismatch.
    pub fn verify(&mut self, candidate: &str) -> bool {
        let matches = match (&self.code, parse_code(candidate)) {
            (Some(stored), Some(candidate)) => parse_code(stored) == Some(candidate),
            _ => false,
        };

        if matches {
            self.code = None;
            self.reset_authorized = true;
        }
        matches
    }

    pub fn is_authorized(&self) -> bool {
        self.reset_authorized
    }

    pub fn close_reset(&mut self) {
        self.reset_authorized = false;
    }
}

/// Numeric value of an all-digit code, so `"012345"` and `"12345"` compare equal.
/// Unlike a leading-digits parse, trailing junk such as `"123456abc"` is rejected.
/// Plain equality, not a constant-time comparison.
fn parse_code(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
