use chrono::{DateTime, Timelike, Utc};
use sha2::{Digest, Sha256};

const CODE_LEN: usize = 20;

/// Public verification code printed on an assessment certificate.
///
/// First 20 hex digits of SHA-256 over user id, assessment id and issue time,
/// upper-cased. Codes already printed on issued certificates depend on the
/// exact timestamp text, see [`issued_at_text`].
pub fn verification_code(user_id: &str, assessment_id: &str, issued_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(assessment_id.as_bytes());
    hasher.update(issued_at_text(issued_at).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..CODE_LEN].to_uppercase()
}

/// `2024-11-20 15:45:00+00:00`, with `.ffffff` after the seconds only when
/// the microsecond part is non-zero.
fn issued_at_text(issued_at: DateTime<Utc>) -> String {
    let micros = issued_at.nanosecond() % 1_000_000_000 / 1_000;
    let fraction = if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    };
    format!("{}{fraction}+00:00", issued_at.format("%Y-%m-%d %H:%M:%S"))
}

/// Check a code typed by a verifier; case and surrounding whitespace are ignored.
pub fn verify(
    code: &str,
    user_id: &str,
    assessment_id: &str,
    issued_at: DateTime<Utc>,
) -> bool {
    code.trim()
        .eq_ignore_ascii_case(&verification_code(user_id, assessment_id, issued_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 15, 45, 0).unwrap()
    }

    #[test]
    fn test_code_shape() {
        let code = verification_code("user-1", "assessment-1", issued());
        assert_eq!(code.len(), CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_code_is_deterministic_and_input_sensitive() {
        let a = verification_code("user-1", "assessment-1", issued());
        assert_eq!(a, verification_code("user-1", "assessment-1", issued()));
        assert_ne!(a, verification_code("user-2", "assessment-1", issued()));
        assert_ne!(
            a,
            verification_code("user-1", "assessment-1", issued() + chrono::Duration::seconds(1))
        );
    }

    #[test]
    fn test_code_matches_issued_certificates() {
        assert_eq!(
            verification_code("user-1", "assessment-1", issued()),
            "FB42D19680885EA7147C"
        );
        assert!(verify("fb42d19680885ea7147c", "user-1", "assessment-1", issued()));
    }

    #[test]
    fn test_issued_at_text() {
        assert_eq!(issued_at_text(issued()), "2024-11-20 15:45:00+00:00");
        let with_micros = issued() + chrono::Duration::microseconds(120);
        assert_eq!(issued_at_text(with_micros), "2024-11-20 15:45:00.000120+00:00");
    }

    #[test]
    fn test_verify_ignores_case() {
        let code = verification_code("user-1", "assessment-1", issued());
        assert!(verify(&format!(" {} ", code.to_lowercase()), "user-1", "assessment-1", issued()));
        assert!(!verify("0000000000", "user-1", "assessment-1", issued()));
    }
}
