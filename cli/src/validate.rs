use anyhow::{bail, Result};

const MIN_PASSWORD_LEN: usize = 8;

/// Form checks that run before any network call. A failure here means no
/// request is issued at all.
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.trim().is_empty() {
        bail!("E-mail and password are both required.");
    }
    Ok(())
}

pub fn validate_signup(email: &str, password: &str, nickname: &str) -> Result<()> {
    if email.trim().is_empty() || password.trim().is_empty() || nickname.trim().is_empty() {
        bail!("E-mail, password and nickname are all required.");
    }
    if !plausible_email(email) {
        bail!("'{}' does not look like an e-mail address.", email);
    }
    if password.len() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {} characters.", MIN_PASSWORD_LEN);
    }
    Ok(())
}

/// local@domain.tld with no whitespace. The backend does the real check.
fn plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("a@b.com", "pw").is_ok());
        assert!(validate_login("", "pw").is_err());
        assert!(validate_login("a@b.com", "  ").is_err());
    }

    #[test]
    fn signup_checks_email_shape_and_password_length() {
        assert!(validate_signup("user@example.com", "longenough", "nick").is_ok());
        assert!(validate_signup("user@example.com", "short", "nick").is_err());
        assert!(validate_signup("not-an-email", "longenough", "nick").is_err());
        assert!(validate_signup("user@example.com", "longenough", "").is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(plausible_email("user@example.com"));
        assert!(plausible_email("a.b@sub.example.co"));
        assert!(!plausible_email("user@example"));
        assert!(!plausible_email("@example.com"));
        assert!(!plausible_email("user@@example.com"));
        assert!(!plausible_email("user example@x.com"));
        assert!(!plausible_email("user@.com")); // empty host
    }
}
