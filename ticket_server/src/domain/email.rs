// Email normalization and the allow-listed domain policy.

// Record-store keys are stored trimmed and lowercased; every lookup must match.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// Email suffix a caller must carry to be served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowedDomain(String);

impl AllowedDomain {
    pub fn new(domain: &str) -> Option<Self> {
        let domain = domain.trim().trim_start_matches('@').to_lowercase();
        if domain.is_empty() || domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Expects an already normalized email.
    pub fn permits(&self, email: &str) -> bool {
        email
            .strip_suffix(self.0.as_str())
            .is_some_and(|local| local.len() > 1 && local.ends_with('@'))
    }

    pub fn rejection_message(&self) -> String {
        format!("Only @{} emails are allowed.", self.0)
    }
}
