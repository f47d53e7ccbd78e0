use jsonwebtoken::{encode, EncodingKey, Header};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{claims::Claims, password, repo::User};
use crate::config::{AppConfig, AuthMode, JwtConfig};

/// Advertised lifetime of every issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Opaque parity token. Not verifiable: anyone can mint one.
pub fn legacy_token(email: &str, now: OffsetDateTime) -> String {
    format!("ignisshield::{}::{}", email, now.unix_timestamp())
}

/// HS256 signing material for secure mode.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub issuer: String,
    pub audience: String,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + Duration::seconds(TOKEN_TTL_SECS);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }
}

/// What gets written to `User::password` for a freshly signed-up user.
pub fn stored_password(mode: AuthMode, plain: &str) -> anyhow::Result<String> {
    match mode {
        AuthMode::Legacy => Ok(plain.to_string()),
        AuthMode::Secure => password::hash_password(plain),
    }
}

pub fn password_matches(mode: AuthMode, plain: &str, stored: &str) -> bool {
    match mode {
        AuthMode::Legacy => plain == stored,
        AuthMode::Secure => match password::verify_password(plain, stored) {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "stored password is not a valid hash");
                false
            }
        },
    }
}

pub fn issue_token(config: &AppConfig, user: &User) -> anyhow::Result<String> {
    let now = OffsetDateTime::now_utc();
    match (config.auth_mode, &config.jwt) {
        (AuthMode::Legacy, _) => Ok(legacy_token(&user.email, now)),
        (AuthMode::Secure, Some(jwt)) => JwtKeys::from(jwt).sign(user.id, now),
        (AuthMode::Secure, None) => anyhow::bail!("secure auth mode without JWT config"),
    }
}

#[cfg(test)]
mod token_tests {
    use super::*;
    use crate::state::AppState;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: String::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn legacy_token_is_literal_concatenation() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(
            legacy_token("a@b.co", now),
            "ignisshield::a@b.co::1700000000"
        );
    }

    #[test]
    fn legacy_mode_issues_parity_token() {
        let state = AppState::fake();
        let token = issue_token(&state.config, &user()).unwrap();
        let re = regex::Regex::new(r"^ignisshield::alice@example\.com::\d+$").unwrap();
        assert!(re.is_match(&token), "{token}");
    }

    #[test]
    fn secure_mode_issues_verifiable_jwt() {
        let state = AppState::fake_with_mode(AuthMode::Secure);
        let u = user();
        let token = issue_token(&state.config, &u).unwrap();

        let mut validation = Validation::default();
        validation.set_audience(&["test-aud"]);
        validation.set_issuer(&["test-issuer"]);
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(b"test"), &validation)
            .expect("valid jwt");
        assert_eq!(data.claims.sub, u.id);
        assert_eq!(data.claims.exp - data.claims.iat, TOKEN_TTL_SECS as usize);
    }

    #[test]
    fn jwt_rejected_under_other_secret() {
        let state = AppState::fake_with_mode(AuthMode::Secure);
        let token = issue_token(&state.config, &user()).unwrap();

        let mut validation = Validation::default();
        validation.set_audience(&["test-aud"]);
        assert!(decode::<Claims>(&token, &DecodingKey::from_secret(b"other"), &validation).is_err());
    }

    #[test]
    fn password_matching_per_mode() {
        assert!(password_matches(AuthMode::Legacy, "pw", "pw"));
        assert!(!password_matches(AuthMode::Legacy, "pw", "PW"));

        let hash = stored_password(AuthMode::Secure, "pw").unwrap();
        assert_ne!(hash, "pw");
        assert!(password_matches(AuthMode::Secure, "pw", &hash));
        assert!(!password_matches(AuthMode::Secure, "nope", &hash));
        // plaintext rows left over from legacy mode never match
        assert!(!password_matches(AuthMode::Secure, "pw", "pw"));
    }
}
