use serde::Deserialize;

const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Deserialize)]
struct VerifyResponse {
    success: bool,
}

/// Verifies client-supplied reCAPTCHA tokens against the provider. Only
/// consulted once an email has accumulated repeated failed logins.
pub struct CaptchaVerifier {
    client: reqwest::Client,
    secret: String,
}

impl CaptchaVerifier {
    pub fn new(secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret,
        }
    }

    pub async fn verify(&self, token: &str) -> Result<bool, String> {
        let response = self
            .client
            .post(VERIFY_URL)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| format!("CAPTCHA verification request failed: {e}"))?;

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| format!("CAPTCHA verification response invalid: {e}"))?;

        Ok(body.success)
    }
}
