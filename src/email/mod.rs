pub mod templates;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Set-password link for users created by an admin or coordinator.
    pub async fn send_set_password(
        &self,
        to_email: &str,
        to_name: &str,
        link: &str,
    ) -> Result<(), String> {
        let html = templates::render_set_password(to_name, link);
        self.send(to_email, "Defina sua senha - ReservaLab", &html)
            .await
    }

    /// Account-activation link for self-registered students.
    pub async fn send_activation(
        &self,
        to_email: &str,
        to_name: &str,
        link: &str,
    ) -> Result<(), String> {
        let html = templates::render_activation(to_name, link);
        self.send(to_email, "Ative sua conta - ReservaLab", &html)
            .await
    }

    pub async fn send_password_reset(
        &self,
        to_email: &str,
        to_name: &str,
        link: &str,
    ) -> Result<(), String> {
        let html = templates::render_password_reset(to_name, link);
        self.send(to_email, "Redefinição de senha - ReservaLab", &html)
            .await
    }

    pub async fn send_two_factor_code(&self, to_email: &str, code: &str) -> Result<(), String> {
        let html = templates::render_two_factor_code(code);
        self.send(to_email, "Seu código de verificação - ReservaLab", &html)
            .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}
