use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub clinic_name: String,
    pub resend_api_key: String,
    pub resend_base_url: String,
    pub notify_from_email: String,
    pub insurance_seed: Vec<(String, String)>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDR not set, using default");
                    "0.0.0.0:3000".to_string()
                }),
            clinic_name: env::var("CLINIC_NAME")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_NAME not set, using default");
                    "Consultorio Medico".to_string()
                }),
            resend_api_key: env::var("RESEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("RESEND_API_KEY not set, email notifications disabled");
                    String::new()
                }),
            resend_base_url: env::var("RESEND_BASE_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            notify_from_email: env::var("NOTIFY_FROM_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("NOTIFY_FROM_EMAIL not set, using default");
                    "onboarding@resend.dev".to_string()
                }),
            insurance_seed: env::var("INSURANCE_PROVIDERS")
                .map(|raw| Self::parse_seed(&raw))
                .unwrap_or_else(|_| {
                    warn!("INSURANCE_PROVIDERS not set, starting with an empty provider list");
                    Vec::new()
                }),
        };

        if !config.is_email_configured() {
            warn!("Email notifications not fully configured - bookings will proceed without emails");
        }

        config
    }

    pub fn is_email_configured(&self) -> bool {
        !self.resend_api_key.is_empty() && !self.notify_from_email.is_empty()
    }

    /// Seed format: comma-separated `Name:CODE` pairs, e.g. `OSDE:OSDE,Swiss Medical:SM`.
    fn parse_seed(raw: &str) -> Vec<(String, String)> {
        raw.split(',')
            .filter_map(|entry| {
                let (name, code) = entry.split_once(':')?;
                let name = name.trim();
                let code = code.trim();
                if name.is_empty() || code.is_empty() {
                    warn!("Skipping malformed INSURANCE_PROVIDERS entry: {:?}", entry);
                    return None;
                }
                Some((name.to_string(), code.to_uppercase()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_pairs_and_uppercases_codes() {
        let seed = AppConfig::parse_seed("OSDE:osde, Swiss Medical:sm ,broken");
        assert_eq!(
            seed,
            vec![
                ("OSDE".to_string(), "OSDE".to_string()),
                ("Swiss Medical".to_string(), "SM".to_string()),
            ]
        );
    }
}
