use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProviderRequest {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl CreateProviderRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err("name must be 1-100 characters".to_string());
        }
        let code = self.code.trim();
        if code.is_empty() || code.len() > 20 {
            return Err("code must be 1-20 characters".to_string());
        }
        Ok(())
    }
}
