use serde::{Deserialize, Serialize};

/// One account in the flat credentials file.
///
/// Serde field names follow the on-disk JSON the original deployment uses
/// (`usuario`, `nombre`, `nivel`), so an existing file keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
    #[serde(rename = "nombre")]
    pub display_name: String,
    #[serde(rename = "nivel", default = "default_role")]
    pub role: String,
    #[serde(default = "default_area")]
    pub area: String,
}

fn default_role() -> String {
    "usuario".to_string()
}

fn default_area() -> String {
    "General".to_string()
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_original_json_keys() {
        let json = r#"{
            "usuario": "ADMIN",
            "password": "admin123",
            "nombre": "ADMINISTRADOR",
            "nivel": "admin",
            "area": "SISTEMAS"
        }"#;
        let user: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "ADMIN");
        assert_eq!(user.display_name, "ADMINISTRADOR");
        assert!(user.is_admin());
    }

    #[test]
    fn missing_role_and_area_use_defaults() {
        let json = r#"{"usuario": "ANA", "password": "x", "nombre": "ANA"}"#;
        let user: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, "usuario");
        assert_eq!(user.area, "General");
        assert!(!user.is_admin());
    }
}
