use serde::Serialize;

/// Body of the password login request.
#[derive(Debug, Serialize)]
pub struct LoginPayload<'a> {
    pub login: &'a str,
    pub password: &'a str,
    pub undelete: bool,
    pub login_source: Option<&'a str>,
    pub gift_code_sku_id: Option<&'a str>,
}

impl<'a> LoginPayload<'a> {
    pub const fn new(login: &'a str, password: &'a str) -> Self {
        Self {
            login,
            password,
            undelete: false,
            login_source: None,
            gift_code_sku_id: None,
        }
    }
}

/// Body of the TOTP verification request.
#[derive(Debug, Serialize)]
pub struct TotpPayload<'a> {
    pub ticket: &'a str,
    pub code: &'a str,
}

/// Body of the create message request.
#[derive(Debug, Serialize)]
pub struct CreateMessagePayload<'a> {
    pub content: &'a str,
}

/// Body of the create DM channel request.
#[derive(Debug, Serialize)]
pub struct CreateDmPayload<'a> {
    pub recipient_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_payload_shape() {
        let value = serde_json::to_value(LoginPayload::new("me@example.com", "hunter2")).unwrap();

        assert_eq!(
            value,
            json!({
                "login": "me@example.com",
                "password": "hunter2",
                "undelete": false,
                "login_source": null,
                "gift_code_sku_id": null
            })
        );
    }
}
