use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
