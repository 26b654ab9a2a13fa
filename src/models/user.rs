use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

// Учетные данные для POST /users/login.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Тело запроса регистрации POST /users.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}
