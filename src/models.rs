use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub itemname: String,
    pub description: String,
    pub price: f64,
    pub cata: String,
    pub image: String,
}

/// The five mutable columns of a book. Create inserts them; update replaces
/// all of them at once (no partial-patch semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookFields {
    pub itemname: String,
    pub description: String,
    pub price: f64,
    pub cata: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Anything unrecognized in the role column degrades to customer.
    pub fn from_db(raw: &str) -> Role {
        if raw == "admin" {
            Role::Admin
        } else {
            Role::Customer
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub id: i32,
    pub quantity: i64,
}

/// Fields are optional so a missing one maps to a 400 instead of a
/// deserialization error; empty strings count as missing too.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
