use serde::{Deserialize, Serialize};

// Field names double as JSON keys and column names; they are the wire
// contract and must not be renamed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub titol: String,
    pub autor: String,
    pub prestatge: String,
    pub posicio: String,
    pub habitacio: String,
    pub tipus: String,
    pub editorial: String,
    pub idioma: String,
    pub notes: String,
}

// Create/update payload: everything but the id, which is either assigned by
// the database (create) or taken from the request path (update). Absent
// fields decode as empty strings; emptiness is not validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDraft {
    #[serde(default)]
    pub titol: String,
    #[serde(default)]
    pub autor: String,
    #[serde(default)]
    pub prestatge: String,
    #[serde(default)]
    pub posicio: String,
    #[serde(default)]
    pub habitacio: String,
    #[serde(default)]
    pub tipus: String,
    #[serde(default)]
    pub editorial: String,
    #[serde(default)]
    pub idioma: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}
