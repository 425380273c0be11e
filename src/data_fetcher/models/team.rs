use serde::{Deserialize, Serialize};

pub type TeamId = i64;

/// A franchise as listed by the team directory. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub full_name: String,
    pub abbreviation: String,
    pub nickname: String,
    pub city: String,
    pub year_founded: i32,
}

impl Team {
    pub fn new(
        id: TeamId,
        full_name: &str,
        abbreviation: &str,
        nickname: &str,
        city: &str,
        year_founded: i32,
    ) -> Self {
        Self {
            id,
            full_name: full_name.to_string(),
            abbreviation: abbreviation.to_string(),
            nickname: nickname.to_string(),
            city: city.to_string(),
            year_founded,
        }
    }
}
