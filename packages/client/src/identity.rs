//! Client identity and registration profile.
//!
//! The client identifier is derived from the profile, not generated: two people
//! with the same name, age and sex end up with the same identifier and the
//! coordinator treats the second registration as a reconnect of the first.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use huddle_server::infrastructure::dto::websocket::RegisterFrame;

/// Sex as declared in the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// Profile used to register with the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub sex: Sex,
    pub photo_data: String,
    pub additional_photo_data: Option<Vec<String>>,
}

impl Profile {
    /// Standard base64 of `"<first>-<last>-<age>-<sex>"`
    pub fn client_id(&self) -> String {
        derive_client_id(&self.first_name, &self.last_name, self.age, self.sex)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn register_frame(&self) -> RegisterFrame {
        RegisterFrame {
            client_id: self.client_id(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            photo_data: self.photo_data.clone(),
            additional_photo_data: self.additional_photo_data.clone(),
        }
    }
}

pub fn derive_client_id(first_name: &str, last_name: &str, age: u32, sex: Sex) -> String {
    STANDARD.encode(format!(
        "{}-{}-{}-{}",
        first_name,
        last_name,
        age,
        sex.as_str()
    ))
}
