//! User identity and registration types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use echoppe_core::UserId;

/// A shop user as returned by the backend's user-listing endpoint.
///
/// Replaced wholesale on each successful profile fetch and cleared on
/// logout. The `password` field is part of the listing response and is only
/// used to re-derive the profile (the API has no whoami endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub name: Name,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone: String,
}

impl User {
    /// First and last name joined with a space, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.firstname, self.name.lastname)
            .trim()
            .to_owned()
    }
}

/// Split name as the backend models it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

/// Postal address as the backend models it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub geolocation: Geolocation,
}

/// Geographic coordinates, kept as strings to match the API wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub long: String,
}

/// Login credentials supplied by the UI.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Build credentials from plain strings.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Credentials cached in local storage so the profile can be re-derived
/// after a restart.
///
/// The password is obfuscated (reversible encoding), not encrypted - this
/// is a workaround for the API lacking a profile endpoint, not a security
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedCredentials {
    pub username: String,
    pub password: String,
}

/// Registration form data as collected by the UI (nested shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: Name,
    pub address: Address,
    #[serde(default)]
    pub phone: String,
}

/// User-creation payload in the flattened shape the backend expects:
/// first and last name at the top level, house number and zipcode lifted
/// out of the address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserPayload {
    pub email: String,
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub address: PayloadAddress,
    pub number: u32,
    pub zipcode: String,
    pub phone: String,
}

/// Address substructure of [`NewUserPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAddress {
    pub city: String,
    pub street: String,
    pub geolocation: Geolocation,
}

impl From<RegistrationData> for NewUserPayload {
    fn from(data: RegistrationData) -> Self {
        let geolocation = Geolocation {
            lat: default_coordinate(data.address.geolocation.lat),
            long: default_coordinate(data.address.geolocation.long),
        };

        Self {
            email: data.email,
            username: data.username,
            password: data.password,
            firstname: data.name.firstname,
            lastname: data.name.lastname,
            address: PayloadAddress {
                city: data.address.city,
                street: data.address.street,
                geolocation,
            },
            number: data.address.number,
            zipcode: data.address.zipcode,
            phone: data.phone,
        }
    }
}

/// The backend rejects empty coordinates, so missing values become "0".
fn default_coordinate(value: String) -> String {
    if value.is_empty() {
        "0".to_owned()
    } else {
        value
    }
}
