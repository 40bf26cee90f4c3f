//! Account profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{FileUpload, MultipartForm};
use crate::types::MediaBaseUrl;

/// The logged-in user's profile, from `GET /profile/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Media path of the avatar.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub favorite_genre: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn avatar_url(&self, media: &MediaBaseUrl) -> Option<String> {
        self.avatar
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| media.resolve(p))
    }
}

/// Editable profile fields, sent as `multipart/form-data` to `PUT /profile/`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub phone: String,
    pub bio: String,
    pub favorite_genre: String,
    pub avatar: Option<FileUpload>,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            phone: profile.phone.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
            favorite_genre: profile.favorite_genre.clone().unwrap_or_default(),
            avatar: None,
        }
    }

    pub fn to_form(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("phone", &self.phone)
            .text("bio", &self.bio)
            .text("favorite_genre", &self.favorite_genre);
        match self.avatar {
            Some(ref avatar) => form.file("avatar", avatar.clone()),
            None => form,
        }
    }
}
