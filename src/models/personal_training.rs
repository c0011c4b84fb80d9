//! Personal training scheduling models

use serde::{Deserialize, Serialize};

use super::resource::flexible_id;

/// A personal (one-to-one) class owned by a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalClass {
    #[serde(default, deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub instructor_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub training_type: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A bookable time window of one instructor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default, alias = "isAvailable")]
    pub available: bool,
}

/// Booking request for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBooking {
    pub personal_class_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
}

/// A booked session as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSession {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub personal_class_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "specializations")]
    pub specialties: Vec<String>,
}
