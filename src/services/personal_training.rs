//! Personal training scheduling service

use serde_json::Value;
use tracing::{debug, info};

use super::resource::created_id;
use super::units::decode_list;
use crate::api::{ApiClient, ModuleApi, SaveMethod};
use crate::models::{Instructor, PersonalClass, PersonalSession, SessionBooking, Student, TimeSlot};
use crate::utils::errors::{AcademyError, Result};
use crate::utils::logging::log_admin_action;

const BASE: &str = "/api/personal-training";
const DEFAULT_LOCATION: &str = "Sala Personal Training";

#[derive(Debug, Clone)]
pub struct PersonalTrainingService {
    api: ModuleApi,
}

impl PersonalTrainingService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            api: ModuleApi::new("personal-training", client),
        }
    }

    pub async fn classes_for_student(&self, student_id: &str) -> Result<Vec<PersonalClass>> {
        let path = format!("{}/classes/student/{}", BASE, urlencoding::encode(student_id));
        let envelope = self.api.fetch_with_states(&path, &[]).await?.into_envelope();
        decode_list(envelope.data)
    }

    /// Open slots of one instructor on a `YYYY-MM-DD` date
    pub async fn available_slots(&self, instructor_id: &str, date: &str) -> Result<Vec<TimeSlot>> {
        let query = [
            ("instructorId".to_string(), instructor_id.to_string()),
            ("date".to_string(), date.to_string()),
        ];
        let envelope = self
            .api
            .fetch_with_states(&format!("{}/slots/available", BASE), &query)
            .await?
            .into_envelope();
        let slots: Vec<TimeSlot> = decode_list(envelope.data)?;
        debug!(instructor_id = %instructor_id, date = %date, slots = slots.len(), "Slots loaded");
        Ok(slots)
    }

    pub async fn available_instructors(&self) -> Result<Vec<Instructor>> {
        let envelope = self
            .api
            .fetch_with_states(&format!("{}/instructors/available", BASE), &[])
            .await?
            .into_envelope();
        decode_list(envelope.data)
    }

    /// Create a personal class and return its id
    pub async fn create_class(&self, class: &PersonalClass) -> Result<String> {
        let body = serde_json::to_value(class)?;
        let envelope = self
            .api
            .save_with_feedback(SaveMethod::Post, &format!("{}/classes", BASE), &body)
            .await?;
        let id = created_id(&envelope.data).ok_or_else(|| AcademyError::Api {
            message: "turma personal criada sem id".to_string(),
        })?;
        log_admin_action("personal-training", "create_class", Some(&id), Some(&class.student_id));
        Ok(id)
    }

    pub async fn book_session(&self, booking: &SessionBooking) -> Result<PersonalSession> {
        let body = serde_json::to_value(booking)?;
        let envelope = self
            .api
            .save_with_feedback(SaveMethod::Post, &format!("{}/sessions", BASE), &body)
            .await?;
        info!(
            personal_class_id = %booking.personal_class_id,
            date = %booking.date,
            start_time = %booking.start_time,
            "Personal session booked"
        );
        match envelope.data {
            Value::Null => Ok(PersonalSession {
                personal_class_id: Some(booking.personal_class_id.clone()),
                date: Some(booking.date.clone()),
                start_time: Some(booking.start_time.clone()),
                end_time: Some(booking.end_time.clone()),
                ..PersonalSession::default()
            }),
            data => Ok(serde_json::from_value(data)?),
        }
    }

    /// Reuse the student's first personal class, creating one if none exists
    pub async fn ensure_personal_class(&self, student: &Student, instructor_id: &str) -> Result<String> {
        let student_id = student.id.as_deref().ok_or_else(|| {
            AcademyError::InvalidInput("estudante sem id".to_string())
        })?;

        match self.classes_for_student(student_id).await {
            Ok(classes) => {
                if let Some(id) = classes.into_iter().find_map(|c| c.id) {
                    return Ok(id);
                }
            }
            Err(AcademyError::HttpStatus { status: 404, .. }) => {}
            Err(e) => return Err(e),
        }

        debug!(student_id = %student_id, "No personal class yet, creating one");
        self.create_class(&default_class(student, student_id, instructor_id)).await
    }

    /// Book a slot for a student, creating the personal class when needed
    pub async fn book_slot(
        &self,
        student: &Student,
        slot: &TimeSlot,
        date: &str,
    ) -> Result<PersonalSession> {
        let instructor_id = slot.instructor_id.as_deref().unwrap_or_default();
        let personal_class_id = self.ensure_personal_class(student, instructor_id).await?;
        let booking = SessionBooking {
            personal_class_id,
            date: date.to_string(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            location: Some(DEFAULT_LOCATION.to_string()),
        };
        self.book_session(&booking).await
    }
}

fn default_class(student: &Student, student_id: &str, instructor_id: &str) -> PersonalClass {
    PersonalClass {
        id: None,
        student_id: student_id.to_string(),
        instructor_id: instructor_id.to_string(),
        title: format!("Personal - {}", student.full_name()),
        description: Some("Personal training personalizado".to_string()),
        focus_areas: vec!["Técnicas básicas".to_string(), "Condicionamento".to_string()],
        training_type: Some("INDIVIDUAL".to_string()),
        intensity: Some("Intermediário".to_string()),
        duration: Some(60),
        location: Some(DEFAULT_LOCATION.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentUser;

    #[test]
    fn test_default_class_title_uses_full_name() {
        let student = Student {
            id: Some("s1".to_string()),
            user: StudentUser {
                first_name: "Lorraine".to_string(),
                last_name: "Silva".to_string(),
                ..StudentUser::default()
            },
            ..Student::default()
        };
        let class = default_class(&student, "s1", "inst-1");
        assert_eq!(class.title, "Personal - Lorraine Silva");
        assert_eq!(class.duration, Some(60));

        let body = serde_json::to_value(&class).unwrap();
        assert_eq!(body["studentId"], "s1");
        assert!(body.get("id").is_none());
    }
}
