//! Data models module
//!
//! This module contains the backend entities and the response envelope

pub mod activity;
pub mod catalog;
pub mod envelope;
pub mod personal_training;
pub mod resource;
pub mod student;
pub mod unit;

// Re-export commonly used models
pub use activity::{Activity, ActivityType};
pub use catalog::{BillingPlan, Organization, TrainingArea};
pub use envelope::{ApiEnvelope, DetailPath, ErrorDetail, PageMeta};
pub use personal_training::{Instructor, PersonalClass, PersonalSession, SessionBooking, TimeSlot};
pub use resource::{Column, FilterSpec, Resource};
pub use student::{Enrollment, FinancialSummary, Student, StudentCategory, StudentCourse, StudentUser, Subscription};
pub use unit::Unit;
