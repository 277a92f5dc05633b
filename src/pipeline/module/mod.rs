pub mod face_detection;
pub mod face_identification;
pub mod person_profile;
