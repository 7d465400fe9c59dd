use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COURSES: &str = "course";
pub const LESSONS: &str = "lesson";
pub const QUIZZES: &str = "quiz";
pub const ENROLLMENTS: &str = "enrollment";
pub const PROGRESS: &str = "progress";
pub const CERTIFICATES: &str = "certificate";
pub const PAYMENTS: &str = "payment";
pub const USERS: &str = "user";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "Accent & Spoken English")]
    AccentSpokenEnglish,
    #[serde(rename = "Personality Development")]
    PersonalityDevelopment,
    #[serde(rename = "Leadership & Corporate Communication")]
    LeadershipCorporateCommunication,
    #[serde(rename = "CPHQ & Healthcare Quality")]
    CphqHealthcareQuality,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Course {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub instructor: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub promo_video_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Video,
    Pdf,
    Text,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Lesson {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub answer: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Quiz {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Set on the quiz generated for a course that had none.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub seeded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Enrolled,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Enrollment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub status: EnrollmentStatus,
    /// Percent of the course's lessons completed, 0 to 100.
    #[serde(default)]
    pub progress: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Progress {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    #[serde(default)]
    pub last_lesson_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Certificate {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub course_id: String,
    pub certificate_code: String,
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gateway {
    #[default]
    Stripe,
    Razorpay,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Created,
    Paid,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Payment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub course_id: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub gateway: Gateway,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub session_id: Option<String>,
}

// --- request bodies ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnrollmentReq {
    pub user_id: String,
    pub course_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProgressUpdate {
    pub user_id: String,
    pub course_id: String,
    pub lesson_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CertificateReq {
    pub user_id: String,
    pub course_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateQuiz {
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizSubmission {
    pub quiz_id: String,
    pub answers: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentInit {
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub gateway: Gateway,
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CourseQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

// --- responses ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Created {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProgressResp {
    pub progress: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizResult {
    pub quiz_id: String,
    pub score: f64,
    pub correct: usize,
    pub total: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentSession {
    pub session_id: String,
    pub payment_id: String,
}
