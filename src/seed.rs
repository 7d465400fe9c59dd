use crate::{
    db::{to_document, Filter, Store, StoreResult},
    models::{Category, Course, Level, Question, Quiz, COURSES},
};

#[allow(clippy::too_many_arguments)]
fn course(
    title: &str,
    category: Category,
    description: &str,
    instructor: &str,
    level: Level,
    tags: &[&str],
    price: f64,
    thumbnail_url: &str,
) -> Course {
    Course {
        id: None,
        title: title.into(),
        category,
        description: description.into(),
        instructor: instructor.into(),
        level,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        price,
        thumbnail_url: Some(thumbnail_url.into()),
        promo_video_url: None,
    }
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        course(
            "IELTS Mastery Program",
            Category::Ielts,
            "Comprehensive IELTS prep with practice tests and feedback.",
            "Dr. Aisha Khan",
            Level::Intermediate,
            &["IELTS", "Exam"],
            149.0,
            "https://images.unsplash.com/photo-1523580846011-d3a5bc25702b",
        ),
        course(
            "British Accent & Spoken English",
            Category::AccentSpokenEnglish,
            "Refine pronunciation, rhythm and intonation with native patterns.",
            "James Parker",
            Level::Beginner,
            &["Accent", "Speaking"],
            129.0,
            "https://images.unsplash.com/photo-1529078155058-5d716f45d604",
        ),
        course(
            "Personality Development & Soft Skills",
            Category::PersonalityDevelopment,
            "Boost confidence, presence and workplace communication.",
            "Neha Sharma",
            Level::Beginner,
            &["Soft Skills", "Confidence"],
            99.0,
            "https://images.unsplash.com/photo-1522071820081-009f0129c71c",
        ),
        course(
            "Leadership & Corporate Communication",
            Category::LeadershipCorporateCommunication,
            "Lead with clarity: executive presence, influence and storytelling.",
            "Rahul Verma",
            Level::Advanced,
            &["Leadership", "Corporate"],
            199.0,
            "https://images.unsplash.com/photo-1521791136064-7986c2920216",
        ),
        course(
            "CPHQ & Healthcare Quality Training",
            Category::CphqHealthcareQuality,
            "Prepare for CPHQ with quality frameworks, patient safety and analytics.",
            "Dr. Sara Malik",
            Level::Advanced,
            &["CPHQ", "Healthcare"],
            249.0,
            "https://images.unsplash.com/photo-1584982751687-51f29c073f0f",
        ),
    ]
}

/// Fills an empty course catalog with the sample courses. Returns how many
/// were inserted.
pub async fn seed_courses(store: &dyn Store) -> StoreResult<usize> {
    if store.count(COURSES, &Filter::new()).await? > 0 {
        tracing::debug!("course catalog already populated, skipping seed");
        return Ok(0);
    }
    let courses = sample_courses();
    for c in &courses {
        store.insert(COURSES, to_document(COURSES, c)?).await?;
    }
    tracing::info!(count = courses.len(), "seeded course catalog");
    Ok(courses.len())
}

/// Quiz handed out for a course that has none of its own.
pub fn default_quiz(course_id: &str) -> Quiz {
    Quiz {
        id: None,
        course_id: course_id.into(),
        title: "Quick Check".into(),
        questions: vec![
            Question {
                question: "Effective communication is primarily about?".into(),
                options: vec![
                    "Speaking".into(),
                    "Listening".into(),
                    "Grammar".into(),
                    "Accent".into(),
                ],
                answer: 1,
            },
            Question {
                question: "IELTS stands for?".into(),
                options: vec![
                    "International English Language Testing System".into(),
                    "Indian English Language Test Suite".into(),
                    "Integrated ELT System".into(),
                    "None".into(),
                ],
                answer: 0,
            },
        ],
        seeded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn seeds_only_an_empty_catalog() {
        let store = MemoryStore::new();
        assert_eq!(seed_courses(&store).await.unwrap(), 5);
        assert_eq!(seed_courses(&store).await.unwrap(), 0);
        assert_eq!(store.count(COURSES, &Filter::new()).await.unwrap(), 5);
    }

    #[test]
    fn default_quiz_answers_are_valid_options() {
        let quiz = default_quiz("c1");
        assert_eq!(quiz.questions.len(), 2);
        for q in &quiz.questions {
            assert!(q.answer < q.options.len());
        }
    }
}
