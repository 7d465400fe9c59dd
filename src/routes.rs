use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::{
    db::{
        find_by_id, from_document, to_document, Document, Filter, FindOptions, StoreError, Update,
    },
    error::{AppError, AppResult},
    models::*,
    scoring, seed,
    state::AppState,
};

pub const API_NAME: &str = "Frontier Online Training Academy API";

const COURSE_LIST_LIMIT: usize = 100;
const LESSON_LIST_LIMIT: usize = 200;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(test_database))
        // catalog
        .route("/api/courses", get(list_courses))
        .route("/api/courses/:course_id", get(course_detail))
        .route("/api/lessons/:course_id", get(list_lessons))
        // learner flow
        .route("/api/enroll", post(enroll))
        .route("/api/progress", post(mark_progress))
        .route("/api/quizzes/submit", post(submit_quiz))
        .route("/api/quizzes/:course_id", get(get_quiz))
        .route("/api/certificates/issue", post(issue_certificate))
        .route("/api/payments/create-session", post(create_payment_session))
        // admin (unauthenticated)
        .route("/api/admin/courses", post(admin_create_course))
        .route("/api/admin/lessons", post(admin_create_lesson))
        .route("/api/admin/quizzes", post(admin_create_quiz))
        .route("/api/admin/users", post(admin_create_user))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "name": API_NAME, "status": "ok" }))
}

async fn test_database(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if !state.has_store() {
        return Ok(Json(json!({
            "backend": "ok",
            "database": "not available",
            "collections": [],
        })));
    }
    let collections = state.store()?.collections().await?;
    Ok(Json(json!({
        "backend": "ok",
        "database": "connected",
        "collections": collections,
    })))
}

// --- catalog ---

async fn list_courses(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<CourseQuery>, AppError>,
) -> AppResult<Json<Vec<Course>>> {
    let store = state.store()?;
    let mut filter = Filter::new();
    if let Some(category) = params.category.filter(|c| !c.is_empty()) {
        filter = filter.eq("category", category);
    }
    if let Some(q) = params.q.filter(|q| !q.is_empty()) {
        filter = filter.contains("title", q);
    }
    let docs = store
        .find_many(COURSES, &filter, FindOptions::limit(COURSE_LIST_LIMIT))
        .await?;
    Ok(Json(decode_all(docs)?))
}

async fn course_detail(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<Json<Course>> {
    let doc = find_by_id(state.store()?, COURSES, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;
    Ok(Json(from_document(doc)?))
}

async fn list_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<Json<Vec<Lesson>>> {
    let docs = state
        .store()?
        .find_many(
            LESSONS,
            &Filter::new().eq("course_id", course_id),
            FindOptions::limit(LESSON_LIST_LIMIT).sorted_by("order"),
        )
        .await?;
    Ok(Json(decode_all(docs)?))
}

// --- learner flow ---

async fn enroll(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<EnrollmentReq>, AppError>,
) -> AppResult<Json<Enrollment>> {
    let enrollment = Enrollment {
        id: None,
        user_id: req.user_id,
        course_id: req.course_id,
        status: EnrollmentStatus::Enrolled,
        progress: 0.0,
    };
    let key = Filter::pair(&enrollment.user_id, &enrollment.course_id);
    let (doc, created) = state
        .store()?
        .insert_if_absent(ENROLLMENTS, &key, to_document(ENROLLMENTS, &enrollment)?)
        .await?;
    if created {
        tracing::info!(
            user_id = %enrollment.user_id,
            course_id = %enrollment.course_id,
            "enrolled"
        );
    }
    Ok(Json(from_document(doc)?))
}

async fn mark_progress(
    State(state): State<AppState>,
    WithRejection(Json(p), _): WithRejection<Json<ProgressUpdate>, AppError>,
) -> AppResult<Json<ProgressResp>> {
    let store = state.store()?;
    let pair = Filter::pair(&p.user_id, &p.course_id);

    let record = Update::default()
        .set("last_lesson_id", p.lesson_id.clone())
        .set("updated_at", json!(Utc::now()))
        .add_to_set("completed_lessons", p.lesson_id.clone());
    let doc = store
        .update_one(PROGRESS, &pair, &record, true)
        .await?
        .ok_or_else(|| StoreError::LostInsert(PROGRESS.into()))?;
    let progress: Progress = from_document(doc)?;

    let total = store
        .count(LESSONS, &Filter::new().eq("course_id", p.course_id.clone()))
        .await?;
    let percent = scoring::completion_percent(progress.completed_lessons.len(), total);

    let status = if percent >= 100.0 {
        EnrollmentStatus::Completed
    } else {
        EnrollmentStatus::Enrolled
    };
    let enrollment = Update::default()
        .set("progress", percent)
        .set("status", status.as_str());
    store
        .update_one(ENROLLMENTS, &pair, &enrollment, true)
        .await?;

    Ok(Json(ProgressResp { progress: percent }))
}

async fn get_quiz(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<Json<Quiz>> {
    let store = state.store()?;
    let by_course = Filter::new().eq("course_id", course_id.clone());
    if let Some(doc) = store.find_one(QUIZZES, &by_course).await? {
        return Ok(Json(from_document(doc)?));
    }

    let quiz = seed::default_quiz(&course_id);
    let (doc, created) = store
        .insert_if_absent(
            QUIZZES,
            &by_course.eq("seeded", true),
            to_document(QUIZZES, &quiz)?,
        )
        .await?;
    if created {
        tracing::info!(course_id = %course_id, "seeded default quiz");
    }
    Ok(Json(from_document(doc)?))
}

async fn submit_quiz(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<QuizSubmission>, AppError>,
) -> AppResult<Json<QuizResult>> {
    let doc = find_by_id(state.store()?, QUIZZES, &payload.quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz"))?;
    let quiz: Quiz = from_document(doc)?;
    let grade = scoring::grade(&quiz.questions, &payload.answers);
    Ok(Json(QuizResult {
        quiz_id: quiz.id.unwrap_or(payload.quiz_id),
        score: grade.score,
        correct: grade.correct,
        total: grade.total,
    }))
}

async fn issue_certificate(
    State(state): State<AppState>,
    WithRejection(Query(req), _): WithRejection<Query<CertificateReq>, AppError>,
) -> AppResult<Json<Certificate>> {
    let code = certificate_code();
    let certificate = Certificate {
        id: None,
        url: Some(format!("{}/{}", state.config.certificate_base_url, code)),
        user_id: req.user_id,
        course_id: req.course_id,
        certificate_code: code,
        issued_at: Utc::now(),
    };
    let key = Filter::pair(&certificate.user_id, &certificate.course_id);
    let (doc, created) = state
        .store()?
        .insert_if_absent(CERTIFICATES, &key, to_document(CERTIFICATES, &certificate)?)
        .await?;
    if created {
        tracing::info!(
            user_id = %certificate.user_id,
            course_id = %certificate.course_id,
            code = %certificate.certificate_code,
            "issued certificate"
        );
    }
    Ok(Json(from_document(doc)?))
}

async fn create_payment_session(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<PaymentInit>, AppError>,
) -> AppResult<Json<PaymentSession>> {
    let store = state.store()?;
    let amount = find_by_id(store, COURSES, &req.course_id)
        .await?
        .and_then(|course| course.get("price").and_then(Value::as_f64))
        .unwrap_or(0.0);

    let session_id = session_id();
    let payment = Payment {
        id: None,
        user_id: req.user_id,
        course_id: req.course_id,
        amount,
        currency: req.currency,
        gateway: req.gateway,
        status: PaymentStatus::Created,
        session_id: Some(session_id.clone()),
    };
    let payment_id = store
        .insert(PAYMENTS, to_document(PAYMENTS, &payment)?)
        .await?;
    tracing::info!(%payment_id, %session_id, amount, "created payment session");
    Ok(Json(PaymentSession {
        session_id,
        payment_id,
    }))
}

// --- admin ---

async fn admin_create_course(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Course>, AppError>,
) -> AppResult<Json<Created>> {
    create(&state, COURSES, &payload).await
}

async fn admin_create_lesson(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Lesson>, AppError>,
) -> AppResult<Json<Created>> {
    create(&state, LESSONS, &payload).await
}

async fn admin_create_quiz(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateQuiz>, AppError>,
) -> AppResult<Json<Created>> {
    let quiz = Quiz {
        id: None,
        course_id: payload.course_id,
        title: payload.title,
        questions: payload.questions,
        seeded: false,
    };
    create(&state, QUIZZES, &quiz).await
}

async fn admin_create_user(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<User>, AppError>,
) -> AppResult<Json<Created>> {
    create(&state, USERS, &payload).await
}

// --- helpers ---

async fn create<T: Serialize>(
    state: &AppState,
    collection: &str,
    payload: &T,
) -> AppResult<Json<Created>> {
    let id = state
        .store()?
        .insert(collection, to_document(collection, payload)?)
        .await?;
    Ok(Json(Created { id }))
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(from_document).collect()
}

fn random_six_digits() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

fn certificate_code() -> String {
    format!("FO-{}", random_six_digits())
}

fn session_id() -> String {
    format!("sess_{}", random_six_digits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, db::Store, memory::MemoryStore};
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(store: Option<Arc<MemoryStore>>) -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        let store = store.map(|s| s as Arc<dyn Store>);
        router(AppState::new(store, config))
    }

    async fn seeded() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        seed::seed_courses(store.as_ref()).await.unwrap();
        (app_with(Some(store.clone())), store)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn root_reports_name() {
        let app = app_with(None);
        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], API_NAME);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn data_routes_fail_without_database() {
        let app = app_with(None);
        let (status, body) = send(&app, "GET", "/test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "not available");

        let (status, body) = send(&app, "GET", "/api/courses", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Database not available");
    }

    #[tokio::test]
    async fn test_route_lists_collections() {
        let (app, _) = seeded().await;
        let (_, body) = send(&app, "GET", "/test", None).await;
        assert_eq!(body["database"], "connected");
        assert_eq!(body["collections"], json!(["course"]));
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let (app, _) = seeded().await;
        let (status, body) = send(&app, "GET", "/api/courses?category=IELTS", None).await;
        assert_eq!(status, StatusCode::OK);
        let courses = body.as_array().unwrap();
        assert_eq!(courses.len(), 1);
        assert!(courses.iter().all(|c| c["category"] == "IELTS"));

        let (_, body) = send(&app, "GET", "/api/courses?category=ielts", None).await;
        assert!(body.as_array().unwrap().is_empty());

        let (_, body) = send(&app, "GET", "/api/courses?category=&q=", None).await;
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn title_search_ignores_case() {
        let (app, _) = seeded().await;
        let (_, body) = send(&app, "GET", "/api/courses?q=ielts", None).await;
        let courses = body.as_array().unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0]["title"], "IELTS Mastery Program");
    }

    #[tokio::test]
    async fn course_detail_by_id() {
        let (app, _) = seeded().await;
        let (_, body) = send(&app, "GET", "/api/courses", None).await;
        let id = body[0]["_id"].as_str().unwrap().to_string();

        let (status, course) = send(&app, "GET", &format!("/api/courses/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(course["_id"], id.as_str());

        let upper = id.to_uppercase();
        let (status, _) = send(&app, "GET", &format!("/api/courses/{upper}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/courses/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Course not found");
    }

    #[tokio::test]
    async fn enrolling_twice_returns_same_record() {
        let (app, store) = seeded().await;
        let req = json!({"user_id": "u1", "course_id": "c1"});
        let (status, first) = send(&app, "POST", "/api/enroll", Some(req.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(&app, "POST", "/api/enroll", Some(req)).await;

        assert_eq!(first, second);
        assert_eq!(first["status"], "enrolled");
        assert_eq!(first["progress"], 0.0);
        assert_eq!(store.count(ENROLLMENTS, &Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn progress_tracks_completed_lessons() {
        let (app, _) = seeded().await;
        for order in [3, 1, 2, 0] {
            let lesson = json!({
                "course_id": "c1",
                "title": format!("Lesson {order}"),
                "order": order,
            });
            let (status, _) = send(&app, "POST", "/api/admin/lessons", Some(lesson)).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, lessons) = send(&app, "GET", "/api/lessons/c1", None).await;
        let orders: Vec<_> = lessons
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["order"].clone())
            .collect();
        assert_eq!(orders, vec![json!(0), json!(1), json!(2), json!(3)]);

        let mark = |lesson: &str| json!({"user_id": "u1", "course_id": "c1", "lesson_id": lesson});
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark("L1"))).await;
        assert_eq!(body["progress"], 25.0);
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark("L1"))).await;
        assert_eq!(body["progress"], 25.0);
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark("L2"))).await;
        assert_eq!(body["progress"], 50.0);

        let (_, enrollment) = send(
            &app,
            "POST",
            "/api/enroll",
            Some(json!({"user_id": "u1", "course_id": "c1"})),
        )
        .await;
        assert_eq!(enrollment["progress"], 50.0);
        assert_eq!(enrollment["status"], "enrolled");

        send(&app, "POST", "/api/progress", Some(mark("L3"))).await;
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark("L4"))).await;
        assert_eq!(body["progress"], 100.0);
        let (_, enrollment) = send(
            &app,
            "POST",
            "/api/enroll",
            Some(json!({"user_id": "u1", "course_id": "c1"})),
        )
        .await;
        assert_eq!(enrollment["status"], "completed");
    }

    #[tokio::test]
    async fn enrollment_reopens_when_course_grows() {
        let (app, _) = seeded().await;
        let lesson = |title: &str| json!({"course_id": "c9", "title": title});
        let mark = json!({"user_id": "u1", "course_id": "c9", "lesson_id": "L1"});
        let enroll = json!({"user_id": "u1", "course_id": "c9"});

        send(&app, "POST", "/api/admin/lessons", Some(lesson("Intro"))).await;
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark.clone())).await;
        assert_eq!(body["progress"], 100.0);
        let (_, enrollment) = send(&app, "POST", "/api/enroll", Some(enroll.clone())).await;
        assert_eq!(enrollment["status"], "completed");

        send(&app, "POST", "/api/admin/lessons", Some(lesson("Wrap-up"))).await;
        let (_, body) = send(&app, "POST", "/api/progress", Some(mark)).await;
        assert_eq!(body["progress"], 50.0);
        let (_, enrollment) = send(&app, "POST", "/api/enroll", Some(enroll)).await;
        assert_eq!(enrollment["progress"], 50.0);
        assert_eq!(enrollment["status"], "enrolled");
    }

    #[tokio::test]
    async fn rejected_requests_answer_with_json_detail() {
        let (app, _) = seeded().await;
        let (status, body) =
            send(&app, "POST", "/api/enroll", Some(json!({"user_id": "u1"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("course_id"));

        let (status, body) = send(&app, "POST", "/api/certificates/issue?user_id=u1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, body) = send(&app, "POST", "/api/progress", None).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn progress_on_empty_course_divides_by_one() {
        let (app, _) = seeded().await;
        let (_, body) = send(
            &app,
            "POST",
            "/api/progress",
            Some(json!({"user_id": "u1", "course_id": "empty", "lesson_id": "x"})),
        )
        .await;
        assert_eq!(body["progress"], 100.0);
    }

    #[tokio::test]
    async fn seeded_quiz_is_scored_by_position() {
        let (app, store) = seeded().await;
        let (status, quiz) = send(&app, "GET", "/api/quizzes/c1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quiz["title"], "Quick Check");
        let quiz_id = quiz["_id"].as_str().unwrap().to_string();

        let (_, again) = send(&app, "GET", "/api/quizzes/c1", None).await;
        assert_eq!(again["_id"], quiz_id.as_str());
        assert_eq!(store.count(QUIZZES, &Filter::new()).await.unwrap(), 1);

        let (_, result) = send(
            &app,
            "POST",
            "/api/quizzes/submit",
            Some(json!({"quiz_id": quiz_id, "answers": [1, 0]})),
        )
        .await;
        assert_eq!(result["score"], 100.0);
        assert_eq!(result["quiz_id"], quiz_id.as_str());

        let (_, result) = send(
            &app,
            "POST",
            "/api/quizzes/submit",
            Some(json!({"quiz_id": quiz_id, "answers": [0, 0]})),
        )
        .await;
        assert_eq!(result["score"], 50.0);
    }

    #[tokio::test]
    async fn submitting_unknown_quiz_is_not_found() {
        let (app, _) = seeded().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/quizzes/submit",
            Some(json!({"quiz_id": "nope", "answers": [1]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Quiz not found");
    }

    #[tokio::test]
    async fn admin_quiz_takes_precedence_over_default() {
        let (app, _) = seeded().await;
        let quiz = json!({
            "course_id": "c2",
            "title": "Final",
            "questions": [{"question": "2+2?", "options": ["3", "4"], "answer": 1}],
        });
        let (status, created) = send(&app, "POST", "/api/admin/quizzes", Some(quiz)).await;
        assert_eq!(status, StatusCode::OK);
        let (_, fetched) = send(&app, "GET", "/api/quizzes/c2", None).await;
        assert_eq!(fetched["_id"], created["_id"]);
        assert_eq!(fetched["title"], "Final");
    }

    #[tokio::test]
    async fn admin_quiz_cannot_claim_seeded_flag() {
        let (app, store) = seeded().await;
        let quiz = json!({"course_id": "c3", "title": "Mock test", "seeded": true});
        for _ in 0..2 {
            let (status, _) = send(&app, "POST", "/api/admin/quizzes", Some(quiz.clone())).await;
            assert_eq!(status, StatusCode::OK);
        }
        let seeded = Filter::new().eq("course_id", "c3").eq("seeded", true);
        assert_eq!(store.count(QUIZZES, &seeded).await.unwrap(), 0);

        let (_, fetched) = send(&app, "GET", "/api/quizzes/c3", None).await;
        assert_eq!(fetched["title"], "Mock test");
        assert!(fetched.get("seeded").is_none());
    }

    #[tokio::test]
    async fn certificate_issue_is_idempotent() {
        let (app, _) = seeded().await;
        let uri = "/api/certificates/issue?user_id=u1&course_id=c1";
        let (status, first) = send(&app, "POST", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(&app, "POST", uri, None).await;

        let code = first["certificate_code"].as_str().unwrap();
        assert_eq!(second["certificate_code"], code);
        assert!(code.starts_with("FO-") && code.len() == 9);
        assert_eq!(
            first["url"],
            format!("https://certs.frontier.example/{code}").as_str()
        );
    }

    #[tokio::test]
    async fn payment_amount_comes_from_course_price() {
        let (app, store) = seeded().await;
        let (status, session) = send(
            &app,
            "POST",
            "/api/payments/create-session",
            Some(json!({"user_id": "u1", "course_id": "no-such-course"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(session["session_id"].as_str().unwrap().starts_with("sess_"));
        let payment = store
            .find_one(PAYMENTS, &Filter::by_id(session["payment_id"].as_str().unwrap()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment["amount"], 0.0);
        assert_eq!(payment["status"], "created");
        assert_eq!(payment["currency"], "USD");

        let course = store
            .find_one(COURSES, &Filter::new().eq("category", "IELTS"))
            .await
            .unwrap()
            .unwrap();
        let (_, session) = send(
            &app,
            "POST",
            "/api/payments/create-session",
            Some(json!({
                "user_id": "u1",
                "course_id": course["_id"],
                "gateway": "razorpay",
                "currency": "INR",
            })),
        )
        .await;
        let payment = store
            .find_one(PAYMENTS, &Filter::by_id(session["payment_id"].as_str().unwrap()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment["amount"], 149.0);
        assert_eq!(payment["gateway"], "razorpay");
    }

    #[tokio::test]
    async fn admin_create_validates_body() {
        let (app, _) = seeded().await;
        let bad = json!({
            "title": "Cooking",
            "category": "Cooking",
            "description": "d",
            "instructor": "i",
        });
        let (status, _) = send(&app, "POST", "/api/admin/courses", Some(bad)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let good = json!({
            "title": "IELTS Writing Lab",
            "category": "IELTS",
            "description": "Task 1 and 2 drills.",
            "instructor": "Dr. Aisha Khan",
        });
        let (status, created) = send(&app, "POST", "/api/admin/courses", Some(good)).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["_id"].as_str().unwrap();
        let (_, course) = send(&app, "GET", &format!("/api/courses/{id}"), None).await;
        assert_eq!(course["level"], "Beginner");
        assert_eq!(course["price"], 0.0);

        let user = json!({"name": "Ana", "email": "ana@example.com"});
        let (status, _) = send(&app, "POST", "/api/admin/users", Some(user)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
