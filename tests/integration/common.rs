//! Shared campus fixture for integration tests
//!
//! Builds an in-memory database, a pinned clock and the application state,
//! plus helpers to create accounts, courses, sessions and absences.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum_test::TestServer;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use campus_portal::config::Config;
use campus_portal::database::DatabaseManager;
use campus_portal::models::{
    Absence, Course, Professor, Role, Room, RoomKind, Semester, Session, SessionKind, Student, User,
};
use campus_portal::services::calendar::local_midnight;
use campus_portal::services::{MockTimeProvider, NewAccount, TimeProvider};
use campus_portal::{create_router, AppState};

pub const PASSWORD: &str = "secret-pass";

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct TestCampus {
    pub db: DatabaseManager,
    pub clock: Arc<MockTimeProvider>,
    pub state: AppState,
    pub tz: Tz,
    room: Room,
}

impl TestCampus {
    /// Campus with calendar boundaries in UTC
    pub async fn new(now: DateTime<Utc>) -> Self {
        Self::with_timezone(now, "UTC").await
    }

    pub async fn with_timezone(now: DateTime<Utc>, timezone: &str) -> Self {
        let db = DatabaseManager::in_memory().await.unwrap();
        let clock = Arc::new(MockTimeProvider::new(now));

        let config = Config {
            timezone: timezone.to_string(),
            jwt_secret: "integration-test-secret".to_string(),
            frontend_dir: PathBuf::from("target/no-frontend"),
            enable_request_logging: false,
            ..Config::default()
        };
        let tz = config.tz();
        let state = AppState::new(db.clone(), config, clock.clone() as Arc<dyn TimeProvider>);

        let room = Room {
            id: uuid::Uuid::new_v4().to_string(),
            number: "B204".to_string(),
            building: "Building B".to_string(),
            capacity: 40,
            kind: RoomKind::Classroom,
        };
        db.insert_room(&room).await.unwrap();

        Self {
            db,
            clock,
            state,
            tz,
            room,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(create_router(self.state.clone())).unwrap()
    }

    pub async fn account(&self, name: &str, email: &str, role: Role) -> User {
        self.state
            .auth
            .create_account(NewAccount {
                name: name.to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role,
                photo_url: String::new(),
            })
            .await
            .unwrap()
    }

    pub async fn professor(&self, email: &str) -> (User, Professor) {
        let user = self.account("Professor", email, Role::Professor).await;
        let professor = Professor {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            employee_number: format!("EMP-{}", &user.id[..8]),
            specialty: "Computer Science".to_string(),
            office: Professor::DEFAULT_OFFICE.to_string(),
        };
        self.db.insert_professor(&professor).await.unwrap();
        (user, professor)
    }

    pub async fn student(&self, email: &str) -> (User, Student) {
        let user = self.account("Student", email, Role::Student).await;
        let student = Student {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            registration_number: format!("REG-{}", &user.id[..8]),
            program: "Computer Engineering".to_string(),
            study_year: 2,
        };
        self.db.insert_student(&student).await.unwrap();
        (user, student)
    }

    pub async fn course(&self, professor: &Professor, code: &str) -> Course {
        let course = Course::new(code, code, 4, Semester::S3, &professor.id, None).unwrap();
        self.db.insert_course(&course).await.unwrap();
        course
    }

    /// Session on a local calendar day; the stored date is that day's midnight
    pub async fn session(&self, course: &Course, date: NaiveDate, start: &str) -> Session {
        self.session_at(course, local_midnight(date, self.tz), start).await
    }

    pub async fn session_at(&self, course: &Course, date: DateTime<Utc>, start: &str) -> Session {
        let end = format!("{}:59", &start[..2]);
        let session = Session::new(&course.id, &self.room.id, date, start, &end, SessionKind::Lecture).unwrap();
        self.db.insert_session(&session).await.unwrap();
        session
    }

    pub async fn absence(&self, student: &Student, session: &Session) -> Absence {
        let absence = Absence::record(&student.id, session, self.clock.now_utc());
        self.db.insert_absence(&absence).await.unwrap();
        absence
    }

    /// `Authorization` header value carrying a fresh token for the user
    pub fn bearer(&self, user: &User) -> HeaderValue {
        let token = self.state.auth.issue_token(user).unwrap();
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }
}
