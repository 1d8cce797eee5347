//! Demo data
//!
//! Populates an empty database with a small, coherent campus: accounts for
//! every role, two professors with courses, sessions around the current
//! week, some absences and grades, and a club with an upcoming event.

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::info;

use super::connection::DatabaseManager;
use crate::error::AppResult;
use crate::models::{
    Absence, Club, Course, Department, Event, Grade, NewClub, NewEvent, NewGrade, Professor, Role,
    Room, RoomKind, Semester, Session, SessionKind, Student, User,
};
use crate::services::auth_service::{generate_salt, hash_password};
use crate::services::calendar::{local_midnight, week_start};
use crate::services::time_provider::TimeProvider;

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password123";

struct Seeder<'a> {
    db: &'a DatabaseManager,
    clock: &'a dyn TimeProvider,
    tz: Tz,
}

impl Seeder<'_> {
    async fn user(&self, name: &str, email: &str, role: Role) -> AppResult<User> {
        let salt = generate_salt();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: User::normalize_email(email),
            password_hash: hash_password(DEMO_PASSWORD, &salt),
            salt,
            photo_url: String::new(),
            role,
            created_at: self.clock.now_utc(),
        };
        self.db.insert_user(&user).await?;
        Ok(user)
    }

    async fn professor(&self, name: &str, email: &str, number: &str, specialty: &str) -> AppResult<Professor> {
        let user = self.user(name, email, Role::Professor).await?;
        let professor = Professor {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id,
            name: user.name,
            email: user.email,
            employee_number: number.to_string(),
            specialty: specialty.to_string(),
            office: Professor::DEFAULT_OFFICE.to_string(),
        };
        self.db.insert_professor(&professor).await?;
        Ok(professor)
    }

    async fn student(&self, name: &str, email: &str, role: Role, number: &str) -> AppResult<Student> {
        let user = self.user(name, email, role).await?;
        let student = Student {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id,
            name: user.name,
            email: user.email,
            registration_number: number.to_string(),
            program: "Computer Engineering".to_string(),
            study_year: 3,
        };
        self.db.insert_student(&student).await?;
        Ok(student)
    }

    async fn session(
        &self,
        course: &Course,
        room: &Room,
        date: NaiveDate,
        start: &str,
        end: &str,
        kind: SessionKind,
    ) -> AppResult<Session> {
        let session = Session::new(&course.id, &room.id, local_midnight(date, self.tz), start, end, kind)?;
        self.db.insert_session(&session).await?;
        Ok(session)
    }
}

/// Seed demo data when no account exists yet. Returns whether anything was written.
pub async fn seed_demo_data(db: &DatabaseManager, clock: &dyn TimeProvider, tz: Tz) -> AppResult<bool> {
    if db.count_users().await? > 0 {
        info!("Database already populated, skipping demo data");
        return Ok(false);
    }

    let seeder = Seeder { db, clock, tz };
    let now = clock.now_utc();
    let today = clock.today_in_timezone(tz);
    let monday = week_start(today);

    seeder.user("Campus Admin", "admin@upf.ma", Role::Admin).await?;
    let prof1 = seeder
        .professor("Amina El Idrissi", "prof1@upf.ma", "EMP-001", "Algorithms")
        .await?;
    let prof2 = seeder
        .professor("Youssef Benali", "prof2@upf.ma", "EMP-002", "Mathematics")
        .await?;
    let student1 = seeder
        .student("Salma Tazi", "student1@upf.ma", Role::Student, "REG-2023-001")
        .await?;
    let student2 = seeder
        .student("Omar Alaoui", "student2@upf.ma", Role::Student, "REG-2023-002")
        .await?;
    let president = seeder
        .student("Ines Berrada", "president@upf.ma", Role::ClubPresident, "REG-2022-014")
        .await?;

    let department = Department {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Computer Science".to_string(),
        code: "CS".to_string(),
        description: "Software and computing".to_string(),
    };
    db.insert_department(&department).await?;

    let rooms = [
        ("A101", "Building A", 40, RoomKind::Classroom),
        ("AMPHI-1", "Main Building", 200, RoomKind::Amphitheater),
        ("LAB-3", "Building C", 24, RoomKind::LabRoom),
    ]
    .map(|(number, building, capacity, kind)| Room {
        id: uuid::Uuid::new_v4().to_string(),
        number: number.to_string(),
        building: building.to_string(),
        capacity,
        kind,
    });
    for room in &rooms {
        db.insert_room(room).await?;
    }
    let [classroom, amphitheater, lab] = &rooms;

    let algorithms = Course::new("Algorithms", "INF301", 4, Semester::S3, &prof1.id, Some(department.id.clone()))?;
    let databases = Course::new("Databases", "INF305", 3, Semester::S3, &prof1.id, Some(department.id.clone()))?;
    let analysis = Course::new("Real Analysis", "MAT201", 5, Semester::S2, &prof2.id, None)?;
    for course in [&algorithms, &databases, &analysis] {
        db.insert_course(course).await?;
    }

    let last_week = monday - Duration::days(7);
    let past = seeder
        .session(&algorithms, amphitheater, last_week + Duration::days(1), "08:30", "10:30", SessionKind::Lecture)
        .await?;
    let this_monday = seeder
        .session(&algorithms, classroom, monday, "10:45", "12:15", SessionKind::Tutorial)
        .await?;
    seeder
        .session(&databases, lab, today, "14:00", "16:00", SessionKind::Lab)
        .await?;
    seeder
        .session(&databases, amphitheater, monday + Duration::days(4), "08:30", "10:30", SessionKind::Lecture)
        .await?;
    seeder
        .session(&analysis, amphitheater, monday + Duration::days(2), "14:00", "16:00", SessionKind::Lecture)
        .await?;

    let mut justified = Absence::record(&student1.id, &past, now);
    justified.justified = true;
    justified.reason = "Medical certificate".to_string();
    db.insert_absence(&justified).await?;
    db.insert_absence(&Absence::record(&student2.id, &this_monday, now)).await?;

    let graded = Grade::create(
        NewGrade {
            title: "Sorting assignment".to_string(),
            description: "Implement merge sort and quicksort".to_string(),
            course_id: algorithms.id.clone(),
            student_id: student1.id.clone(),
            due_date: now - Duration::days(3),
            score: Some(15.5),
            comment: "Good complexity analysis".to_string(),
            status: None,
        },
        now,
    )?;
    let pending = Grade::create(
        NewGrade {
            title: "SQL project".to_string(),
            description: String::new(),
            course_id: databases.id.clone(),
            student_id: student2.id.clone(),
            due_date: now + Duration::days(10),
            score: None,
            comment: String::new(),
            status: None,
        },
        now,
    )?;
    db.insert_grade(&graded).await?;
    db.insert_grade(&pending).await?;

    let club = Club::create(
        NewClub {
            name: "Robotics Club".to_string(),
            description: "Build and program robots".to_string(),
            logo: String::new(),
            president_id: Some(president.id.clone()),
        },
        now,
    )?;
    db.insert_club(&club).await?;
    db.add_club_member(&club.id, &president.id).await?;
    db.add_club_member(&club.id, &student1.id).await?;

    let event_day = monday + Duration::days(9);
    let event = Event::create(
        NewEvent {
            club_id: club.id.clone(),
            title: "Line follower workshop".to_string(),
            description: format!("Hands-on session, week {}", event_day.iso_week().week()),
            date: event_day,
            time: "15:00".to_string(),
            location: "LAB-3".to_string(),
            photo: String::new(),
            seats_available: 24,
        },
        now,
    )?;
    db.insert_event(&event).await?;
    db.add_event_participant(&event.id, &student2.id).await?;

    info!("Demo data seeded");
    Ok(true)
}
