//! Professor workspace
//!
//! Scoped queries and writes over courses, sessions, absences and grades.
//! Every operation starts from the authenticated account, resolves its
//! professor profile and only ever touches records reachable through the
//! courses that profile owns. A record that exists but belongs to another
//! professor yields `Forbidden`, never `NotFound`.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

use crate::database::{AcademicRepository, DatabaseManager, GradeFilter, Owned};
use crate::error::{AppError, AppResult};
use crate::logging::{log_absence_change, log_grade_batch};
use crate::models::{
    Absence, AbsenceUpdate, AbsenceView, CourseView, Grade, GradeStatus, GradeUpdate, GradeView,
    NewGrade, Professor, SessionView, Student, User,
};
use crate::services::calendar::{day_window, week_window};
use crate::services::time_provider::TimeProvider;

const NOT_YOUR_SESSION: &str = "You are not allowed to manage this session";
const NOT_YOUR_COURSE: &str = "You are not allowed to manage this course";

/// Calendar span of a schedule listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleView {
    Day,
    #[default]
    Week,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub view: Option<ScheduleView>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceQuery {
    pub session_id: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeQuery {
    pub course_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<GradeStatus>,
}

/// Body of an absence to be recorded
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRequest {
    pub student_id: Option<String>,
    pub session_id: Option<String>,
    pub justified: Option<bool>,
    pub reason: Option<String>,
}

/// Body of a grade to be created
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_id: Option<String>,
    pub student_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub status: Option<GradeStatus>,
}

/// One entry of a batch grade insertion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGradeEntry {
    pub student_id: String,
    pub course_id: String,
    pub title: String,
    pub score: f64,
    #[serde(default)]
    pub comment: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchGradeRequest {
    #[serde(default)]
    pub grades: Vec<BatchGradeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchGradeOutcome {
    pub count: usize,
    pub grades: Vec<Grade>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct ProfessorService {
    db: DatabaseManager,
    clock: Arc<dyn TimeProvider>,
    timezone: Tz,
}

impl ProfessorService {
    pub fn new(db: DatabaseManager, clock: Arc<dyn TimeProvider>, timezone: Tz) -> Self {
        Self { db, clock, timezone }
    }

    async fn professor_for(&self, identity: &User) -> AppResult<Professor> {
        self.db
            .find_professor_by_user(&identity.id)
            .await?
            .ok_or_else(|| AppError::not_found("Professor profile"))
    }

    async fn owned_course_ids(&self, professor: &Professor) -> AppResult<Vec<String>> {
        let courses = self.db.find_courses_by_professor(&professor.id).await?;
        Ok(courses.into_iter().map(|view| view.course.id).collect())
    }

    /// Course must exist and belong to the professor
    async fn ensure_course_owned(&self, professor: &Professor, course_id: &str) -> AppResult<()> {
        let course = self
            .db
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;
        if !course.is_owned_by(&professor.id) {
            return Err(AppError::forbidden(NOT_YOUR_COURSE));
        }
        Ok(())
    }

    async fn ensure_student_exists(&self, student_id: &str) -> AppResult<Student> {
        self.db
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student"))
    }

    fn ensure_owner<T>(owned: &Owned<T>, professor: &Professor, message: &str) -> AppResult<()> {
        if owned.is_owned_by(&professor.id) {
            Ok(())
        } else {
            Err(AppError::forbidden(message))
        }
    }

    pub async fn my_courses(&self, identity: &User) -> AppResult<Vec<CourseView>> {
        let professor = self.professor_for(identity).await?;
        self.db.find_courses_by_professor(&professor.id).await
    }

    /// Sessions of owned courses in the day or week containing the reference date
    pub async fn my_sessions(&self, identity: &User, query: SessionQuery) -> AppResult<Vec<SessionView>> {
        let professor = self.professor_for(identity).await?;
        let course_ids = self.owned_course_ids(&professor).await?;

        let date = query
            .date
            .unwrap_or_else(|| self.clock.today_in_timezone(self.timezone));
        let window = match query.view.unwrap_or_default() {
            ScheduleView::Day => day_window(date, self.timezone),
            ScheduleView::Week => week_window(date, self.timezone),
        };

        self.db.find_sessions_by_courses(&course_ids, Some(window)).await
    }

    /// Absences on owned sessions, optionally narrowed to one course or session
    pub async fn my_absences(&self, identity: &User, query: AbsenceQuery) -> AppResult<Vec<AbsenceView>> {
        let professor = self.professor_for(identity).await?;
        let mut course_ids = self.owned_course_ids(&professor).await?;

        let course_filter = required(query.course_id);
        if let Some(course_id) = &course_filter {
            course_ids.retain(|id| id == course_id);
        }

        let sessions = self.db.find_sessions_by_courses(&course_ids, None).await?;
        let mut session_ids: Vec<String> = sessions.into_iter().map(|view| view.session.id).collect();

        if course_filter.is_none() {
            if let Some(session_id) = required(query.session_id) {
                session_ids.retain(|id| *id == session_id);
            }
        }

        self.db.find_absences_by_sessions(&session_ids).await
    }

    #[instrument(skip(self, identity, request), fields(user_id = %identity.id))]
    pub async fn record_absence(&self, identity: &User, request: AbsenceRequest) -> AppResult<Absence> {
        let (Some(student_id), Some(session_id)) =
            (required(request.student_id), required(request.session_id))
        else {
            return Err(AppError::validation_error("studentId and sessionId are required"));
        };

        let professor = self.professor_for(identity).await?;
        let session = self
            .db
            .find_session_with_owner(&session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session"))?;
        Self::ensure_owner(&session, &professor, NOT_YOUR_SESSION)?;
        self.ensure_student_exists(&student_id).await?;

        let mut absence = Absence::record(&student_id, &session.record, self.clock.now_utc());
        absence.apply(AbsenceUpdate {
            justified: request.justified,
            reason: request.reason,
        });

        self.db.insert_absence(&absence).await.map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::conflict("An absence is already recorded for this student and session")
            }
            other => other,
        })?;

        log_absence_change("create", &absence.id, &professor.id);
        Ok(absence)
    }

    pub async fn update_absence(
        &self,
        identity: &User,
        absence_id: &str,
        update: AbsenceUpdate,
    ) -> AppResult<Absence> {
        let professor = self.professor_for(identity).await?;
        let mut owned = self
            .db
            .find_absence_with_owner(absence_id)
            .await?
            .ok_or_else(|| AppError::not_found("Absence"))?;
        Self::ensure_owner(&owned, &professor, NOT_YOUR_SESSION)?;

        owned.record.apply(update);
        self.db.update_absence(&owned.record).await?;

        log_absence_change("update", absence_id, &professor.id);
        Ok(owned.record)
    }

    pub async fn delete_absence(&self, identity: &User, absence_id: &str) -> AppResult<()> {
        let professor = self.professor_for(identity).await?;
        let owned = self
            .db
            .find_absence_with_owner(absence_id)
            .await?
            .ok_or_else(|| AppError::not_found("Absence"))?;
        Self::ensure_owner(&owned, &professor, NOT_YOUR_SESSION)?;

        self.db.delete_absence(absence_id).await?;

        log_absence_change("delete", absence_id, &professor.id);
        Ok(())
    }

    /// Grades on owned courses, optionally narrowed to one course
    pub async fn my_grades(&self, identity: &User, query: GradeQuery) -> AppResult<Vec<GradeView>> {
        let professor = self.professor_for(identity).await?;
        let mut course_ids = self.owned_course_ids(&professor).await?;

        if let Some(course_id) = required(query.course_id) {
            course_ids.retain(|id| *id == course_id);
        }

        let filter = GradeFilter {
            student_id: required(query.student_id),
            status: query.status,
        };
        self.db.find_grades_by_courses(&course_ids, &filter).await
    }

    pub async fn create_grade(&self, identity: &User, request: GradeRequest) -> AppResult<Grade> {
        let title = required(request.title);
        let course_id = required(request.course_id);
        let student_id = required(request.student_id);
        let (Some(title), Some(course_id), Some(student_id), Some(due_date)) =
            (title, course_id, student_id, request.due_date)
        else {
            return Err(AppError::validation_error(
                "title, courseId, studentId and dueDate are required",
            ));
        };

        let professor = self.professor_for(identity).await?;
        self.ensure_course_owned(&professor, &course_id).await?;
        self.ensure_student_exists(&student_id).await?;

        let grade = Grade::create(
            NewGrade {
                title,
                description: request.description.unwrap_or_default(),
                course_id,
                student_id,
                due_date,
                score: request.score,
                comment: request.comment.unwrap_or_default(),
                status: request.status,
            },
            self.clock.now_utc(),
        )?;

        self.db.insert_grade(&grade).await?;
        Ok(grade)
    }

    pub async fn update_grade(
        &self,
        identity: &User,
        grade_id: &str,
        update: GradeUpdate,
    ) -> AppResult<Grade> {
        let professor = self.professor_for(identity).await?;
        let mut owned = self
            .db
            .find_grade_with_owner(grade_id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade"))?;
        Self::ensure_owner(&owned, &professor, NOT_YOUR_COURSE)?;

        owned.record.apply(update)?;
        self.db.update_grade(&owned.record).await?;
        Ok(owned.record)
    }

    pub async fn delete_grade(&self, identity: &User, grade_id: &str) -> AppResult<()> {
        let professor = self.professor_for(identity).await?;
        let owned = self
            .db
            .find_grade_with_owner(grade_id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade"))?;
        Self::ensure_owner(&owned, &professor, NOT_YOUR_COURSE)?;

        self.db.delete_grade(grade_id).await?;
        Ok(())
    }

    /// Insert graded records in order without a transaction.
    ///
    /// Course ownership is checked for the whole batch before any write. The
    /// first entry that fails stops the batch; entries already inserted stay
    /// and the error carries how many were persisted.
    #[instrument(skip(self, identity, request), fields(user_id = %identity.id))]
    pub async fn batch_grades(
        &self,
        identity: &User,
        request: BatchGradeRequest,
    ) -> AppResult<BatchGradeOutcome> {
        if request.grades.is_empty() {
            return Err(AppError::validation_error("At least one grade is required"));
        }

        let professor = self.professor_for(identity).await?;
        let course_ids: BTreeSet<&str> = request
            .grades
            .iter()
            .map(|entry| entry.course_id.as_str())
            .collect();
        for course_id in course_ids {
            self.ensure_course_owned(&professor, course_id).await?;
        }

        let requested = request.grades.len();
        let mut persisted = Vec::with_capacity(requested);
        for entry in request.grades {
            match self.insert_batch_entry(entry).await {
                Ok(grade) => persisted.push(grade),
                Err(cause) => {
                    log_grade_batch(&professor.id, requested, persisted.len());
                    return Err(AppError::BatchAborted {
                        persisted: persisted.len(),
                        cause: Box::new(cause),
                    });
                }
            }
        }

        log_grade_batch(&professor.id, requested, persisted.len());
        Ok(BatchGradeOutcome {
            count: persisted.len(),
            grades: persisted,
        })
    }

    async fn insert_batch_entry(&self, entry: BatchGradeEntry) -> AppResult<Grade> {
        self.ensure_student_exists(&entry.student_id).await?;

        let now = self.clock.now_utc();
        let grade = Grade::create(
            NewGrade {
                title: entry.title,
                description: String::new(),
                course_id: entry.course_id,
                student_id: entry.student_id,
                due_date: entry.due_date.unwrap_or(now),
                score: Some(entry.score),
                comment: entry.comment,
                status: Some(GradeStatus::Graded),
            },
            now,
        )?;

        self.db.insert_grade(&grade).await?;
        Ok(grade)
    }

    /// All students; the caller only needs to be a professor
    pub async fn list_students(&self, identity: &User) -> AppResult<Vec<Student>> {
        self.professor_for(identity).await?;
        self.db.list_students().await
    }

    /// Students of an owned course. There is no enrolment relation, so every
    /// student is returned once ownership is established.
    pub async fn course_students(&self, identity: &User, course_id: &str) -> AppResult<Vec<Student>> {
        let professor = self.professor_for(identity).await?;
        self.ensure_course_owned(&professor, course_id).await?;
        self.db.list_students().await
    }
}
