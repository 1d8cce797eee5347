//! Write operations
//!
//! Inserts take fully validated models; uniqueness is left to the schema and
//! surfaces as `AppError::Conflict`.

use sqlx::{query, query_scalar};

use super::connection::DatabaseManager;
use crate::error::AppResult;
use crate::logging::log_database_operation;
use crate::models::{Absence, Course, Department, Grade, Professor, Room, Session, Student, User};

impl DatabaseManager {
    pub async fn count_users(&self) -> AppResult<i64> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn insert_user(&self, user: &User) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO users (id, name, email, password_hash, salt, photo_url, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(User::normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(&user.salt)
        .bind(&user.photo_url)
        .bind(user.role)
        .bind(user.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "users", Some(result.rows_affected()));
        Ok(())
    }

    /// Insert the profile part of a professor; the account must exist
    pub async fn insert_professor(&self, professor: &Professor) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO professors (id, user_id, employee_number, specialty, office)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&professor.id)
        .bind(&professor.user_id)
        .bind(&professor.employee_number)
        .bind(&professor.specialty)
        .bind(&professor.office)
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "professors", Some(result.rows_affected()));
        Ok(())
    }

    /// Insert the profile part of a student; the account must exist
    pub async fn insert_student(&self, student: &Student) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO students (id, user_id, registration_number, program, study_year)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.user_id)
        .bind(&student.registration_number)
        .bind(&student.program)
        .bind(student.study_year)
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "students", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn insert_department(&self, department: &Department) -> AppResult<()> {
        query("INSERT INTO departments (id, name, code, description) VALUES (?, ?, ?, ?)")
            .bind(&department.id)
            .bind(&department.name)
            .bind(&department.code)
            .bind(&department.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_room(&self, room: &Room) -> AppResult<()> {
        query("INSERT INTO rooms (id, number, building, capacity, kind) VALUES (?, ?, ?, ?, ?)")
            .bind(&room.id)
            .bind(&room.number)
            .bind(&room.building)
            .bind(room.capacity)
            .bind(room.kind)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_course(&self, course: &Course) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO courses (id, name, code, description, credits, semester, professor_id,
                                 department_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.id)
        .bind(&course.name)
        .bind(&course.code)
        .bind(&course.description)
        .bind(course.credits)
        .bind(course.semester)
        .bind(&course.professor_id)
        .bind(&course.department_id)
        .bind(course.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "courses", Some(result.rows_affected()));
        Ok(())
    }

    /// A room hosting another session at the same date and start time is a conflict.
    pub async fn insert_session(&self, session: &Session) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO sessions (id, course_id, room_id, date, start_time, end_time, kind, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.course_id)
        .bind(&session.room_id)
        .bind(session.date.timestamp_millis())
        .bind(&session.start_time)
        .bind(&session.end_time)
        .bind(session.kind)
        .bind(&session.notes)
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "sessions", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn insert_absence(&self, absence: &Absence) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO absences (id, student_id, session_id, date, justified, reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&absence.id)
        .bind(&absence.student_id)
        .bind(&absence.session_id)
        .bind(absence.date.timestamp_millis())
        .bind(absence.justified)
        .bind(&absence.reason)
        .bind(absence.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "absences", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn update_absence(&self, absence: &Absence) -> AppResult<()> {
        let result = query("UPDATE absences SET justified = ?, reason = ? WHERE id = ?")
            .bind(absence.justified)
            .bind(&absence.reason)
            .bind(&absence.id)
            .execute(&self.pool)
            .await?;

        log_database_operation("UPDATE", "absences", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn delete_absence(&self, absence_id: &str) -> AppResult<u64> {
        let result = query("DELETE FROM absences WHERE id = ?")
            .bind(absence_id)
            .execute(&self.pool)
            .await?;

        log_database_operation("DELETE", "absences", Some(result.rows_affected()));
        Ok(result.rows_affected())
    }

    pub async fn insert_grade(&self, grade: &Grade) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO grades (id, title, description, course_id, student_id, due_date, score,
                                comment, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&grade.id)
        .bind(&grade.title)
        .bind(&grade.description)
        .bind(&grade.course_id)
        .bind(&grade.student_id)
        .bind(grade.due_date.timestamp_millis())
        .bind(grade.score)
        .bind(&grade.comment)
        .bind(grade.status)
        .bind(grade.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "grades", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn update_grade(&self, grade: &Grade) -> AppResult<()> {
        let result = query(
            r#"
            UPDATE grades
            SET title = ?, description = ?, due_date = ?, score = ?, comment = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&grade.title)
        .bind(&grade.description)
        .bind(grade.due_date.timestamp_millis())
        .bind(grade.score)
        .bind(&grade.comment)
        .bind(grade.status)
        .bind(&grade.id)
        .execute(&self.pool)
        .await?;

        log_database_operation("UPDATE", "grades", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn delete_grade(&self, grade_id: &str) -> AppResult<u64> {
        let result = query("DELETE FROM grades WHERE id = ?")
            .bind(grade_id)
            .execute(&self.pool)
            .await?;

        log_database_operation("DELETE", "grades", Some(result.rows_affected()));
        Ok(result.rows_affected())
    }
}
