use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::academics::{AttendanceEntry, IaResultEntry, validate_marks};
use crate::api::middleware::claims_of;
use crate::errors::AppError;
use crate::storage::{AcademicRepository, ProfileRepository, SeaOrmBackend};

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub subject_id: i32,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Serialize)]
pub struct StudentOption {
    pub id: i32,
    pub student_name: Option<String>,
    pub usn: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaperOption {
    pub id: i32,
    pub title: String,
    pub subject_id: Option<i32>,
}

/// POST /api/staff/ia-results
///
/// 同一学生同一试卷只保留一条，重复提交覆盖分数。
pub async fn enter_result(
    req: HttpRequest,
    body: web::Json<IaResultEntry>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let claims = claims_of(&req)?;
    let entry = body.into_inner();

    let max_marks = validate_marks(entry.marks, entry.max_marks)?;

    if storage.find_profile(entry.student_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown student: {}",
            entry.student_id
        )));
    }

    let saved = storage.upsert_ia_result(&entry, max_marks).await?;

    tracing::info!(
        "IA result saved: student={}, qp={}, marks={}/{}, by={}",
        entry.student_id,
        entry.qp_id,
        entry.marks,
        max_marks,
        claims.sub
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Result saved successfully",
        "id": saved.id,
        "student_id": entry.student_id,
        "qp_id": entry.qp_id,
        "marks": entry.marks,
        "max_marks": max_marks,
    })))
}

/// POST /api/staff/attendance
pub async fn record_attendance(
    req: HttpRequest,
    body: web::Json<AttendanceRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let claims = claims_of(&req)?;

    if body.entries.is_empty() {
        return Err(AppError::BadRequest("No attendance entries".into()));
    }

    let recorded = storage
        .record_attendance(body.subject_id, body.date, &body.entries)
        .await?;

    tracing::info!(
        "Attendance recorded: subject={}, date={}, entries={}, by={}",
        body.subject_id,
        body.date,
        recorded,
        claims.sub
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance saved",
        "recorded": recorded,
    })))
}

/// GET /api/staff/students
pub async fn list_students(
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let students: Vec<StudentOption> = storage
        .list_profiles()
        .await?
        .into_iter()
        .map(|s| StudentOption {
            id: s.id,
            student_name: s.student_name,
            usn: s.usn,
        })
        .collect();

    Ok(HttpResponse::Ok().json(students))
}

/// GET /api/staff/question-papers
pub async fn list_question_papers(
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let papers: Vec<PaperOption> = storage
        .list_question_papers()
        .await?
        .into_iter()
        .map(|p| PaperOption {
            id: p.id,
            title: p.title,
            subject_id: p.subject_id,
        })
        .collect();

    Ok(HttpResponse::Ok().json(papers))
}
