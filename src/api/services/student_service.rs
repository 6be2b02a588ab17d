use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use std::sync::Arc;

use crate::academics::{
    AllocatedTest, AttendanceSummary, DASHBOARD_RESULT_LIMIT, ResultView, summarize_attendance,
};
use crate::api::middleware::claims_of;
use crate::errors::AppError;
use crate::identity::session_profile;
use crate::storage::entities::students;
use crate::storage::{AcademicRepository, SeaOrmBackend};

#[derive(Debug, Serialize)]
pub struct StudentInfo {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub usn: Option<String>,
    pub class_id: Option<i32>,
}

impl From<&students::Model> for StudentInfo {
    fn from(profile: &students::Model) -> Self {
        Self {
            id: profile.id,
            name: profile.student_name.clone(),
            email: profile.email.clone(),
            usn: profile.usn.clone(),
            class_id: profile.class_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub student: StudentInfo,
    pub tests: Vec<AllocatedTest>,
    pub results: Vec<ResultView>,
    pub attendance: Vec<AttendanceSummary>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub student: StudentInfo,
    pub results: Vec<ResultView>,
}

/// 当前会话对应的学生档案
async fn current_profile(
    req: &HttpRequest,
    storage: &SeaOrmBackend,
) -> Result<students::Model, AppError> {
    let claims = claims_of(req)?;

    session_profile(storage, &claims)
        .await?
        .ok_or(AppError::ProfileNotLinked)
}

/// GET /api/student/dashboard
///
/// 分配给本班的测验、最近的成绩和按科目的出勤汇总。
pub async fn dashboard(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let storage: &SeaOrmBackend = storage.get_ref();
    let profile = current_profile(&req, storage).await?;

    let tests = match profile.class_id {
        Some(class_id) => storage.tests_for_class(class_id).await?,
        None => Vec::new(),
    };

    // 仪表盘只显示试卷仍存在的成绩
    let results = storage
        .results_for_student(profile.id, Some(DASHBOARD_RESULT_LIMIT), true)
        .await?
        .into_iter()
        .map(|r| r.into_view())
        .collect();

    let marks = storage.attendance_for_student(profile.id).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        student: StudentInfo::from(&profile),
        tests,
        results,
        attendance: summarize_attendance(&marks),
    }))
}

/// GET /api/student/results
pub async fn results(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let storage: &SeaOrmBackend = storage.get_ref();
    let profile = current_profile(&req, storage).await?;

    let results = storage
        .results_for_student(profile.id, None, false)
        .await?
        .into_iter()
        .map(|r| r.into_view())
        .collect();

    Ok(HttpResponse::Ok().json(ResultsResponse {
        student: StudentInfo::from(&profile),
        results,
    }))
}
