use async_trait::async_trait;
use chrono::NaiveDate;

use super::entities::{ia_results, question_papers, students, users};
use crate::academics::{AllocatedTest, AttendanceEntry, AttendanceMark, IaResultEntry, ResultRecord};
use crate::errors::AppError;

/// 登录账号仓储（只读）
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_account(&self, id: i32) -> Result<Option<users::Model>, AppError>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<users::Model>, AppError>;
}

/// 学生档案仓储
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// `students.user_id` 直接关联，多条时取 id 最小的
    async fn find_profile_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<students::Model>, AppError>;

    async fn find_profile(&self, id: i32) -> Result<Option<students::Model>, AppError>;

    /// 按 `LOWER(TRIM(email))` 匹配，参数须已规范化
    async fn find_profiles_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<students::Model>, AppError>;

    async fn list_profiles(&self) -> Result<Vec<students::Model>, AppError>;
}

/// 测验、成绩、出勤仓储
#[async_trait]
pub trait AcademicRepository: Send + Sync {
    /// 班级的测验，最新的在前
    async fn tests_for_class(&self, class_id: i32) -> Result<Vec<AllocatedTest>, AppError>;

    /// 学生成绩，最新的在前
    ///
    /// `existing_papers_only` 为真时丢弃试卷已删除的记录。
    async fn results_for_student(
        &self,
        student_id: i32,
        limit: Option<u64>,
        existing_papers_only: bool,
    ) -> Result<Vec<ResultRecord>, AppError>;

    async fn attendance_for_student(
        &self,
        student_id: i32,
    ) -> Result<Vec<AttendanceMark>, AppError>;

    async fn list_question_papers(&self) -> Result<Vec<question_papers::Model>, AppError>;

    /// 按 (student_id, qp_id) 插入或覆盖成绩
    async fn upsert_ia_result(
        &self,
        entry: &IaResultEntry,
        max_marks: i32,
    ) -> Result<ia_results::Model, AppError>;

    /// 写入一批出勤，返回写入条数
    async fn record_attendance(
        &self,
        subject_id: i32,
        date: NaiveDate,
        entries: &[AttendanceEntry],
    ) -> Result<u64, AppError>;
}
