use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::collections::HashMap;

use crate::academics::{
    AllocatedTest, AttendanceEntry, AttendanceMark, IaResultEntry, ResultRecord, status_label,
};
use crate::errors::AppError;
use crate::storage::entities::{prelude::*, *};
use crate::storage::repository::*;

use super::super::backend::SeaOrmBackend;

impl SeaOrmBackend {
    /// 科目 id -> 科目名
    async fn subject_names(&self, ids: Vec<i32>) -> Result<HashMap<i32, String>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let subjects = Subjects::find()
            .filter(subjects::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;
        Ok(subjects.into_iter().map(|s| (s.id, s.name)).collect())
    }

    /// 试卷 id -> 试卷
    async fn papers_by_id(
        &self,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, question_papers::Model>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let papers = QuestionPapers::find()
            .filter(question_papers::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;
        Ok(papers.into_iter().map(|p| (p.id, p)).collect())
    }
}

#[async_trait]
impl AcademicRepository for SeaOrmBackend {
    async fn tests_for_class(&self, class_id: i32) -> Result<Vec<AllocatedTest>, AppError> {
        let allocated: Vec<i32> = TestAllocation::find()
            .filter(test_allocation::Column::ClassId.eq(class_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|a| a.qp_id)
            .collect();

        if allocated.is_empty() {
            return Ok(Vec::new());
        }

        let papers = QuestionPapers::find()
            .filter(question_papers::Column::Id.is_in(allocated))
            .order_by_desc(question_papers::Column::Id)
            .all(self.db.as_ref())
            .await?;
        let subjects = self
            .subject_names(papers.iter().filter_map(|p| p.subject_id).collect())
            .await?;

        Ok(papers
            .into_iter()
            .map(|p| AllocatedTest {
                qp_id: p.id,
                subject_name: p.subject_id.and_then(|id| subjects.get(&id).cloned()),
                title: p.title,
            })
            .collect())
    }

    async fn results_for_student(
        &self,
        student_id: i32,
        limit: Option<u64>,
        existing_papers_only: bool,
    ) -> Result<Vec<ResultRecord>, AppError> {
        let mut query = IaResults::find()
            .filter(ia_results::Column::StudentId.eq(student_id))
            .order_by_desc(ia_results::Column::CreatedAt)
            .order_by_desc(ia_results::Column::Id);

        if existing_papers_only {
            query = query.filter(
                ia_results::Column::QpId.in_subquery(
                    QuestionPapers::find()
                        .select_only()
                        .column(question_papers::Column::Id)
                        .into_query(),
                ),
            );
        }
        if let Some(n) = limit {
            query = query.limit(n);
        }

        let rows = query.all(self.db.as_ref()).await?;

        let papers = self
            .papers_by_id(rows.iter().filter_map(|r| r.qp_id).collect())
            .await?;
        let subjects = self
            .subject_names(papers.values().filter_map(|p| p.subject_id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let paper = row.qp_id.and_then(|id| papers.get(&id));
                ResultRecord {
                    qp_id: row.qp_id,
                    paper_title: paper.map(|p| p.title.clone()),
                    subject_name: paper
                        .and_then(|p| p.subject_id)
                        .and_then(|id| subjects.get(&id).cloned()),
                    marks: row.marks,
                    max_marks: row.max_marks,
                    recorded_at: row.created_at,
                }
            })
            .collect())
    }

    async fn attendance_for_student(
        &self,
        student_id: i32,
    ) -> Result<Vec<AttendanceMark>, AppError> {
        let rows = Attendance::find()
            .filter(attendance::Column::StudentId.eq(student_id))
            .all(self.db.as_ref())
            .await?;
        let subjects = self
            .subject_names(rows.iter().filter_map(|r| r.subject_id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| AttendanceMark {
                subject_name: row.subject_id.and_then(|id| subjects.get(&id).cloned()),
                status: row.status,
            })
            .collect())
    }

    async fn list_question_papers(&self) -> Result<Vec<question_papers::Model>, AppError> {
        let papers = QuestionPapers::find()
            .order_by_asc(question_papers::Column::Title)
            .all(self.db.as_ref())
            .await?;
        Ok(papers)
    }

    async fn upsert_ia_result(
        &self,
        entry: &IaResultEntry,
        max_marks: i32,
    ) -> Result<ia_results::Model, AppError> {
        let result = ia_results::ActiveModel {
            student_id: Set(Some(entry.student_id)),
            qp_id: Set(Some(entry.qp_id)),
            marks: Set(Some(entry.marks)),
            max_marks: Set(Some(max_marks)),
            created_at: Set(Some(Utc::now().naive_utc())),
            ..Default::default()
        };

        IaResults::insert(result)
            .on_conflict(
                OnConflict::columns([ia_results::Column::StudentId, ia_results::Column::QpId])
                    .update_columns([
                        ia_results::Column::Marks,
                        ia_results::Column::MaxMarks,
                        ia_results::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        IaResults::find()
            .filter(ia_results::Column::StudentId.eq(entry.student_id))
            .filter(ia_results::Column::QpId.eq(entry.qp_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::Internal("IA result missing after upsert".into()))
    }

    async fn record_attendance(
        &self,
        subject_id: i32,
        date: NaiveDate,
        entries: &[AttendanceEntry],
    ) -> Result<u64, AppError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let rows = entries.iter().map(|entry| attendance::ActiveModel {
            student_id: Set(Some(entry.student_id)),
            subject_id: Set(Some(subject_id)),
            status: Set(Some(status_label(entry.present).to_string())),
            date: Set(Some(date)),
            ..Default::default()
        });

        let txn = self.db.begin().await?;
        Attendance::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        Ok(entries.len() as u64)
    }
}
