use sea_orm_migration::prelude::*;

use crate::Migration;

// 唯一约束统一用唯一索引表达，三种数据库都支持。
// 旧库里同名约束已存在时会返回"对象已存在"，视为已完成。
pub(crate) fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            "add_constraint_students_email",
            Index::create()
                .name("students_email_unique")
                .table(Students::Table)
                .col(Students::Email)
                .unique()
                .to_owned(),
        ),
        Migration::new(
            "add_constraint_students_usn",
            Index::create()
                .name("students_usn_unique")
                .table(Students::Table)
                .col(Students::Usn)
                .unique()
                .to_owned(),
        ),
        Migration::new(
            "add_index_students_user_id",
            Index::create()
                .name("idx_students_user_id")
                .table(Students::Table)
                .col(Students::UserId)
                .to_owned(),
        ),
        Migration::new(
            "add_constraint_subjects_code",
            Index::create()
                .name("subjects_subject_code_key")
                .table(Subjects::Table)
                .col(Subjects::SubjectCode)
                .unique()
                .to_owned(),
        ),
        Migration::new(
            "fix_subject_allocation_constraint",
            Index::create()
                .name("subject_allocation_staff_subject_class_key")
                .table(SubjectAllocation::Table)
                .col(SubjectAllocation::StaffId)
                .col(SubjectAllocation::SubjectId)
                .col(SubjectAllocation::ClassId)
                .unique()
                .to_owned(),
        ),
        Migration::new(
            "add_constraint_student_subject_allocation",
            Index::create()
                .name("student_subject_allocation_student_subject_key")
                .table(StudentSubjectAllocation::Table)
                .col(StudentSubjectAllocation::StudentId)
                .col(StudentSubjectAllocation::SubjectId)
                .unique()
                .to_owned(),
        ),
        Migration::new(
            "add_constraint_test_allocation",
            Index::create()
                .name("test_allocation_class_qp_key")
                .table(TestAllocation::Table)
                .col(TestAllocation::ClassId)
                .col(TestAllocation::QpId)
                .unique()
                .to_owned(),
        ),
        // IA 成绩按 (student_id, qp_id) upsert，依赖此唯一键
        Migration::new(
            "add_constraint_ia_results",
            Index::create()
                .name("ia_results_student_qp_key")
                .table(IaResults::Table)
                .col(IaResults::StudentId)
                .col(IaResults::QpId)
                .unique()
                .to_owned(),
        ),
    ]
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Email,
    Usn,
    UserId,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    SubjectCode,
}

#[derive(DeriveIden)]
enum SubjectAllocation {
    Table,
    StaffId,
    SubjectId,
    ClassId,
}

#[derive(DeriveIden)]
enum StudentSubjectAllocation {
    Table,
    StudentId,
    SubjectId,
}

#[derive(DeriveIden)]
enum TestAllocation {
    Table,
    ClassId,
    QpId,
}

#[derive(DeriveIden)]
enum IaResults {
    Table,
    StudentId,
    QpId,
}
