use sea_orm_migration::{prelude::*, schema::*};

use crate::Migration;

// SQLite 的 ALTER TABLE 一次只能加一列，所以每列单独一个步骤。
// 列已存在时数据库会报重复列错误，由迁移执行器按"已完成"处理。
pub(crate) fn migrations() -> Vec<Migration> {
    vec![
        // students
        add_column("add_students_usn", Students::Table, string_null(Students::Usn)),
        add_column(
            "add_students_student_name",
            Students::Table,
            string_null(Students::StudentName),
        ),
        add_column("add_students_email", Students::Table, string_null(Students::Email)),
        add_column(
            "add_students_password",
            Students::Table,
            string_null(Students::Password),
        ),
        add_column("add_students_dob", Students::Table, date_null(Students::Dob)),
        add_column(
            "add_students_semester",
            Students::Table,
            integer_null(Students::Semester),
        ),
        add_column(
            "add_students_section",
            Students::Table,
            string_null(Students::Section),
        ),
        add_column(
            "add_students_class_id",
            Students::Table,
            integer_null(Students::ClassId),
        ),
        // 账号与学生档案的直接关联
        add_column(
            "add_students_user_id",
            Students::Table,
            integer_null(Students::UserId),
        ),
        add_column(
            "add_students_father_name",
            Students::Table,
            string_null(Students::FatherName),
        ),
        add_column(
            "add_students_mother_name",
            Students::Table,
            string_null(Students::MotherName),
        ),
        add_column(
            "add_students_mobile_number",
            Students::Table,
            string_null(Students::MobileNumber),
        ),
        add_column(
            "add_students_parent_mobile",
            Students::Table,
            string_null(Students::ParentMobileNumber),
        ),
        add_column(
            "add_students_category",
            Students::Table,
            string_null(Students::Category),
        ),
        add_column(
            "add_students_branch_kea",
            Students::Table,
            string_null(Students::AllottedBranchKea),
        ),
        add_column(
            "add_students_branch_mgmt",
            Students::Table,
            string_null(Students::AllottedBranchManagement),
        ),
        // subjects
        add_column(
            "add_subjects_semester_id",
            Subjects::Table,
            integer_null(Subjects::SemesterId),
        ),
        add_column(
            "add_subjects_semester",
            Subjects::Table,
            integer_null(Subjects::Semester),
        ),
        add_column("add_subjects_branch", Subjects::Table, string_null(Subjects::Branch)),
        add_column("add_subjects_year", Subjects::Table, integer_null(Subjects::Year)),
        // subject_allocation
        add_column(
            "add_allocation_class_id",
            SubjectAllocation::Table,
            integer_null(SubjectAllocation::ClassId),
        ),
        add_column(
            "add_allocation_section",
            SubjectAllocation::Table,
            string_null(SubjectAllocation::Section),
        ),
        // question_papers
        add_column(
            "add_qp_subject_id",
            QuestionPapers::Table,
            integer_null(QuestionPapers::SubjectId),
        ),
        // ia_results（旧库缺这两列）
        add_column(
            "add_ia_results_max_marks",
            IaResults::Table,
            integer(IaResults::MaxMarks).default(100).to_owned(),
        ),
        add_column(
            "add_ia_results_created_at",
            IaResults::Table,
            timestamp_null(IaResults::CreatedAt),
        ),
        // attendance
        add_column(
            "add_attendance_subject_id",
            Attendance::Table,
            integer_null(Attendance::SubjectId),
        ),
        add_column("add_attendance_date", Attendance::Table, date_null(Attendance::Date)),
    ]
}

fn add_column<T>(id: &str, table: T, mut column: ColumnDef) -> Migration
where
    T: IntoTableRef,
{
    Migration::new(
        id,
        Table::alter()
            .table(table)
            .add_column(&mut column)
            .to_owned(),
    )
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Usn,
    StudentName,
    Email,
    Password,
    Dob,
    Semester,
    Section,
    ClassId,
    UserId,
    FatherName,
    MotherName,
    MobileNumber,
    ParentMobileNumber,
    Category,
    AllottedBranchKea,
    AllottedBranchManagement,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    SemesterId,
    Semester,
    Branch,
    Year,
}

#[derive(DeriveIden)]
enum SubjectAllocation {
    Table,
    ClassId,
    Section,
}

#[derive(DeriveIden)]
enum QuestionPapers {
    Table,
    SubjectId,
}

#[derive(DeriveIden)]
enum IaResults {
    Table,
    MaxMarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    SubjectId,
    Date,
}
