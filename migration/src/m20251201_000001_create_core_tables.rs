use sea_orm_migration::{prelude::*, schema::*};

use crate::Migration;

pub(crate) fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            "create_table_semesters",
            Table::create()
                .table(Semesters::Table)
                .if_not_exists()
                .col(pk_auto(Semesters::Id))
                .col(string_uniq(Semesters::Name))
                .to_owned(),
        ),
        Migration::new(
            "create_table_users",
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(pk_auto(Users::Id))
                .col(string_null(Users::FirstName))
                .col(string_null(Users::Surname))
                .col(string_uniq(Users::Email))
                .col(string(Users::Password))
                .col(string(Users::Role).default("student"))
                .to_owned(),
        ),
        // 学生表只建骨架，其余列由后续步骤补齐，兼容旧库
        Migration::new(
            "create_table_students",
            Table::create()
                .table(Students::Table)
                .if_not_exists()
                .col(pk_auto(Students::Id))
                .col(string_null(Students::StudentIdText))
                .to_owned(),
        ),
        Migration::new(
            "create_table_subjects",
            Table::create()
                .table(Subjects::Table)
                .if_not_exists()
                .col(pk_auto(Subjects::Id))
                .col(string(Subjects::Name))
                .col(string(Subjects::SubjectCode))
                .to_owned(),
        ),
        Migration::new(
            "create_table_classes",
            Table::create()
                .table(Classes::Table)
                .if_not_exists()
                .col(pk_auto(Classes::Id))
                .col(string_uniq(Classes::Name))
                .col(integer_null(Classes::SemesterId))
                .to_owned(),
        ),
        Migration::new(
            "create_table_subject_allocation",
            Table::create()
                .table(SubjectAllocation::Table)
                .if_not_exists()
                .col(pk_auto(SubjectAllocation::Id))
                .col(integer(SubjectAllocation::StaffId))
                .col(integer(SubjectAllocation::SubjectId))
                .to_owned(),
        ),
        Migration::new(
            "create_table_student_subject_allocation",
            Table::create()
                .table(StudentSubjectAllocation::Table)
                .if_not_exists()
                .col(pk_auto(StudentSubjectAllocation::Id))
                .col(integer(StudentSubjectAllocation::StudentId))
                .col(integer(StudentSubjectAllocation::SubjectId))
                .foreign_key(
                    ForeignKey::create()
                        .from(
                            StudentSubjectAllocation::Table,
                            StudentSubjectAllocation::StudentId,
                        )
                        .to(Students::Table, Students::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(
                            StudentSubjectAllocation::Table,
                            StudentSubjectAllocation::SubjectId,
                        )
                        .to(Subjects::Table, Subjects::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        ),
        Migration::new(
            "create_table_question_papers",
            Table::create()
                .table(QuestionPapers::Table)
                .if_not_exists()
                .col(pk_auto(QuestionPapers::Id))
                .col(string(QuestionPapers::Title))
                .col(text_null(QuestionPapers::Content))
                .to_owned(),
        ),
        Migration::new(
            "create_table_test_allocation",
            Table::create()
                .table(TestAllocation::Table)
                .if_not_exists()
                .col(pk_auto(TestAllocation::Id))
                .col(integer(TestAllocation::ClassId))
                .col(integer(TestAllocation::QpId))
                .to_owned(),
        ),
        Migration::new(
            "create_table_ia_results",
            Table::create()
                .table(IaResults::Table)
                .if_not_exists()
                .col(pk_auto(IaResults::Id))
                .col(integer_null(IaResults::StudentId))
                .col(integer_null(IaResults::QpId))
                .col(integer_null(IaResults::Marks))
                .col(integer(IaResults::MaxMarks).default(100))
                .col(text_null(IaResults::Content))
                .col(timestamp_null(IaResults::CreatedAt))
                .to_owned(),
        ),
        Migration::new(
            "create_table_attendance",
            Table::create()
                .table(Attendance::Table)
                .if_not_exists()
                .col(pk_auto(Attendance::Id))
                .col(integer_null(Attendance::StudentId))
                .col(string_null(Attendance::Status))
                .to_owned(),
        ),
        Migration::new(
            "create_table_daily_attendance",
            Table::create()
                .table(DailyAttendance::Table)
                .if_not_exists()
                .col(pk_auto(DailyAttendance::Id))
                .col(integer_null(DailyAttendance::StudentId))
                .col(date_null(DailyAttendance::Date))
                .to_owned(),
        ),
        Migration::new(
            "create_table_notifications",
            Table::create()
                .table(Notifications::Table)
                .if_not_exists()
                .col(pk_auto(Notifications::Id))
                .col(text(Notifications::Message))
                .col(timestamp_null(Notifications::CreatedAt).default(Expr::current_timestamp()))
                .to_owned(),
        ),
        Migration::new(
            "create_table_timetable",
            Table::create()
                .table(Timetable::Table)
                .if_not_exists()
                .col(pk_auto(Timetable::Id))
                .col(integer_null(Timetable::Year))
                .col(integer_null(Timetable::Semester))
                .col(string_null(Timetable::Branch))
                .col(string_null(Timetable::DayOfWeek))
                .col(time_null(Timetable::StartTime))
                .col(time_null(Timetable::EndTime))
                .col(integer_null(Timetable::SubjectId))
                .col(integer_null(Timetable::StaffId))
                .to_owned(),
        ),
    ]
}

#[derive(DeriveIden)]
enum Semesters {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    Surname,
    Email,
    Password,
    Role,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    StudentIdText,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Name,
    SubjectCode,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    Id,
    Name,
    SemesterId,
}

#[derive(DeriveIden)]
enum SubjectAllocation {
    Table,
    Id,
    StaffId,
    SubjectId,
}

#[derive(DeriveIden)]
enum StudentSubjectAllocation {
    Table,
    Id,
    StudentId,
    SubjectId,
}

#[derive(DeriveIden)]
enum QuestionPapers {
    Table,
    Id,
    Title,
    Content,
}

#[derive(DeriveIden)]
enum TestAllocation {
    Table,
    Id,
    ClassId,
    QpId,
}

#[derive(DeriveIden)]
enum IaResults {
    Table,
    Id,
    StudentId,
    QpId,
    Marks,
    MaxMarks,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    StudentId,
    Status,
}

#[derive(DeriveIden)]
enum DailyAttendance {
    Table,
    Id,
    StudentId,
    Date,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Timetable {
    Table,
    Id,
    Year,
    Semester,
    Branch,
    DayOfWeek,
    StartTime,
    EndTime,
    SubjectId,
    StaffId,
}
