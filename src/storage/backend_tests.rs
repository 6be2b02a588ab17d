#[cfg(test)]
mod tests {
    use super::super::backend::SeaOrmBackend;
    use super::super::entities::{question_papers, students, subjects, test_allocation, users};
    use super::super::migrator::{
        applied_ids, ensure_ledger, record_tolerant, run_migrations, run_schema_migrations,
    };
    use super::super::repository::*;
    use crate::academics::{AttendanceEntry, IaResultEntry, summarize_attendance};
    use crate::errors::AppError;
    use crate::identity::{MatchStrategy, ProfileResolution, resolve_profile, session_profile};
    use crate::security::{JwtManager, Role};
    use chrono::NaiveDate;
    use migration::Migration;
    use sea_orm::{
        ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
        Set,
    };
    use std::sync::Arc;

    /// 创建测试用的内存数据库（单连接，保证所有查询看到同一个库）
    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opt)
            .await
            .expect("Failed to create test database")
    }

    /// 已执行全部迁移的测试库
    async fn setup_test_db() -> Arc<DatabaseConnection> {
        let db = memory_db().await;
        run_schema_migrations(&db)
            .await
            .expect("Failed to run migrations");
        Arc::new(db)
    }

    async fn table_exists(db: &DatabaseConnection, table: &str) -> bool {
        db.execute_unprepared(&format!("SELECT 1 FROM {} LIMIT 1", table))
            .await
            .is_ok()
    }

    fn widgets() -> Vec<Migration> {
        vec![
            Migration::new("mk_t", "CREATE TABLE widgets (id INTEGER PRIMARY KEY)"),
            Migration::new("mk_col", "ALTER TABLE widgets ADD COLUMN name TEXT"),
        ]
    }

    // ============ 迁移执行器 ============

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let db = memory_db().await;

        let first = run_migrations(&db, &widgets()).await.unwrap();
        assert_eq!(first.applied, vec!["mk_t", "mk_col"]);
        assert!(first.skipped.is_empty());

        let second = run_migrations(&db, &widgets()).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(second.skipped, vec!["mk_t", "mk_col"]);

        // 两条记录，表结构可用
        assert_eq!(applied_ids(&db).await.unwrap().len(), 2);
        db.execute_unprepared("INSERT INTO widgets (name) VALUES ('bolt')")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_out_of_order_fails_at_add_column() {
        let db = memory_db().await;
        let reversed: Vec<Migration> = widgets().into_iter().rev().collect();

        let err = run_migrations(&db, &reversed).await.unwrap_err();
        match err {
            AppError::Migration { id, .. } => assert_eq!(id, "mk_col"),
            other => panic!("unexpected error: {}", other),
        }

        // 后续步骤没有执行
        assert!(applied_ids(&db).await.unwrap().is_empty());
        assert!(!table_exists(&db, "widgets").await);
    }

    #[tokio::test]
    async fn test_existing_object_is_recorded() {
        let db = memory_db().await;
        db.execute_unprepared("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT)")
            .await
            .unwrap();

        let report = run_migrations(&db, &widgets()).await.unwrap();
        assert!(report.applied.is_empty());
        assert_eq!(report.tolerated, vec!["mk_t", "mk_col"]);

        let mut ids = applied_ids(&db).await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["mk_col", "mk_t"]);
    }

    #[tokio::test]
    async fn test_fatal_error_stops_the_run() {
        let db = memory_db().await;
        let steps = vec![
            Migration::new("mk_a", "CREATE TABLE alpha (id INTEGER)"),
            Migration::new("broken", "CREATE TABLE beta (id INTEGER,"),
            Migration::new("mk_c", "CREATE TABLE gamma (id INTEGER)"),
        ];

        let err = run_migrations(&db, &steps).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.to_string().contains("broken"));

        assert_eq!(applied_ids(&db).await.unwrap(), vec!["mk_a"]);
        assert!(table_exists(&db, "alpha").await);
        assert!(!table_exists(&db, "gamma").await);
    }

    #[tokio::test]
    async fn test_failed_step_leaves_no_record() {
        let db = memory_db().await;
        let steps = vec![Migration::new(
            "needs_table",
            "ALTER TABLE missing ADD COLUMN x INTEGER",
        )];

        assert!(run_migrations(&db, &steps).await.is_err());
        assert!(applied_ids(&db).await.unwrap().is_empty());

        // 修好前置条件后同一 id 可以重跑
        db.execute_unprepared("CREATE TABLE missing (id INTEGER)")
            .await
            .unwrap();
        let report = run_migrations(&db, &steps).await.unwrap();
        assert_eq!(report.applied, vec!["needs_table"]);
    }

    #[tokio::test]
    async fn test_schema_catalogue_twice() {
        let db = memory_db().await;

        let first = run_schema_migrations(&db).await.unwrap();
        // ia_results 建表时已带这两列，补列步骤按"已存在"记录
        assert_eq!(
            first.tolerated,
            vec!["add_ia_results_max_marks", "add_ia_results_created_at"]
        );
        assert_eq!(
            first.applied.len() + first.tolerated.len(),
            migration::migrations().len()
        );

        let second = run_schema_migrations(&db).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(second.skipped.len(), migration::migrations().len());
    }

    #[tokio::test]
    async fn test_catalogue_over_legacy_students_table() {
        let db = memory_db().await;
        db.execute_unprepared(
            "CREATE TABLE students (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             student_id_text TEXT, email TEXT, user_id INTEGER)",
        )
        .await
        .unwrap();

        let report = run_schema_migrations(&db).await.unwrap();
        // 建表带 IF NOT EXISTS，直接成功
        assert!(report.applied.iter().any(|a| a == "create_table_students"));
        for id in ["add_students_email", "add_students_user_id"] {
            assert!(
                report.tolerated.iter().any(|t| t == id),
                "{id} should be tolerated"
            );
        }
        assert!(report.applied.iter().any(|a| a == "add_students_usn"));
        assert_eq!(
            applied_ids(&db).await.unwrap().len(),
            migration::migrations().len()
        );
    }

    #[tokio::test]
    async fn test_record_written_by_another_runner_is_accepted() {
        let db = memory_db().await;
        ensure_ledger(&db).await.unwrap();

        // 另一个实例已写入同一 id
        db.execute_unprepared(
            "INSERT INTO db_migrations (migration_id, run_at) VALUES ('mk_t', '2025-12-01 08:00:00')",
        )
        .await
        .unwrap();

        record_tolerant(&db, DbBackend::Sqlite, "mk_t").await.unwrap();

        assert_eq!(applied_ids(&db).await.unwrap(), vec!["mk_t"]);
    }

    #[tokio::test]
    async fn test_ledger_collision_inside_step_is_tolerated() {
        let db = memory_db().await;
        // 语句执行期间同一 id 被记录，随后写记录时主键冲突
        let steps = vec![Migration::new(
            "raced",
            "INSERT INTO db_migrations (migration_id, run_at) VALUES ('raced', '2025-12-01 08:00:00')",
        )];

        let report = run_migrations(&db, &steps).await.unwrap();
        assert!(report.applied.is_empty());
        assert_eq!(report.tolerated, vec!["raced"]);
        assert_eq!(applied_ids(&db).await.unwrap(), vec!["raced"]);

        let again = run_migrations(&db, &steps).await.unwrap();
        assert_eq!(again.skipped, vec!["raced"]);
        assert_eq!(applied_ids(&db).await.unwrap().len(), 1);
    }

    // ============ 账号与档案 ============

    async fn create_account(db: &DatabaseConnection, email: &str) -> users::Model {
        users::ActiveModel {
            email: Set(email.to_string()),
            password: Set("hashed".to_string()),
            role: Set("student".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create account")
    }

    async fn create_profile(
        db: &DatabaseConnection,
        name: &str,
        email: Option<&str>,
        user_id: Option<i32>,
    ) -> students::Model {
        students::ActiveModel {
            student_name: Set(Some(name.to_string())),
            email: Set(email.map(str::to_string)),
            user_id: Set(user_id),
            class_id: Set(Some(1)),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create profile")
    }

    #[tokio::test]
    async fn test_resolver_prefers_direct_link() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());

        let account = create_account(&db, "asha@college.edu").await;
        // 邮箱能匹配，但直接关联优先
        let _by_email = create_profile(&db, "Asha (email)", Some("asha@college.edu"), None).await;
        let linked = create_profile(&db, "Asha (linked)", None, Some(account.id)).await;

        let resolution = resolve_profile(&backend, account.id).await.unwrap();
        match resolution {
            ProfileResolution::Found {
                profile,
                matched_by,
            } => {
                assert_eq!(profile.id, linked.id);
                assert_eq!(matched_by, MatchStrategy::DirectLink);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolver_email_normalized_in_store() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());

        let account = create_account(&db, "ravi@college.edu").await;
        // 档案 id 与账号 id 错开，只能靠邮箱匹配
        let profile = students::ActiveModel {
            id: Set(account.id + 100),
            student_name: Set(Some("Ravi".to_string())),
            email: Set(Some(" Ravi@College.EDU ".to_string())),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .unwrap();

        let resolution = resolve_profile(&backend, account.id).await.unwrap();
        assert_eq!(resolution.profile().map(|p| p.id), Some(profile.id));
    }

    #[tokio::test]
    async fn test_resolver_miss_is_not_found() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        let resolution = resolve_profile(&backend, 404).await.unwrap();
        assert_eq!(resolution, ProfileResolution::NotFound);
    }

    fn jwt() -> JwtManager {
        JwtManager::new("test-secret-key-at-least-32-characters-long".to_string(), 3600)
    }

    #[tokio::test]
    async fn test_profile_session_reads_its_own_profile() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());

        // A 的档案 id 恰好等于 B 关联的账号 id
        let a = create_profile(&db, "Student A", Some("a@college.edu"), None).await;
        let b = create_profile(&db, "Student B", Some("b@college.edu"), Some(a.id)).await;
        assert_ne!(a.id, b.id);

        let claims = jwt().issue_for_profile(a.id).unwrap().claims;
        let profile = session_profile(&backend, &claims).await.unwrap();
        assert_eq!(profile.map(|p| p.id), Some(a.id));
    }

    #[tokio::test]
    async fn test_account_session_follows_direct_link() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());

        let account = create_account(&db, "linked@college.edu").await;
        let _same_id = students::ActiveModel {
            id: Set(account.id),
            student_name: Set(Some("Same id".to_string())),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .unwrap();
        let linked = create_profile(&db, "Linked", None, Some(account.id)).await;

        let claims = jwt().issue(account.id, Role::Student).unwrap().claims;
        let profile = session_profile(&backend, &claims).await.unwrap();
        assert_eq!(profile.map(|p| p.id), Some(linked.id));
    }

    #[tokio::test]
    async fn test_profile_session_for_deleted_profile() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        let claims = jwt().issue_for_profile(999).unwrap().claims;
        assert!(session_profile(&backend, &claims).await.unwrap().is_none());
    }

    // ============ 成绩与出勤 ============

    async fn create_paper(db: &DatabaseConnection, title: &str, class_id: i32) -> question_papers::Model {
        let subject = subjects::ActiveModel {
            name: Set(format!("{} subject", title)),
            subject_code: Set(format!("CODE-{}", title)),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let paper = question_papers::ActiveModel {
            title: Set(title.to_string()),
            subject_id: Set(Some(subject.id)),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        test_allocation::ActiveModel {
            class_id: Set(class_id),
            qp_id: Set(paper.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        paper
    }

    #[tokio::test]
    async fn test_upsert_overwrites_marks() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());
        let student = create_profile(&db, "Meera", None, None).await;
        let paper = create_paper(&db, "IA1", 1).await;

        let mut entry = IaResultEntry {
            student_id: student.id,
            qp_id: paper.id,
            marks: 12,
            max_marks: None,
        };
        backend.upsert_ia_result(&entry, 25).await.unwrap();
        entry.marks = 20;
        let saved = backend.upsert_ia_result(&entry, 25).await.unwrap();
        assert_eq!(saved.marks, Some(20));
        assert_eq!(saved.max_marks, Some(25));

        let results = backend
            .results_for_student(student.id, None, false)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].paper_title.as_deref(), Some("IA1"));
        assert_eq!(results[0].subject_name.as_deref(), Some("IA1 subject"));
    }

    #[tokio::test]
    async fn test_results_with_deleted_paper() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());
        let student = create_profile(&db, "Kiran", None, None).await;
        let paper = create_paper(&db, "IA2", 1).await;

        for qp_id in [paper.id, 999] {
            let entry = IaResultEntry {
                student_id: student.id,
                qp_id,
                marks: 10,
                max_marks: None,
            };
            backend.upsert_ia_result(&entry, 100).await.unwrap();
        }

        let all = backend
            .results_for_student(student.id, None, false)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        let deleted = all.into_iter().find(|r| r.qp_id == Some(999)).unwrap();
        assert_eq!(deleted.into_view().test, "Deleted Paper (ID:999)");

        let existing = backend
            .results_for_student(student.id, Some(50), true)
            .await
            .unwrap();
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].qp_id, Some(paper.id));
    }

    #[tokio::test]
    async fn test_tests_for_class_newest_first() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());
        let older = create_paper(&db, "Midterm", 3).await;
        let newer = create_paper(&db, "Final", 3).await;
        create_paper(&db, "Other class", 4).await;

        let tests = backend.tests_for_class(3).await.unwrap();
        let ids: Vec<i32> = tests.iter().map(|t| t.qp_id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_attendance_round_trip_summary() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db.clone());
        let student = create_profile(&db, "Dev", None, None).await;
        let other = create_profile(&db, "Noor", None, None).await;
        let paper = create_paper(&db, "Physics", 1).await;
        let subject_id = paper.subject_id.unwrap();

        for (day, present) in [(1, true), (2, false), (3, true)] {
            let date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
            let entries = [
                AttendanceEntry {
                    student_id: student.id,
                    present,
                },
                AttendanceEntry {
                    student_id: other.id,
                    present: true,
                },
            ];
            let written = backend
                .record_attendance(subject_id, date, &entries)
                .await
                .unwrap();
            assert_eq!(written, 2);
        }

        let marks = backend.attendance_for_student(student.id).await.unwrap();
        let summary = summarize_attendance(&marks);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].subject, "Physics subject");
        assert_eq!((summary[0].present, summary[0].total), (2, 3));
        assert_eq!(summary[0].percent, 66.67);
    }
}
