pub mod auth_service;
pub mod health;
pub mod staff_service;
pub mod student_service;

// 认证服务
pub use auth_service::{login, logout, student_login};

// 健康检查
pub use health::{health_check, liveness, readiness};

// 学生端
pub use student_service::{dashboard as student_dashboard, results as student_results};

// 教职工录入
pub use staff_service::{
    enter_result as staff_enter_result, list_question_papers as staff_list_question_papers,
    list_students as staff_list_students, record_attendance as staff_record_attendance,
};
