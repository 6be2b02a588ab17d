use actix_web::{App, HttpServer, middleware, web};

use crate::api::{middleware as app_middleware, services};
use crate::config::get_config;
use crate::runtime::startup::StartupContext;
use crate::security::{Role, role::STAFF_ROLES};

pub async fn run_server(ctx: StartupContext) -> std::io::Result<()> {
    let config = get_config();
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!("Starting HTTP server on {}", bind_addr);

    let db = ctx.db.clone();
    let storage = ctx.storage.clone();
    let revocations = ctx.revocations.clone();
    let jwt_manager = ctx.jwt_manager.clone();

    HttpServer::new(move || {
        let authenticated =
            || app_middleware::JwtAuth::new(jwt_manager.clone(), revocations.clone());

        App::new()
            // 共享状态
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(revocations.clone()))
            .app_data(web::Data::new(jwt_manager.clone()))
            // 中间件
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::DefaultHeaders::new().add(("X-Version", env!("CARGO_PKG_VERSION"))))
            // 健康检查端点（无需认证）
            .service(
                web::scope("/health")
                    .route("", web::get().to(services::health_check))
                    .route("/ready", web::get().to(services::readiness))
                    .route("/live", web::get().to(services::liveness)),
            )
            // 认证 API
            .service(
                web::scope("/api/auth")
                    .route("/login", web::post().to(services::login))
                    .route("/student-login", web::post().to(services::student_login))
                    .route(
                        "/logout",
                        web::post().to(services::logout).wrap(authenticated()),
                    ),
            )
            // 学生端（需要学生会话）
            .service(
                web::scope("/api/student")
                    .wrap(authenticated().allow(&[Role::Student]))
                    .route("/dashboard", web::get().to(services::student_dashboard))
                    .route("/results", web::get().to(services::student_results)),
            )
            // 教职工录入（admin / staff / HOD / principal）
            .service(
                web::scope("/api/staff")
                    .wrap(authenticated().allow(STAFF_ROLES))
                    .route("/students", web::get().to(services::staff_list_students))
                    .route(
                        "/question-papers",
                        web::get().to(services::staff_list_question_papers),
                    )
                    .route("/ia-results", web::post().to(services::staff_enter_result))
                    .route("/attendance", web::post().to(services::staff_record_attendance)),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await
}
