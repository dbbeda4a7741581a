use actix_web::web;
use chrono::Duration;

use crate::auth::{AuthGateway, PasswordHasher, TokenService};
use crate::config::Config;
use crate::db::{Database, TaskStore, UserStore};
use crate::error::AppError;
use crate::routes;
use crate::tasks::TaskService;

/// Shared services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthGateway>,
    pub tasks: web::Data<TaskService>,
}

impl AppState {
    /// Connects to the database, creates the schema and wires the services.
    pub async fn build(config: &Config) -> Result<Self, AppError> {
        let db = Database::connect(
            &config.database_url,
            config.db_max_connections,
            config.db_timeout,
        )
        .await?;
        db.init_schema().await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: Database, config: &Config) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::minutes(config.token_ttl_minutes),
        );
        let auth = AuthGateway::new(
            UserStore::new(db.clone()),
            PasswordHasher::new(config.bcrypt_cost),
            tokens,
        );

        Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(TaskStore::new(db))),
        }
    }

    /// Registers the services and all routes on an `App` or scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone());
        routes::config(cfg);
    }
}
