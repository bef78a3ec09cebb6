use sea_orm::*;
use tracing::info;

use crate::config::BootstrapConfig;
use crate::entity::user;
use crate::utils::hash;

/// Create the initial admin account if the user table is empty.
///
/// Returns whether an account was created. Existing installations keep their
/// users untouched, including a renamed or re-passworded admin.
pub async fn seed_admin(db: &DatabaseConnection, config: &BootstrapConfig) -> Result<bool, DbErr> {
    let existing = user::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(false);
    }

    let password = hash::hash_password(&config.admin_password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let admin = user::ActiveModel {
        username: Set(config.admin_username.clone()),
        password: Set(password),
        is_admin: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = user::Entity::insert(admin)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!(username = %config.admin_username, "Seeded admin account");
            Ok(true)
        }
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}
