//! User administration
//!
//! Credentials and token issuance live with the authentication service in
//! front of the core; this manages identity and role only.

use crate::domain::{Action, Principal, Role};
use crate::infrastructure::database::entities::user;
use crate::operations::{require, CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

const USERS_CAP: u64 = 200;

pub struct UserAdmin {
    db: DatabaseConnection,
}

impl UserAdmin {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, principal: &Principal) -> CoreResult<Vec<user::Model>> {
        require(principal, Action::ManageUsers)?;

        Ok(user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(USERS_CAP)
            .all(&self.db)
            .await?)
    }

    /// Provision an identity. Emails are stored lower-cased and must be
    /// unique.
    pub async fn create(
        &self,
        principal: &Principal,
        full_name: &str,
        email: &str,
        role: Role,
    ) -> CoreResult<user::Model> {
        require(principal, Action::ManageUsers)?;

        let full_name = full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(CoreError::invalid_input("missing field: full_name"));
        }
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(CoreError::invalid_input("missing field: email"));
        }

        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(&self.db)
            .await?
            .is_some();
        if taken {
            return Err(CoreError::conflict("email already registered", None));
        }

        let created = user::ActiveModel {
            full_name: Set(full_name),
            email: Set(email),
            role: Set(role.as_ref().to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(user_id = created.id, "user created");
        Ok(created)
    }

    pub async fn set_role(
        &self,
        principal: &Principal,
        user_id: i32,
        role: Role,
    ) -> CoreResult<user::Model> {
        require(principal, Action::ManageUsers)?;

        let model = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::not_found("user"))?;

        let mut active: user::ActiveModel = model.into();
        active.role = Set(role.as_ref().to_owned());
        let updated = active.update(&self.db).await?;

        info!(user_id, role = %role, "user role changed");
        Ok(updated)
    }
}
