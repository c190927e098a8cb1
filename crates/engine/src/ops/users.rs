use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{Actor, EngineError, NewUser, ResultEngine, Role, User, users};

use super::{Engine, access::require_admin, with_tx};

pub const MIN_PASSWORD_LEN: usize = 8;

fn normalize_username(value: &str) -> ResultEngine<String> {
    let username = value.trim();
    if username.is_empty() {
        return Err(EngineError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    // Basic auth splits credentials on the first ':'.
    if username.contains(':') {
        return Err(EngineError::Validation(
            "username must not contain ':'".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn check_password(password: &str) -> ResultEngine<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl Engine {
    /// Creates a user. Requires an admin actor.
    pub async fn create_user(&self, actor: &Actor, cmd: NewUser) -> ResultEngine<User> {
        require_admin(actor)?;
        let user = self.insert_user(cmd).await?;
        tracing::info!(
            username = %user.username,
            role = user.role.as_str(),
            by = %actor.username,
            "user created"
        );
        Ok(user)
    }

    /// Creates a user without an acting admin.
    ///
    /// Used by operator tooling to create the first account; never exposed
    /// over HTTP.
    pub async fn bootstrap_user(&self, cmd: NewUser) -> ResultEngine<User> {
        let user = self.insert_user(cmd).await?;
        tracing::info!(username = %user.username, role = user.role.as_str(), "user bootstrapped");
        Ok(user)
    }

    async fn insert_user(&self, cmd: NewUser) -> ResultEngine<User> {
        let username = normalize_username(&cmd.username)?;
        check_password(&cmd.password)?;
        let password_hash = self.hash_password(cmd.password).await?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username),
                password_hash: ActiveValue::Set(password_hash),
                role: ActiveValue::Set(cmd.role.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            User::try_from(model)
        })
    }

    /// All users ordered by username. Requires an admin actor.
    pub async fn list_users(&self, actor: &Actor) -> ResultEngine<Vec<User>> {
        require_admin(actor)?;
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Deletes a user. Requires an admin actor; admins cannot delete
    /// themselves.
    pub async fn delete_user(&self, actor: &Actor, username: &str) -> ResultEngine<()> {
        require_admin(actor)?;
        let username = normalize_username(username)?;
        if actor.username == username {
            return Err(EngineError::Forbidden(
                "admins cannot delete themselves".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            model.delete(&db_tx).await?;
            tracing::info!(%username, by = %actor.username, "user deleted");
            Ok(())
        })
    }

    /// Changes the password of `username`.
    ///
    /// Changing your own password requires `current_password`. Admins may
    /// reset anyone else's without it.
    pub async fn change_password(
        &self,
        actor: &Actor,
        username: &str,
        current_password: Option<&str>,
        new_password: &str,
    ) -> ResultEngine<()> {
        let username = normalize_username(username)?;
        check_password(new_password)?;
        let model = users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?;

        if actor.username == username {
            let model = model
                .as_ref()
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let current = current_password.ok_or_else(|| {
                EngineError::Validation("current password is required".to_string())
            })?;
            if !verify_password(current.to_string(), model.password_hash.clone()).await? {
                return Err(EngineError::Unauthorized(
                    "current password is incorrect".to_string(),
                ));
            }
        } else {
            require_admin(actor)?;
        }

        let model =
            model.ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let password_hash = self.hash_password(new_password.to_string()).await?;
        let mut active: users::ActiveModel = model.into();
        active.password_hash = ActiveValue::Set(password_hash);
        active.update(&self.database).await?;
        tracing::info!(%username, by = %actor.username, "password changed");
        Ok(())
    }

    /// Checks a username/password pair.
    ///
    /// Returns `Ok(None)` for an unknown user or a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<Actor>> {
        let Some(model) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if !verify_password(password.to_string(), model.password_hash).await? {
            return Ok(None);
        }
        let role = Role::try_from(model.role.as_str())?;
        Ok(Some(Actor::new(model.username, role)))
    }

    async fn hash_password(&self, password: String) -> ResultEngine<String> {
        let cost = self.password_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| EngineError::Password(err.to_string()))?
            .map_err(Into::into)
    }
}

async fn verify_password(password: String, hash: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| EngineError::Password(err.to_string()))?
        .map_err(Into::into)
}
