use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use super::{TripLogError, is_unique_violation};
use crate::db::entities::{prelude::User, user};

pub async fn get_user_by_email(
    db: &DbConn,
    email: &str,
) -> Result<Option<user::Model>, TripLogError> {
    Ok(User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn get_user_by_id(db: &DbConn, user_id: i32) -> Result<user::Model, TripLogError> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(TripLogError::NotFound("User"))
}

pub async fn list_users(db: &DbConn) -> Result<Vec<user::Model>, TripLogError> {
    Ok(User::find().order_by_asc(user::Column::Id).all(db).await?)
}

pub async fn create_user(
    db: &DbConn,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
) -> Result<user::Model, TripLogError> {
    if get_user_by_email(db, &email).await?.is_some() {
        return Err(TripLogError::DuplicateEmail(email));
    }

    let new_user = user::ActiveModel {
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(first_name),
        last_name: Set(last_name),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    };

    // A concurrent registration can still win the race past the lookup above.
    new_user.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            TripLogError::DuplicateEmail(email)
        } else {
            TripLogError::DbErr(e)
        }
    })
}

pub async fn update_user(
    db: &DbConn,
    user_id: i32,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password_hash: Option<String>,
) -> Result<user::Model, TripLogError> {
    let existing = get_user_by_id(db, user_id).await?;
    let mut active_user: user::ActiveModel = existing.into();

    if let Some(email) = email.clone() {
        active_user.email = Set(email);
    }
    if let Some(first_name) = first_name {
        active_user.first_name = Set(first_name);
    }
    if let Some(last_name) = last_name {
        active_user.last_name = Set(last_name);
    }
    if let Some(password_hash) = password_hash {
        active_user.password_hash = Set(password_hash);
    }

    active_user.update(db).await.map_err(|e| match email {
        Some(email) if is_unique_violation(&e) => TripLogError::DuplicateEmail(email),
        _ => TripLogError::DbErr(e),
    })
}

pub async fn delete_user(db: &DbConn, user_id: i32) -> Result<(), TripLogError> {
    let existing = get_user_by_id(db, user_id).await?;
    existing.delete(db).await?;
    Ok(())
}
