use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Identity;
use crate::domain::user::models::Profile;
use crate::domain::user::models::Role;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;

const SELECT_COLUMNS: &str = r#"
    SELECT uid, username, password_hash, role, position, disabled,
           firstname, lastname, nickname, tel, room_number, created_at
    FROM users
"#;

// Empty arrays disable the corresponding filter.
const FILTER_CLAUSE: &str = r#"
    WHERE (cardinality($1::text[]) = 0 OR role = ANY($1))
      AND (cardinality($2::text[]) = 0 OR position = ANY($2))
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    uid: Uuid,
    username: String,
    password_hash: String,
    role: Option<String>,
    position: Option<String>,
    disabled: bool,
    firstname: Option<String>,
    lastname: Option<String>,
    nickname: Option<String>,
    tel: Option<String>,
    room_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for CredentialRecord {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.as_deref().and_then(|tag| {
            let role = Role::parse(tag);
            if role.is_none() {
                tracing::warn!(uid = %row.uid, role = tag, "Unknown role tag in store");
            }
            role
        });

        Ok(CredentialRecord {
            identity: Identity {
                uid: Uid(row.uid),
                username: Username::new(row.username)?,
                role,
                position: row.position,
                disabled: row.disabled,
            },
            profile: Profile {
                firstname: row.firstname,
                lastname: row.lastname,
                nickname: row.nickname,
                tel: row.tel,
                room_number: row.room_number,
            },
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, record: &CredentialRecord) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(
                    record.identity.username.as_str().to_string(),
                );
            }
            if db_err.constraint() == Some("users_room_number_key") {
                return UserError::RoomAlreadyExists(
                    record.profile.room_number.clone().unwrap_or_default(),
                );
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, username, password_hash, role, position, disabled,
                               firstname, lastname, nickname, tel, room_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.identity.uid.0)
        .bind(record.identity.username.as_str())
        .bind(&record.password_hash)
        .bind(record.identity.role.map(|role| role.as_str()))
        .bind(&record.identity.position)
        .bind(record.identity.disabled)
        .bind(&record.profile.firstname)
        .bind(&record.profile.lastname)
        .bind(&record.profile.nickname)
        .bind(&record.profile.tel)
        .bind(&record.profile.room_number)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &record))?;

        Ok(record)
    }

    async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CredentialRecord>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE uid = $1", SELECT_COLUMNS))
            .bind(uid.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserError> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("{} WHERE username = $1", SELECT_COLUMNS))
                .bind(username.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CredentialRecord>, UserError> {
        let roles: Vec<String> = filter
            .roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {}", FILTER_CLAUSE))
                .bind(&roles)
                .bind(&filter.positions)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{} {} ORDER BY created_at ASC, uid ASC OFFSET $3 LIMIT $4",
            SELECT_COLUMNS, FILTER_CLAUSE
        ))
        .bind(&roles)
        .bind(&filter.positions)
        .bind(i64::from(page.skip()))
        .bind(i64::from(page.limit()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(CredentialRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
            request: page,
        })
    }

    async fn update(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, role = $4, position = $5, disabled = $6,
                firstname = $7, lastname = $8, nickname = $9, tel = $10, room_number = $11
            WHERE uid = $1
            "#,
        )
        .bind(record.identity.uid.0)
        .bind(record.identity.username.as_str())
        .bind(&record.password_hash)
        .bind(record.identity.role.map(|role| role.as_str()))
        .bind(&record.identity.position)
        .bind(record.identity.disabled)
        .bind(&record.profile.firstname)
        .bind(&record.profile.lastname)
        .bind(&record.profile.nickname)
        .bind(&record.profile.tel)
        .bind(&record.profile.room_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &record))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(record.identity.uid.to_string()));
        }

        Ok(record)
    }

    async fn delete(&self, uid: &Uid) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE uid = $1")
            .bind(uid.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(uid.to_string()));
        }

        Ok(())
    }
}
