//! MySQL-backed [`Store`]. The driver is synchronous, so every query runs
//! on the blocking thread pool via `web::block`; the connection pool itself
//! is bounded, and requests past the bound queue inside it.

use std::sync::{Arc, OnceLock};

use actix_web::web;
use async_trait::async_trait;
use mysql::{prelude::*, Opts, OptsBuilder, Pool, PooledConn, Row};

use super::{Store, StoreError};
use crate::config::Config;
use crate::models::{Book, BookFields, Role, User};

const BOOK_COLUMNS: &str = "id, itemname, description, price, cata, image";

#[derive(Clone)]
pub struct MySqlStore {
    inner: Arc<Inner>,
}

struct Inner {
    opts: Opts,
    pool_size: usize,
    // Created on first use so the readiness probe owns the retry loop;
    // pool construction eagerly opens its minimum connection.
    pool: OnceLock<Pool>,
}

impl Inner {
    fn pool(&self) -> Result<Pool, mysql::Error> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool.clone());
        }
        let pool = Pool::new_manual(1, self.pool_size, self.opts.clone())?;
        Ok(self.pool.get_or_init(|| pool).clone())
    }
}

impl MySqlStore {
    pub fn new(config: &Config) -> Self {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.db_host.clone()))
            .tcp_port(config.db_port)
            .user(Some(config.db_user.clone()))
            .pass(Some(config.db_password.clone()))
            .db_name(Some(config.db_name.clone()));
        Self {
            inner: Arc::new(Inner {
                opts: Opts::from(opts),
                pool_size: config.db_pool_size,
                pool: OnceLock::new(),
            }),
        }
    }

    async fn run<T, F>(&self, job: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PooledConn) -> Result<T, mysql::Error> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        web::block(move || {
            let pool = inner.pool()?;
            let mut conn = pool.get_conn()?;
            job(&mut conn)
        })
        .await
        .map_err(|_| StoreError::Canceled)?
        .map_err(StoreError::Query)
    }
}

fn book_from_row(row: Row) -> Book {
    let (id, itemname, description, price, cata, image) = mysql::from_row(row);
    Book {
        id,
        itemname,
        description,
        price,
        cata,
        image,
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.run(|conn| conn.query_drop("SELECT 1")).await
    }

    async fn list_books(&self, name: Option<String>) -> Result<Vec<Book>, StoreError> {
        self.run(move |conn| match name {
            Some(name) => conn.exec_map(
                format!("SELECT {BOOK_COLUMNS} FROM books WHERE itemname = ?"),
                (name,),
                book_from_row,
            ),
            None => conn.query_map(format!("SELECT {BOOK_COLUMNS} FROM books"), book_from_row),
        })
        .await
    }

    async fn get_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        self.run(move |conn| {
            let row: Option<Row> = conn.exec_first(
                format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"),
                (id,),
            )?;
            Ok(row.map(book_from_row))
        })
        .await
    }

    async fn insert_book(&self, fields: BookFields) -> Result<i32, StoreError> {
        self.run(move |conn| {
            conn.exec_drop(
                "INSERT INTO books (itemname, description, price, cata, image) \
                 VALUES (?, ?, ?, ?, ?)",
                (
                    fields.itemname,
                    fields.description,
                    fields.price,
                    fields.cata,
                    fields.image,
                ),
            )?;
            let id: Option<u64> = conn.query_first("SELECT LAST_INSERT_ID()")?;
            Ok(id.unwrap_or_default() as i32)
        })
        .await
    }

    async fn update_book(&self, id: i32, fields: BookFields) -> Result<(), StoreError> {
        self.run(move |conn| {
            conn.exec_drop(
                "UPDATE books SET itemname = ?, description = ?, price = ?, cata = ?, image = ? \
                 WHERE id = ?",
                (
                    fields.itemname,
                    fields.description,
                    fields.price,
                    fields.cata,
                    fields.image,
                    id,
                ),
            )
        })
        .await
    }

    async fn delete_book(&self, id: i32) -> Result<(), StoreError> {
        self.run(move |conn| conn.exec_drop("DELETE FROM books WHERE id = ?", (id,)))
            .await
    }

    async fn clear_books(&self) -> Result<(), StoreError> {
        self.run(|conn| conn.query_drop("DELETE FROM books")).await
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.run(move |conn| {
            conn.exec_drop(
                "INSERT INTO users (username, password, role, email) VALUES (?, ?, ?, ?)",
                (
                    user.username,
                    user.password_hash,
                    user.role.as_str(),
                    user.email,
                ),
            )
        })
        .await
    }

    async fn find_user(&self, username: String) -> Result<Option<User>, StoreError> {
        self.run(move |conn| {
            let row: Option<(String, String, String, String)> = conn.exec_first(
                "SELECT username, password, role, email FROM users WHERE username = ?",
                (username,),
            )?;
            Ok(row.map(|(username, password_hash, role, email)| User {
                username,
                password_hash,
                role: Role::from_db(&role),
                email,
            }))
        })
        .await
    }
}
