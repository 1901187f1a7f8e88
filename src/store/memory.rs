//! In-memory [`Store`] used by the test suite and for poking at the API
//! without a database. Mirrors the MySQL semantics that matter to callers:
//! generated ids, the unique username constraint, and the idempotent
//! update/delete no-ops.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Store, StoreError};
use crate::models::{Book, BookFields, User};

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<BTreeMap<i32, Book>>,
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_books(&self, name: Option<String>) -> Result<Vec<Book>, StoreError> {
        let books = self.books.read().expect("book table lock poisoned");
        Ok(books
            .values()
            .filter(|book| name.as_deref().map_or(true, |n| book.itemname == n))
            .cloned()
            .collect())
    }

    async fn get_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let books = self.books.read().expect("book table lock poisoned");
        Ok(books.get(&id).cloned())
    }

    async fn insert_book(&self, fields: BookFields) -> Result<i32, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let book = Book {
            id,
            itemname: fields.itemname,
            description: fields.description,
            price: fields.price,
            cata: fields.cata,
            image: fields.image,
        };
        self.books
            .write()
            .expect("book table lock poisoned")
            .insert(id, book);
        Ok(id)
    }

    async fn update_book(&self, id: i32, fields: BookFields) -> Result<(), StoreError> {
        let mut books = self.books.write().expect("book table lock poisoned");
        if let Some(book) = books.get_mut(&id) {
            *book = Book {
                id,
                itemname: fields.itemname,
                description: fields.description,
                price: fields.price,
                cata: fields.cata,
                image: fields.image,
            };
        }
        Ok(())
    }

    async fn delete_book(&self, id: i32) -> Result<(), StoreError> {
        self.books
            .write()
            .expect("book table lock poisoned")
            .remove(&id);
        Ok(())
    }

    async fn clear_books(&self) -> Result<(), StoreError> {
        self.books.write().expect("book table lock poisoned").clear();
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().expect("user table lock poisoned");
        if users.contains_key(&user.username) {
            return Err(StoreError::Constraint("users.username"));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find_user(&self, username: String) -> Result<Option<User>, StoreError> {
        let users = self.users.read().expect("user table lock poisoned");
        Ok(users.get(&username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn fields(name: &str, price: f64) -> BookFields {
        BookFields {
            itemname: name.to_string(),
            description: "desc".to_string(),
            price,
            cata: "fiction".to_string(),
            image: "cover.jpg".to_string(),
        }
    }

    #[actix_rt::test]
    async fn ids_are_generated_and_stable() {
        let store = MemoryStore::new();
        let first = store.insert_book(fields("Dune", 12.5)).await.unwrap();
        let second = store.insert_book(fields("Emma", 8.0)).await.unwrap();
        assert_ne!(first, second);
        let book = store.get_book(first).await.unwrap().unwrap();
        assert_eq!(book.itemname, "Dune");
    }

    #[actix_rt::test]
    async fn update_and_delete_are_noops_on_missing_rows() {
        let store = MemoryStore::new();
        store.update_book(99, fields("Ghost", 1.0)).await.unwrap();
        store.delete_book(99).await.unwrap();
        assert!(store.get_book(99).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn duplicate_usernames_hit_the_constraint() {
        let store = MemoryStore::new();
        let user = User {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Customer,
            email: "alice@example.com".to_string(),
        };
        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }
}
