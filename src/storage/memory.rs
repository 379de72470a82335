//! In-memory storage backend
//!
//! Plain maps behind a single RwLock: ids are auto-incrementing integers
//! starting at 1, per-user listings are linear scans, and categories and
//! bookmarks iterate in id order (BTreeMap). State lives only as long as
//! the process.

use anyhow::{bail, Result};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{
    Bookmark, BookmarkPatch, BookmarkStore, Category, NewBookmark, NewCategory, NewUser,
    StoreCounts, User,
};

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    // username -> id index; uniqueness check and login lookup
    users_by_name: HashMap<String, i64>,
    categories: BTreeMap<i64, Category>,
    bookmarks: BTreeMap<i64, Bookmark>,

    next_user_id: i64,
    next_category_id: i64,
    next_bookmark_id: i64,
}

/// In-memory [`BookmarkStore`] implementation
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_category_id: 1,
                next_bookmark_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkStore for MemoryStore {
    fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .users_by_name
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        let mut inner = self.inner.write();

        if inner.users_by_name.contains_key(&user.username) {
            bail!("username already exists: {}", user.username);
        }

        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let record = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
        };
        inner.users_by_name.insert(record.username.clone(), id);
        inner.users.insert(id, record.clone());
        Ok(record)
    }

    fn delete_user(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write();

        let Some(user) = inner.users.remove(&id) else {
            return Ok(false);
        };
        inner.users_by_name.remove(&user.username);
        inner.categories.retain(|_, c| c.user_id != id);
        inner.bookmarks.retain(|_, b| b.user_id != id);
        Ok(true)
    }

    fn get_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        Ok(self
            .inner
            .read()
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.inner.read().categories.get(&id).cloned())
    }

    fn create_category(&self, category: NewCategory) -> Result<Category> {
        let mut inner = self.inner.write();

        let id = inner.next_category_id;
        inner.next_category_id += 1;

        let record = Category {
            id,
            name: category.name,
            user_id: category.user_id,
        };
        inner.categories.insert(id, record.clone());
        Ok(record)
    }

    fn delete_category(&self, id: i64) -> Result<bool> {
        // Member bookmarks keep their categoryId; the reference simply
        // dangles, matching a category-less listing on the client.
        Ok(self.inner.write().categories.remove(&id).is_some())
    }

    fn get_bookmarks(&self, user_id: i64) -> Result<Vec<Bookmark>> {
        Ok(self
            .inner
            .read()
            .bookmarks
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_bookmarks_by_category(&self, category_id: i64) -> Result<Vec<Bookmark>> {
        Ok(self
            .inner
            .read()
            .bookmarks
            .values()
            .filter(|b| b.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>> {
        Ok(self.inner.read().bookmarks.get(&id).cloned())
    }

    fn create_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        let mut inner = self.inner.write();

        let id = inner.next_bookmark_id;
        inner.next_bookmark_id += 1;

        let record = Bookmark {
            id,
            name: bookmark.name,
            url: bookmark.url,
            username: bookmark.username,
            password: bookmark.password,
            category_id: bookmark.category_id,
            user_id: bookmark.user_id,
            created_at: Utc::now(),
        };
        inner.bookmarks.insert(id, record.clone());
        Ok(record)
    }

    fn update_bookmark(&self, id: i64, patch: BookmarkPatch) -> Result<Option<Bookmark>> {
        let mut inner = self.inner.write();

        let Some(existing) = inner.bookmarks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            existing.name = name;
        }
        if let Some(url) = patch.url {
            existing.url = url;
        }
        if let Some(username) = patch.username {
            existing.username = username;
        }
        if let Some(password) = patch.password {
            existing.password = password;
        }
        if let Some(category_id) = patch.category_id {
            existing.category_id = category_id;
        }

        Ok(Some(existing.clone()))
    }

    fn delete_bookmark(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().bookmarks.remove(&id).is_some())
    }

    fn counts(&self) -> Result<StoreCounts> {
        let inner = self.inner.read();
        Ok(StoreCounts {
            users: inner.users.len(),
            categories: inner.categories.len(),
            bookmarks: inner.bookmarks.len(),
        })
    }
}
