//! In-memory movie store
//!
//! Holds the authoritative collection of movie records and the next-id
//! counter. Synchronization is the caller's job: the store lives behind
//! the lock in `AppState`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: String,
}

/// The mutable fields of a movie, as decoded from request bodies.
///
/// Absent fields decode to their zero values. An `id` field in the body
/// is ignored; the store assigns ids.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub genre: String,
}

/// Store-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id exists.
    NotFound(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "movie {id} not found"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The movie collection plus the id counter.
///
/// Ids start at 1, only increase, and are never reused even after
/// deletes. The collection preserves insertion order.
#[derive(Debug)]
pub struct MovieStore {
    movies: Vec<Movie>,
    next_id: i64,
}

impl MovieStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            movies: Vec::new(),
            next_id: 1,
        }
    }

    /// Assign the next id and append a new record. Never fails.
    pub fn create(&mut self, fields: MovieFields) -> Movie {
        let movie = Movie {
            id: self.next_id,
            title: fields.title,
            director: fields.director,
            year: fields.year,
            genre: fields.genre,
        };
        self.next_id += 1;
        self.movies.push(movie.clone());
        movie
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Movie] {
        &self.movies
    }

    /// Look up a record by id.
    pub fn get(&self, id: i64) -> Result<&Movie, StoreError> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Replace the non-id fields of an existing record in place.
    pub fn update(&mut self, id: i64, fields: MovieFields) -> Result<Movie, StoreError> {
        let movie = self
            .movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))?;

        movie.title = fields.title;
        movie.director = fields.director;
        movie.year = fields.year;
        movie.genre = fields.genre;

        Ok(movie.clone())
    }

    /// Remove a record, preserving the order of the remaining ones.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let index = self
            .movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))?;

        self.movies.remove(index);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> MovieFields {
        MovieFields {
            title: title.to_string(),
            director: "Nolan".to_string(),
            year: 2010,
            genre: "Sci-Fi".to_string(),
        }
    }

    #[test]
    fn create_assigns_strictly_increasing_ids() {
        let mut store = MovieStore::new();
        let ids: Vec<i64> = (0..5)
            .map(|i| store.create(fields(&format!("m{i}"))).id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut store = MovieStore::new();
        store.create(fields("a"));
        let second = store.create(fields("b"));
        store.delete(second.id).unwrap();

        let third = store.create(fields("c"));
        assert_eq!(third.id, 3);

        store.delete(1).unwrap();
        store.delete(3).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.create(fields("d")).id, 4);
    }

    #[test]
    fn create_then_get_returns_equal_record() {
        let mut store = MovieStore::new();
        let created = store.create(fields("Inception"));
        assert_eq!(store.get(created.id).unwrap(), &created);
    }

    #[test]
    fn update_replaces_fields_and_keeps_id() {
        let mut store = MovieStore::new();
        let created = store.create(fields("Inception"));

        let updated = store
            .update(
                created.id,
                MovieFields {
                    title: "Heat".to_string(),
                    director: "Mann".to_string(),
                    year: 1995,
                    genre: "Crime".to_string(),
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Heat");
        assert_eq!(updated.director, "Mann");
        assert_eq!(updated.year, 1995);
        assert_eq!(updated.genre, "Crime");
        assert_eq!(store.get(created.id).unwrap(), &updated);
    }

    #[test]
    fn delete_removes_record_and_preserves_order() {
        let mut store = MovieStore::new();
        store.create(fields("a"));
        store.create(fields("b"));
        store.create(fields("c"));

        store.delete(2).unwrap();

        assert_eq!(store.len(), 2);
        let ids: Vec<i64> = store.list().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.get(2), Err(StoreError::NotFound(2)));
    }

    #[test]
    fn missing_id_operations_do_not_mutate() {
        let mut store = MovieStore::new();
        store.create(fields("a"));
        let before: Vec<Movie> = store.list().to_vec();

        assert_eq!(store.get(42), Err(StoreError::NotFound(42)));
        assert_eq!(store.get(-1), Err(StoreError::NotFound(-1)));
        assert_eq!(store.update(42, fields("x")), Err(StoreError::NotFound(42)));
        assert_eq!(store.delete(42), Err(StoreError::NotFound(42)));

        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = MovieStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }
}
