//! Generic in-memory repository.
//!
//! # Responsibility
//! - Hold entities in insertion order for tests and embedded callers.
//! - Implement search directly: filter, then sort, then paginate.
//!
//! # Invariants
//! - Sorting is stable; equal keys keep their filtered order.
//! - Unsortable or absent sort fields fall back to `Searchable::default_sort`.
//! - Out-of-range pages yield empty items with the unchanged total.
//! - Single-threaded: items live behind a `RefCell`.

use crate::model::entity::Entity;
use crate::repo::repository::{
    ExistsById, RepoError, RepoResult, Repository, Searchable, SearchableRepository,
};
use crate::repo::search::{SearchParams, SearchResult, SortDirection};
use std::cell::RefCell;

/// Vector-backed repository for any entity kind.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    items: RefCell<Vec<E>>,
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
        }
    }
}

impl<E: Entity + Clone> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `items`, in order.
    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    /// Snapshot of all stored entities in storage order.
    pub fn items(&self) -> Vec<E> {
        self.items.borrow().clone()
    }

    fn position(&self, id: &E::Id) -> Option<usize> {
        self.items
            .borrow()
            .iter()
            .position(|item| item.entity_id() == id)
    }
}

impl<E: Entity + Clone> Repository<E> for InMemoryRepository<E> {
    fn insert(&self, entity: &E) -> RepoResult<()> {
        self.items.borrow_mut().push(entity.clone());
        Ok(())
    }

    fn bulk_insert(&self, entities: &[E]) -> RepoResult<()> {
        self.items.borrow_mut().extend_from_slice(entities);
        Ok(())
    }

    fn update(&self, entity: &E) -> RepoResult<()> {
        let index = self
            .position(entity.entity_id())
            .ok_or_else(|| RepoError::not_found::<E>(entity.entity_id()))?;
        self.items.borrow_mut()[index] = entity.clone();
        Ok(())
    }

    fn delete(&self, id: &E::Id) -> RepoResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| RepoError::not_found::<E>(id))?;
        self.items.borrow_mut().remove(index);
        Ok(())
    }

    fn find_by_id(&self, id: &E::Id) -> RepoResult<Option<E>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .find(|item| item.entity_id() == id)
            .cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<E>> {
        Ok(self.items())
    }

    fn find_by_ids(&self, ids: &[E::Id]) -> RepoResult<Vec<E>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|item| ids.contains(item.entity_id()))
            .cloned()
            .collect())
    }

    fn exists_by_id(&self, ids: &[E::Id]) -> RepoResult<ExistsById<E::Id>> {
        let items = self.items.borrow();
        let mut result = ExistsById::default();
        for id in ids {
            if items.iter().any(|item| item.entity_id() == id) {
                result.exists.push(*id);
            } else {
                result.not_exists.push(*id);
            }
        }
        Ok(result)
    }
}

impl<E: Searchable> SearchableRepository<E> for InMemoryRepository<E> {
    fn search(&self, params: &SearchParams<E::Filter>) -> RepoResult<SearchResult<E>> {
        let filtered = apply_filter(&self.items.borrow(), params.filter());
        let mut sorted = apply_sort(filtered, params.sort(), params.sort_dir());
        let total = sorted.len();
        let page: Vec<E> = sorted.drain(params.window(total)).collect();

        Ok(SearchResult::new(
            page,
            total as u64,
            params.page(),
            params.per_page(),
        ))
    }
}

fn apply_filter<E: Searchable>(items: &[E], filter: Option<&E::Filter>) -> Vec<E> {
    match filter {
        Some(filter) => items
            .iter()
            .filter(|item| item.matches_filter(filter))
            .cloned()
            .collect(),
        None => items.to_vec(),
    }
}

fn apply_sort<E: Searchable>(
    items: Vec<E>,
    sort: Option<&str>,
    sort_dir: Option<SortDirection>,
) -> Vec<E> {
    let (field, direction) = match sort.filter(|field| E::is_sortable(field)) {
        Some(field) => (field, sort_dir.unwrap_or(SortDirection::Asc)),
        None => match E::default_sort() {
            Some(default) => default,
            None => return items,
        },
    };

    let mut keyed: Vec<_> = items
        .into_iter()
        .map(|item| (item.sort_value(field), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}
