//! Search behaviour shared by the in-memory and SQLite category repositories.

use catalog_core::db::open_db_in_memory;
use catalog_core::model::category::CategorySnapshot;
use catalog_core::repo::category_repo::CategorySearchParams;
use catalog_core::{
    Category, CategoryId, CategoryInMemoryRepository, CategoryRepository, SearchParamsInput,
    SortDirection, SqliteCategoryRepository,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn category_at(name: &str, minutes: i64) -> Category {
    Category::restore(CategorySnapshot {
        category_id: CategoryId::new(),
        name: name.to_string(),
        description: None,
        is_active: true,
        created_at: base_time() + Duration::minutes(minutes),
    })
    .unwrap()
}

fn names(items: &[Category]) -> Vec<&str> {
    items.iter().map(Category::name).collect()
}

fn with_sqlite(scenario: impl FnOnce(&SqliteCategoryRepository<'_>)) {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    scenario(&repo);
}

fn with_in_memory(scenario: impl FnOnce(&CategoryInMemoryRepository)) {
    scenario(&CategoryInMemoryRepository::new());
}

fn second_page_holds_remainder(repo: &impl CategoryRepository) {
    let categories: Vec<Category> = (0..20)
        .map(|i| category_at(&format!("category {i:02}"), i))
        .collect();
    repo.bulk_insert(&categories).unwrap();

    let params = CategorySearchParams::new().with_per_page(15).with_page(2);
    let result = repo.search(&params).unwrap();

    assert_eq!(result.items().len(), 5);
    assert_eq!(result.total(), 20);
    assert_eq!(result.current_page(), 2);
    assert_eq!(result.per_page(), 15);
    assert_eq!(result.last_page(), 2);
    // default order is newest first, so page two holds the five oldest
    assert_eq!(
        names(result.items()),
        [
            "category 04",
            "category 03",
            "category 02",
            "category 01",
            "category 00"
        ]
    );
}

fn sorts_by_name_ascending_and_descending(repo: &impl CategoryRepository) {
    for (i, name) in ["c", "a", "b"].into_iter().enumerate() {
        repo.insert(&category_at(name, i as i64)).unwrap();
    }

    let asc = repo
        .search(&CategorySearchParams::new().with_sort("name", Some(SortDirection::Asc)))
        .unwrap();
    assert_eq!(names(asc.items()), ["a", "b", "c"]);

    let desc = repo
        .search(&CategorySearchParams::new().with_sort("name", Some(SortDirection::Desc)))
        .unwrap();
    assert_eq!(names(desc.items()), ["c", "b", "a"]);

    let default_dir = repo
        .search(&CategorySearchParams::new().with_sort("name", None))
        .unwrap();
    assert_eq!(names(default_dir.items()), ["a", "b", "c"]);
}

fn unsortable_field_uses_default_order(repo: &impl CategoryRepository) {
    for (i, name) in ["first", "second", "third"].into_iter().enumerate() {
        repo.insert(&category_at(name, i as i64)).unwrap();
    }

    let baseline = repo.search(&CategorySearchParams::new()).unwrap();
    for field in ["description", "name; DROP TABLE categories", "is_active"] {
        let params = CategorySearchParams::new().with_sort(field, Some(SortDirection::Asc));
        let result = repo.search(&params).unwrap();
        assert_eq!(names(result.items()), names(baseline.items()), "field {field}");
    }
    assert_eq!(names(baseline.items()), ["third", "second", "first"]);
}

fn filter_is_case_insensitive_and_paginated(repo: &impl CategoryRepository) {
    let categories = vec![
        category_at("Movie", 0),
        category_at("Documentary", 1),
        category_at("short movie", 2),
        category_at("MOVIES 4K", 3),
        category_at("Series", 4),
    ];
    repo.bulk_insert(&categories).unwrap();

    let params = CategorySearchParams::new()
        .with_filter("movie".to_string())
        .with_per_page(2)
        .with_sort("name", Some(SortDirection::Asc));
    let first = repo.search(&params).unwrap();
    assert_eq!(first.total(), 3);
    assert_eq!(first.last_page(), 2);
    // byte order: uppercase sorts before lowercase
    assert_eq!(names(first.items()), ["MOVIES 4K", "Movie"]);

    let second = repo.search(&params.clone().with_page(2)).unwrap();
    assert_eq!(names(second.items()), ["short movie"]);
}

fn filter_treats_wildcards_literally(repo: &impl CategoryRepository) {
    for (i, name) in ["100% drama", "1000 dramas", "a_b", "axb"].into_iter().enumerate() {
        repo.insert(&category_at(name, i as i64)).unwrap();
    }

    let percent = repo
        .search(&CategorySearchParams::new().with_filter("0%".to_string()))
        .unwrap();
    assert_eq!(names(percent.items()), ["100% drama"]);

    let underscore = repo
        .search(&CategorySearchParams::new().with_filter("a_b".to_string()))
        .unwrap();
    assert_eq!(names(underscore.items()), ["a_b"]);
}

fn filter_folds_non_ascii_case(repo: &impl CategoryRepository) {
    for (i, name) in ["Épico", "épica", "ÉTNICO", "Epopeia"].into_iter().enumerate() {
        repo.insert(&category_at(name, i as i64)).unwrap();
    }

    let accented = repo
        .search(&CategorySearchParams::new().with_filter("ÉPIC".to_string()))
        .unwrap();
    assert_eq!(names(accented.items()), ["épica", "Épico"]);

    let lowercase = repo
        .search(&CategorySearchParams::new().with_filter("étn".to_string()))
        .unwrap();
    assert_eq!(names(lowercase.items()), ["ÉTNICO"]);
}

fn filter_matches_renamed_category(repo: &impl CategoryRepository) {
    let mut category = category_at("Ação", 0);
    repo.insert(&category).unwrap();
    category.change_name("Suspense").unwrap();
    repo.update(&category).unwrap();

    let old_name = repo
        .search(&CategorySearchParams::new().with_filter("AÇÃO".to_string()))
        .unwrap();
    assert_eq!(old_name.total(), 0);

    let new_name = repo
        .search(&CategorySearchParams::new().with_filter("SUSP".to_string()))
        .unwrap();
    assert_eq!(names(new_name.items()), ["Suspense"]);
}

fn empty_filter_matches_everything(repo: &impl CategoryRepository) {
    repo.insert(&category_at("one", 0)).unwrap();
    repo.insert(&category_at("two", 1)).unwrap();

    let result = repo
        .search(&CategorySearchParams::new().with_filter(String::new()))
        .unwrap();
    assert_eq!(result.total(), 2);
}

fn page_beyond_last_is_empty(repo: &impl CategoryRepository) {
    for i in 0..3 {
        repo.insert(&category_at(&format!("c{i}"), i)).unwrap();
    }

    let result = repo
        .search(&CategorySearchParams::new().with_page(5))
        .unwrap();
    assert!(result.items().is_empty());
    assert_eq!(result.total(), 3);
    assert_eq!(result.current_page(), 5);
    assert_eq!(result.last_page(), 1);
}

fn pages_cover_total_exactly_once(repo: &impl CategoryRepository) {
    for i in 0..7 {
        repo.insert(&category_at(&format!("c{i}"), i)).unwrap();
    }

    let first = repo
        .search(&CategorySearchParams::new().with_per_page(3))
        .unwrap();
    let mut seen = Vec::new();
    for page in 1..=first.last_page() {
        let params = CategorySearchParams::new()
            .with_per_page(3)
            .with_page(i64::from(page));
        let result = repo.search(&params).unwrap();
        seen.extend(result.items().iter().map(Category::category_id));
    }

    assert_eq!(first.last_page(), 3);
    assert_eq!(seen.len() as u64, first.total());
    seen.sort_by_key(|id| id.to_string());
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

fn search_is_idempotent(repo: &impl CategoryRepository) {
    for i in 0..4 {
        repo.insert(&category_at(&format!("c{i}"), i % 2)).unwrap();
    }

    let params = CategorySearchParams::new()
        .with_sort("created_at", Some(SortDirection::Asc))
        .with_per_page(3);
    assert_eq!(repo.search(&params).unwrap(), repo.search(&params).unwrap());
}

fn malformed_input_is_coerced(repo: &impl CategoryRepository) {
    for i in 0..20 {
        repo.insert(&category_at(&format!("c{i}"), i)).unwrap();
    }

    let params = CategorySearchParams::from_input(SearchParamsInput {
        page: Some("-3".to_string()),
        per_page: Some("many".to_string()),
        sort: Some("name".to_string()),
        sort_dir: Some("sideways".to_string()),
        filter: None,
    });
    let result = repo.search(&params).unwrap();

    assert_eq!(result.current_page(), 1);
    assert_eq!(result.per_page(), 15);
    assert_eq!(result.items().len(), 15);
    assert_eq!(result.items()[0].name(), "c0");
}

macro_rules! search_cases {
    ($($scenario:ident),* $(,)?) => {
        mod in_memory {
            $(
                #[test]
                fn $scenario() {
                    super::with_in_memory(|repo| super::$scenario(repo));
                }
            )*
        }

        mod sqlite {
            $(
                #[test]
                fn $scenario() {
                    super::with_sqlite(|repo| super::$scenario(repo));
                }
            )*
        }
    };
}

search_cases!(
    second_page_holds_remainder,
    sorts_by_name_ascending_and_descending,
    unsortable_field_uses_default_order,
    filter_is_case_insensitive_and_paginated,
    filter_treats_wildcards_literally,
    filter_folds_non_ascii_case,
    filter_matches_renamed_category,
    empty_filter_matches_everything,
    page_beyond_last_is_empty,
    pages_cover_total_exactly_once,
    search_is_idempotent,
    malformed_input_is_coerced,
);
