use catalog_core::db::open_db_in_memory;
use catalog_core::service::cast_member_service::{
    CreateCastMemberInput, ListCastMembersInput, UpdateCastMemberInput,
};
use catalog_core::service::category_service::{
    CreateCategoryInput, ListCategoriesInput, UpdateCategoryInput,
};
use catalog_core::{
    CastMemberFilter, CastMemberInMemoryRepository, CastMemberService, CastMemberType,
    CategoryInMemoryRepository, CategoryService, Repository, ServiceError,
    SqliteCategoryRepository,
};

fn category_service() -> CategoryService<CategoryInMemoryRepository> {
    CategoryService::new(CategoryInMemoryRepository::new())
}

fn cast_member_service() -> CastMemberService<CastMemberInMemoryRepository> {
    CastMemberService::new(CastMemberInMemoryRepository::new())
}

fn create_input(name: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: name.to_string(),
        ..CreateCategoryInput::default()
    }
}

#[test]
fn create_category_applies_defaults() {
    let service = category_service();

    let output = service.create(create_input("Movie")).unwrap();

    assert_eq!(output.name, "Movie");
    assert_eq!(output.description, None);
    assert!(output.is_active);
    assert_eq!(service.repository().items().len(), 1);
}

#[test]
fn create_category_with_empty_name_is_rejected() {
    let service = category_service();

    let err = service.create(create_input("")).unwrap_err();

    match err {
        ServiceError::Validation(errors) => {
            assert_eq!(errors.messages("name"), ["name should not be empty"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.repository().items().is_empty());
}

#[test]
fn create_category_with_long_name_is_rejected() {
    let service = category_service();

    let err = service.create(create_input(&"x".repeat(256))).unwrap_err();

    assert!(err
        .to_string()
        .contains("name must be shorter than or equal to 255 characters"));
}

#[test]
fn update_category_changes_only_given_fields() {
    let service = category_service();
    let created = service
        .create(CreateCategoryInput {
            name: "Movie".to_string(),
            description: Some("films".to_string()),
            is_active: None,
        })
        .unwrap();

    let updated = service
        .update(UpdateCategoryInput {
            id: created.id.clone(),
            is_active: Some(false),
            ..UpdateCategoryInput::default()
        })
        .unwrap();
    assert_eq!(updated.name, "Movie");
    assert_eq!(updated.description.as_deref(), Some("films"));
    assert!(!updated.is_active);

    let cleared = service
        .update(UpdateCategoryInput {
            id: created.id.clone(),
            name: Some("Film".to_string()),
            description: Some(None),
            ..UpdateCategoryInput::default()
        })
        .unwrap();
    assert_eq!(cleared.name, "Film");
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.created_at, created.created_at);
    assert_eq!(service.get(&created.id).unwrap(), cleared);
}

#[test]
fn invalid_update_persists_nothing() {
    let service = category_service();
    let created = service.create(create_input("Movie")).unwrap();

    let err = service
        .update(UpdateCategoryInput {
            id: created.id.clone(),
            name: Some(String::new()),
            is_active: Some(false),
            ..UpdateCategoryInput::default()
        })
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get(&created.id).unwrap(), created);
}

#[test]
fn update_of_missing_category_reports_its_id() {
    let service = category_service();
    let missing = "4f1c2a9e-8b7d-4e6f-a5c3-1d2e3f4a5b6c";

    let err = service
        .update(UpdateCategoryInput {
            id: missing.to_string(),
            name: Some("Movie".to_string()),
            ..UpdateCategoryInput::default()
        })
        .unwrap_err();

    match err {
        ServiceError::NotFound { entity, id } => {
            assert_eq!(entity, "Category");
            assert_eq!(id, missing);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_ids_are_rejected_before_lookup() {
    let service = category_service();

    assert!(matches!(
        service.get("not-a-uuid").unwrap_err(),
        ServiceError::InvalidId(_)
    ));
    assert!(matches!(
        service.delete("00000000-0000-0000-0000-000000000000").unwrap_err(),
        ServiceError::InvalidId(_)
    ));
}

#[test]
fn delete_category_then_get_is_not_found() {
    let service = category_service();
    let created = service.create(create_input("Movie")).unwrap();

    service.delete(&created.id).unwrap();

    assert!(matches!(
        service.get(&created.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete(&created.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn list_categories_returns_pagination_envelope() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    for name in ["c", "a", "b"] {
        service.create(create_input(name)).unwrap();
    }

    let output = service
        .list(ListCategoriesInput {
            per_page: Some("2".to_string()),
            sort: Some("name".to_string()),
            ..ListCategoriesInput::default()
        })
        .unwrap();

    let names: Vec<&str> = output.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(output.total, 3);
    assert_eq!(output.current_page, 1);
    assert_eq!(output.last_page, 2);
    assert_eq!(output.per_page, 2);
    assert_eq!(service.repository().find_all().unwrap().len(), 3);
}

#[test]
fn pagination_output_serializes_flat_fields() {
    let service = category_service();
    service.create(create_input("Movie")).unwrap();

    let output = service.list(ListCategoriesInput::default()).unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["total"], 1);
    assert_eq!(json["current_page"], 1);
    assert_eq!(json["last_page"], 1);
    assert_eq!(json["per_page"], 15);
    assert_eq!(json["items"][0]["name"], "Movie");
    assert_eq!(json["items"][0]["is_active"], true);
}

#[test]
fn create_cast_member_serializes_type_code() {
    let service = cast_member_service();

    let output = service
        .create(CreateCastMemberInput {
            name: "Ana".to_string(),
            member_type: 2,
        })
        .unwrap();

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["type"], 2);
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["id"], output.id.as_str());
}

#[test]
fn create_cast_member_reports_name_and_type_errors_together() {
    let service = cast_member_service();

    let err = service
        .create(CreateCastMemberInput {
            name: String::new(),
            member_type: 3,
        })
        .unwrap_err();

    match err {
        ServiceError::Validation(errors) => {
            assert_eq!(errors.messages("name"), ["name should not be empty"]);
            assert_eq!(errors.messages("type"), ["Invalid cast member type: 3"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_cast_member_changes_type_and_rejects_unknown_codes() {
    let service = cast_member_service();
    let created = service
        .create(CreateCastMemberInput {
            name: "Ana".to_string(),
            member_type: 1,
        })
        .unwrap();

    let updated = service
        .update(UpdateCastMemberInput {
            id: created.id.clone(),
            member_type: Some(2),
            ..UpdateCastMemberInput::default()
        })
        .unwrap();
    assert_eq!(updated.member_type, 2);
    assert_eq!(updated.name, "Ana");

    let err = service
        .update(UpdateCastMemberInput {
            id: created.id.clone(),
            name: Some("Ana Maria".to_string()),
            member_type: Some(0),
        })
        .unwrap_err();
    assert!(err.to_string().contains("Invalid cast member type: 0"));
    assert_eq!(service.get(&created.id).unwrap().name, "Ana");
}

#[test]
fn list_cast_members_by_type() {
    let service = cast_member_service();
    for (name, member_type) in [("Ana", 1), ("Bruno", 2), ("Carla", 2)] {
        service
            .create(CreateCastMemberInput {
                name: name.to_string(),
                member_type,
            })
            .unwrap();
    }

    let output = service
        .list(ListCastMembersInput {
            sort: Some("name".to_string()),
            sort_dir: Some("desc".to_string()),
            filter: Some(CastMemberFilter {
                name: None,
                member_type: Some(CastMemberType::Actor),
            }),
            ..ListCastMembersInput::default()
        })
        .unwrap();

    let names: Vec<&str> = output.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Carla", "Bruno"]);
    assert_eq!(output.total, 2);
}
