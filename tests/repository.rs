use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pushkind_catalog::cache::{InMemoryCache, ProductCache};
use pushkind_catalog::domain::category::NewCategory;
use pushkind_catalog::domain::pagination::PageRequest;
use pushkind_catalog::domain::product::{NewProduct, ProductChanges};
use pushkind_catalog::domain::types::{
    CategoryId, CategoryName, ImageName, ProductAddress, ProductId, ProductName, ProductPrice,
    ProductQuantity,
};
use pushkind_catalog::forms::categories::CategoryForm;
use pushkind_catalog::forms::products::ProductForm;
use pushkind_catalog::images::ImageStore;
use pushkind_catalog::repository::{
    CategoryFilter, CategoryReader, CategoryWriter, DieselRepository, ProductFilter, ProductOrder,
    ProductReader, ProductWriter, RepositoryError,
};
use pushkind_catalog::schema::products;
use pushkind_catalog::services::{ServiceError, categories, products as product_service};

mod common;

fn new_category(name: &str) -> NewCategory {
    NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        status: true,
        image: None,
        created_at: Utc::now().naive_utc(),
    }
}

fn new_product(category_id: CategoryId, name: &str, price: f64, created: i64) -> NewProduct {
    NewProduct {
        category_id,
        name: ProductName::new(name).expect("valid product name"),
        price: ProductPrice::new(price).expect("valid price"),
        quantity: ProductQuantity::new(1).expect("valid quantity"),
        address: Some(ProductAddress::new("Main street 1").expect("valid address")),
        description: None,
        image: None,
        status: true,
        created_at: DateTime::from_timestamp(created, 0)
            .expect("valid timestamp")
            .naive_utc(),
    }
}

#[test]
fn deactivate_category_cascades_to_active_products() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let shoes = repo
        .create_category(&new_category("Shoes"))
        .expect("should create category");
    let hats = repo
        .create_category(&new_category("Hats"))
        .expect("should create category");
    let boot = repo
        .create_product(&new_product(shoes.id, "Boot", 10.0, 1))
        .expect("should create product");
    repo.create_product(&new_product(shoes.id, "Sneaker", 20.0, 2))
        .expect("should create product");
    let cap = repo
        .create_product(&new_product(hats.id, "Cap", 5.0, 3))
        .expect("should create product");
    repo.deactivate_product(boot.id)
        .expect("should deactivate product");

    let result = repo
        .deactivate_category(shoes.id)
        .expect("should deactivate category");
    assert_eq!(result.category_id, shoes.id);
    assert_eq!(result.deactivated_products, 1);

    let category = repo
        .get_category_by_id(shoes.id)
        .expect("should read category")
        .expect("category should still exist");
    assert!(!category.status);
    assert!(category.updated_at.is_some());

    let remaining = repo
        .list_products(ProductFilter::default().status(true))
        .expect("should list products");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, cap.id);
}

#[test]
fn deactivate_missing_category_fails_without_side_effects() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let shoes = repo
        .create_category(&new_category("Shoes"))
        .expect("should create category");
    repo.create_product(&new_product(shoes.id, "Boot", 10.0, 1))
        .expect("should create product");

    let missing = CategoryId::new(shoes.id.get() + 100).expect("valid id");
    assert!(repo.deactivate_category(missing).is_err());

    let active = repo
        .list_products(ProductFilter::default().status(true))
        .expect("should list products");
    assert_eq!(active.len(), 1);
}

#[test]
fn category_names_are_unique_ignoring_case() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    repo.create_category(&new_category("Shoes"))
        .expect("should create category");

    let err = repo
        .create_category(&new_category("sHoEs"))
        .expect_err("duplicate name should be rejected");
    assert!(matches!(err, RepositoryError::UniqueViolation(_)));

    let found = repo
        .find_category_by_name(&CategoryName::new("SHOES").expect("valid name"))
        .expect("should query by name");
    assert_eq!(found.map(|c| c.name.into_inner()), Some("Shoes".to_string()));
}

#[test]
fn name_search_treats_wildcards_literally() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    repo.create_category(&new_category("50% off"))
        .expect("should create category");
    repo.create_category(&new_category("500 items"))
        .expect("should create category");
    repo.create_category(&new_category("snake_case"))
        .expect("should create category");
    repo.create_category(&new_category("snakeXcase"))
        .expect("should create category");

    let percent = repo
        .list_categories(CategoryFilter::default().name_contains("0%"))
        .expect("should search categories");
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "50% off");

    let underscore = repo
        .list_categories(CategoryFilter::default().name_contains("E_C"))
        .expect("should search categories");
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "snake_case");
}

#[test]
fn product_filters_and_orderings() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let shoes = repo
        .create_category(&new_category("Shoes"))
        .expect("should create category");
    let cheap = repo
        .create_product(&new_product(shoes.id, "Flip flop", 5.0, 30))
        .expect("should create product");
    let middle = repo
        .create_product(&new_product(shoes.id, "Loafer", 50.0, 10))
        .expect("should create product");
    let pricey = repo
        .create_product(&new_product(shoes.id, "Oxford", 150.0, 20))
        .expect("should create product");

    let in_range = repo
        .list_products(ProductFilter::default().price_between(Some(5.0), Some(50.0)))
        .expect("should filter by price");
    assert_eq!(
        in_range.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![cheap.id, middle.id]
    );

    let by_address = repo
        .list_products(
            ProductFilter::default()
                .address_contains("MAIN")
                .name_contains("ford"),
        )
        .expect("should filter by address and name");
    assert_eq!(by_address.len(), 1);
    assert_eq!(by_address[0].id, pricey.id);

    let newest = repo
        .list_products(ProductFilter::default().order(ProductOrder::NewestFirst))
        .expect("should order by creation");
    assert_eq!(
        newest.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![cheap.id, pricey.id, middle.id]
    );
}

#[test]
fn update_product_keeps_image_unless_replaced() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let shoes = repo
        .create_category(&new_category("Shoes"))
        .expect("should create category");
    let mut draft = new_product(shoes.id, "Boot", 10.0, 1);
    draft.image = Some(ImageName::new("boot.png").expect("valid image name"));
    let boot = repo.create_product(&draft).expect("should create product");

    let changes = ProductChanges {
        category_id: shoes.id,
        name: ProductName::new("Hiking boot").expect("valid name"),
        price: ProductPrice::new(12.0).expect("valid price"),
        quantity: ProductQuantity::new(7).expect("valid quantity"),
        address: None,
        description: None,
        image: None,
        status: true,
        updated_at: Utc::now().naive_utc(),
    };
    assert_eq!(
        repo.update_product(boot.id, &changes)
            .expect("should update product"),
        1
    );

    let stored = repo
        .get_product_by_id(boot.id)
        .expect("should read product")
        .expect("product should exist");
    assert_eq!(stored.name, "Hiking boot");
    assert_eq!(stored.address, None);
    assert_eq!(stored.image.map(|i| i.into_inner()), Some("boot.png".to_string()));

    let missing = ProductId::new(boot.id.get() + 100).expect("valid id");
    assert_eq!(
        repo.update_product(missing, &changes)
            .expect("update of missing row is not an error"),
        0
    );
}

#[test]
fn foreign_keys_are_enforced() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let orphan = new_product(CategoryId::new(42).expect("valid id"), "Orphan", 1.0, 1);

    let err = repo
        .create_product(&orphan)
        .expect_err("unknown category should be rejected");
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));

    let mut conn = test_db.pool().get().expect("should acquire connection");
    let count: i64 = products::table
        .count()
        .get_result(&mut conn)
        .expect("should count products");
    assert_eq!(count, 0);
}

#[test]
fn catalog_flow_through_services() {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let images_dir = tempfile::tempdir().expect("should create image dir");
    let images = ImageStore::new(images_dir.path());

    let shoes = categories::create_category(
        CategoryForm {
            id: None,
            name: "Shoes".into(),
            status: true,
            image: Some("iVBORw0KGgo=".into()),
        },
        &repo,
        &images,
    )
    .expect("should create category");
    assert!(shoes.image.is_some());

    let duplicate = categories::create_category(
        CategoryForm {
            id: None,
            name: "shoes".into(),
            status: true,
            image: None,
        },
        &repo,
        &images,
    );
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    for name in ["Boot", "Sneaker"] {
        product_service::create_product(
            ProductForm {
                id: None,
                name: name.into(),
                price: 10.0,
                quantity: 2,
                address: None,
                description: None,
                category_id: Some(shoes.id.get()),
                status: true,
                image: None,
            },
            &repo,
            &images,
        )
        .expect("should create product");
    }

    let cache = ProductCache::new(InMemoryCache::new());
    let cached = cache.products_by_category(Some(shoes.id.get()), &repo);
    assert_eq!(cached.data().map(Vec::len), Some(2));

    let deleted = categories::delete_category(Some(shoes.id.get()), &repo)
        .expect("should delete category");
    assert_eq!(deleted.deactivated_products, 2);

    let active = product_service::list_active_products(PageRequest::all(), &repo)
        .expect("should list products");
    assert!(active.is_empty());
    let everything = product_service::list_products(PageRequest::all(), &repo)
        .expect("should list products");
    assert_eq!(everything.len(), 2);

    // Served from the cache until the entry expires.
    let stale = cache.products_by_category(Some(shoes.id.get()), &repo);
    assert_eq!(stale, cached);
}

#[test]
fn non_ascii_names_are_unique_ignoring_case() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let images_dir = tempfile::tempdir().expect("should create image dir");
    let images = ImageStore::new(images_dir.path());
    let form = |name: &str| CategoryForm {
        id: None,
        name: name.into(),
        status: true,
        image: None,
    };

    categories::create_category(form("Áo dài"), &repo, &images).expect("should create category");

    let duplicate = categories::create_category(form("ÁO DÀI"), &repo, &images);
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    let err = repo
        .create_category(&new_category("áo dài"))
        .expect_err("unique index should reject folded duplicates");
    assert!(matches!(err, RepositoryError::UniqueViolation(_)));

    let all = repo
        .list_categories(CategoryFilter::default())
        .expect("should list categories");
    assert_eq!(all.len(), 1);
}

#[test]
fn non_ascii_search_ignores_case() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let shirts = repo
        .create_category(&new_category("Áo sơ mi"))
        .expect("should create category");
    repo.create_category(&new_category("Quần"))
        .expect("should create category");

    let found = categories::search_categories(PageRequest::all(), Some("ÁO"), true, &repo)
        .expect("should search categories");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, shirts.id);

    let mut draft = new_product(shirts.id, "Áo thun", 10.0, 1);
    draft.address = Some(ProductAddress::new("12 Đường Láng").expect("valid address"));
    let tee = repo.create_product(&draft).expect("should create product");
    repo.create_product(&new_product(shirts.id, "Khăn", 5.0, 2))
        .expect("should create product");

    let by_name = repo
        .list_products(ProductFilter::default().name_contains("ÁO THUN"))
        .expect("should search by name");
    assert_eq!(by_name.iter().map(|p| p.id).collect::<Vec<_>>(), vec![tee.id]);

    let by_address = repo
        .list_products(ProductFilter::default().address_contains("đường láng"))
        .expect("should search by address");
    assert_eq!(by_address.iter().map(|p| p.id).collect::<Vec<_>>(), vec![tee.id]);
}

#[test]
fn renaming_keeps_folded_name_in_sync() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let images_dir = tempfile::tempdir().expect("should create image dir");
    let images = ImageStore::new(images_dir.path());
    let hats = repo
        .create_category(&new_category("Mũ"))
        .expect("should create category");

    categories::update_category(
        CategoryForm {
            id: Some(hats.id.get()),
            name: "Nón lá".into(),
            status: true,
            image: None,
        },
        &repo,
        &images,
    )
    .expect("should rename category");

    let found = repo
        .find_category_by_name(&CategoryName::new("NÓN LÁ").expect("valid name"))
        .expect("should query by name");
    assert_eq!(found.map(|c| c.id), Some(hats.id));
    assert!(
        repo.find_category_by_name(&CategoryName::new("mũ").expect("valid name"))
            .expect("should query by name")
            .is_none()
    );
}
