// ==========================================
// ImportApi 端到端测试
// ==========================================
// 测试目标: 请求校验（MIME / 大小）→ 导入 → 响应 DTO → 商品查询
// ==========================================


use catalog_import::api::{ApiError, ImportApi, ImportRequest};
use catalog_import::config::config_keys;
use catalog_import::importer::ImportError;
use catalog_import::logging;
use test_helpers::{build_xlsx, count_products, create_test_db, insert_test_config};

fn csv_request(body: &str, filename: &str, mime: Option<&str>) -> ImportRequest {
    ImportRequest::File {
        bytes: body.as_bytes().to_vec(),
        filename: filename.to_string(),
        mime_type: mime.map(str::to_string),
    }
}

#[tokio::test]
async fn test_import_csv_via_api_returns_summary() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());

    let request = csv_request(
        "name,цена\nВанна,\"15990,00\"\n,500\n",
        "catalog.csv",
        Some("text/csv"),
    );
    let response = api.import_products(request).await.unwrap();

    assert!(response.success);
    assert_eq!(response.errors_count, 1);
    assert_eq!(response.outcome.total_rows, 2);
    assert_eq!(response.outcome.successful_imports, 1);
    assert!(!response.message.is_empty());

    // DTO 结构: camelCase，outcome 字段平铺
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["totalRows"], 2);
    assert_eq!(json["successfulImports"], 1);
    assert_eq!(json["errorsCount"], 1);
    assert_eq!(json["errors"][0]["row"], 2);
    assert_eq!(json["errors"][0]["data"]["цена"], "500");

    assert_eq!(count_products(&db_path).unwrap(), 1);
}

#[tokio::test]
async fn test_import_xlsx_via_api() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());

    let bytes = build_xlsx(&[
        &["Наименование", "Бренд", "Цена", "Остаток"],
        &["Душевой уголок 90x90", "RGW", "23990", "4"],
        &["Раковина", "Cersanit", "4100", "10"],
    ]);
    let request = ImportRequest::File {
        bytes,
        filename: "price.xlsx".to_string(),
        mime_type: Some(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        ),
    };
    let response = api.import_products(request).await.unwrap();
    assert_eq!(response.outcome.successful_imports, 2);

    let products = api.list_products(10, 0).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category.as_deref(), Some("Душевые ограждения"));
    assert_eq!(products[0].quantity, Some(4.0));

    let fetched = api.get_product(products[1].id).await.unwrap();
    assert_eq!(fetched.name, "Раковина");
    assert_eq!(fetched.brand.as_deref(), Some("Cersanit"));
}

#[tokio::test]
async fn test_mime_type_rejected_before_parsing() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());

    let request = csv_request("name\nВанна\n", "catalog.csv", Some("application/pdf"));
    let err = api.import_products(request).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(count_products(&db_path).unwrap(), 0);
}

#[tokio::test]
async fn test_file_size_limit_from_config() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    insert_test_config(&db_path, config_keys::MAX_FILE_SIZE_BYTES, "16").unwrap();
    let api = ImportApi::new(db_path.clone());

    let request = csv_request("name\nВанна акриловая 170x70\n", "catalog.csv", Some("text/csv"));
    let err = api.import_products(request).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(ref msg) if msg.contains("16")));
    assert_eq!(count_products(&db_path).unwrap(), 0);
}

#[tokio::test]
async fn test_unsupported_extension_is_batch_fatal() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());

    let request = csv_request("name\nВанна\n", "catalog.txt", None);
    let err = api.import_products(request).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Import(ImportError::UnsupportedFormat { ref supplied }) if supplied == "txt"
    ));
}

#[tokio::test]
async fn test_delete_and_count_products() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(db_path.clone());

    let request = csv_request("name\nВанна\nУнитаз\n", "catalog.csv", None);
    api.import_products(request).await.unwrap();
    assert_eq!(api.count_products().await.unwrap(), 2);

    let products = api.list_products(10, 0).await.unwrap();
    api.delete_product(products[0].id).await.unwrap();
    assert_eq!(api.count_products().await.unwrap(), 1);

    let err = api.delete_product(products[0].id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api.list_products(0, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
