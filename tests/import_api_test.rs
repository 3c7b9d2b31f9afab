// ==========================================
// ImportApi 集成测试
// ==========================================

mod test_helpers;

use product_catalog_import::api::{ApiError, ImportApi};
use product_catalog_import::config::config_keys;
use product_catalog_import::logging;
use product_catalog_import::ImportStatus;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};
use test_helpers::{create_test_db, xlsx_bytes, xlsx_header, xlsx_row, XCell, HEADER};

fn temp_file_with(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_import_path_and_get_product() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();

    let csv = temp_file_with(
        ".csv",
        format!("{}\nGame A,Fun,19.99,5,,,,,,,\n", HEADER.join(",")).as_bytes(),
    );
    let response = api.import_path(csv.path()).await.unwrap();

    assert_eq!(response.status, ImportStatus::Success);
    assert_eq!(response.imported, 1);
    assert_eq!(response.skipped, 0);

    let product = api.get_product(&response.product_ids[0]).await.unwrap();
    assert_eq!(product.name, "Game A");
    assert_eq!(api.count_products().await.unwrap(), 1);

    assert!(matches!(
        api.get_product("missing").await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_import_paths_mixed_formats() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();

    let csv = temp_file_with(
        ".csv",
        format!("{}\nGame A,,1,1,,,,,,,\n", HEADER.join(",")).as_bytes(),
    );
    let xlsx = temp_file_with(
        ".xlsx",
        &xlsx_bytes(&[
            Some(xlsx_header()),
            Some(xlsx_row(XCell::Text("Game B"), XCell::Number(2.0))),
        ])
        .unwrap(),
    );
    let txt = temp_file_with(".txt", b"name");

    let responses = api
        .import_paths(&[csv.path(), xlsx.path(), txt.path()])
        .await
        .unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].imported, 1);
    assert_eq!(responses[1].imported, 1);
    assert_eq!(responses[2].status, ImportStatus::ClientError);
    assert_eq!(responses[2].imported, 0);
}

#[tokio::test]
async fn test_set_config_applies_to_next_import() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();
    api.set_config(config_keys::CSV_DELIMITER, "\\t").unwrap();

    let tsv = temp_file_with(
        ".csv",
        format!("{}\nGame A\t\t3.5\t1\t\t\t\t\t\t\t\n", HEADER.join("\t")).as_bytes(),
    );
    let response = api.import_path(tsv.path()).await.unwrap();
    assert_eq!(response.message, "Products imported: 1");

    let product = api.get_product(&response.product_ids[0]).await.unwrap();
    assert_eq!(product.price, 3.5);

    assert!(matches!(
        api.set_config("  ", "x"),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_unreadable_path_is_invalid_input() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();

    let result = api.import_path("/nonexistent/dir/catalog.csv").await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}
