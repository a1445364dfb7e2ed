// catalog-client/tests/client_integration.rs
// End-to-end controller flows over in-memory gateways.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use catalog_client::{
    ApiGateway, ApiRequest, ApiTransport, AssetFile, AssetStore, ClientError, ClientResult,
    FormPhase, Method, ProductForm, ProductList, StorageConfig, UploadGateway,
};

/// Records every request and replays scripted responses in order;
/// once the script runs out it answers `null`.
#[derive(Default)]
struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ClientResult<serde_json::Value>>>,
}

impl MockTransport {
    fn with_responses(responses: Vec<ClientResult<serde_json::Value>>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        })
    }

    fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<serde_json::Value> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(serde_json::Value::Null))
    }
}

/// Records put-object calls; optionally fails them all.
#[derive(Default)]
struct MockStore {
    puts: Mutex<Vec<(String, String, usize)>>,
    fail: bool,
}

#[async_trait]
impl AssetStore for MockStore {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()> {
        if self.fail {
            return Err(ClientError::Upload("connection reset".into()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }
}

fn upload_gateway(store: Arc<MockStore>) -> UploadGateway {
    UploadGateway::with_store(store, StorageConfig::new("catalog-console-assets", "us-east-1"))
}

fn list_page(ids: &[&str], total: u64) -> serde_json::Value {
    serde_json::json!({
        "products": ids.iter().map(|id| serde_json::json!({
            "_id": id,
            "title": format!("Product {id}"),
            "description": "desc",
            "price": 10.0,
            "product_image_url": "https://bucket/assets/x.png",
        })).collect::<Vec<_>>(),
        "totalRecords": total,
    })
}

#[tokio::test]
async fn create_flow_posts_exact_payload_once() {
    let store = Arc::new(MockStore::default());
    let uploads = upload_gateway(store.clone());
    let transport = MockTransport::with_responses(vec![Ok(
        serde_json::json!({"status": "success"}),
    )]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut form = ProductForm::create();
    form.set_title("Pen");
    form.set_description("Blue ink pen");
    form.set_price(10.0);
    form.upload_asset(&uploads, AssetFile::new("pen.png", "image/png", vec![1, 2, 3]))
        .await
        .unwrap();

    let asset_url = form.image_url().to_string();
    assert!(asset_url.starts_with("https://catalog-console-assets.s3.amazonaws.com/assets/"));
    assert_eq!(store.puts.lock().unwrap().len(), 1);

    form.submit(&api).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Success);

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/product");
    assert_eq!(
        requests[0].body,
        Some(serde_json::json!({
            "title": "Pen",
            "description": "Blue ink pen",
            "price": 10.0,
            "product_image_url": asset_url,
        }))
    );
}

#[tokio::test]
async fn invalid_form_never_reaches_the_backend() {
    let transport = MockTransport::with_responses(vec![]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut form = ProductForm::create();
    form.set_title("Pen");
    // description, price, and image all missing

    let result = form.submit(&api).await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(form.phase(), FormPhase::Failed);
    assert!(transport.recorded().is_empty());
}

#[tokio::test]
async fn edit_flow_loads_then_puts_full_record() {
    let transport = MockTransport::with_responses(vec![
        Ok(serde_json::json!({
            "_id": "p7",
            "title": "Pen",
            "description": "Blue ink pen",
            "price": 10.0,
            "product_image_url": "https://bucket/assets/old.png",
        })),
        Ok(serde_json::json!({"status": "success"})),
    ]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut form = ProductForm::edit("p7");
    form.load(&api).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.title(), "Pen");
    assert_eq!(form.image_url(), "https://bucket/assets/old.png");

    form.set_price(12.5);
    form.submit(&api).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Success);

    let requests = transport.recorded();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].path, "/product/p7");
    assert_eq!(requests[1].method, Method::Put);
    assert_eq!(requests[1].path, "/product/p7");
    assert_eq!(requests[1].body.as_ref().unwrap()["price"], 12.5);
}

#[tokio::test]
async fn failed_reupload_keeps_previous_asset() {
    let store = Arc::new(MockStore {
        fail: true,
        ..Default::default()
    });
    let uploads = upload_gateway(store);

    let mut form = ProductForm::edit("p7");
    form.apply_loaded(catalog_client::Product {
        id: "p7".into(),
        title: "Pen".into(),
        description: "Blue ink pen".into(),
        price: 10.0,
        image_url: "https://bucket/assets/old.png".into(),
    });

    let result = form
        .upload_asset(&uploads, AssetFile::new("new.png", "image/png", vec![9]))
        .await;
    assert!(matches!(result, Err(ClientError::Upload(_))));
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.image_url(), "https://bucket/assets/old.png");
}

#[tokio::test]
async fn disallowed_media_type_is_skipped_without_error() {
    let store = Arc::new(MockStore::default());
    let uploads = upload_gateway(store.clone());

    let mut form = ProductForm::create();
    form.upload_asset(&uploads, AssetFile::new("anim.gif", "image/gif", vec![1]))
        .await
        .unwrap();

    assert_eq!(form.image_url(), "");
    assert!(store.puts.lock().unwrap().is_empty());
    // The required field stays empty, so the submit stays blocked.
    assert!(form.validate().image.is_some());
}

#[tokio::test]
async fn list_load_and_paging_follow_the_active_mode() {
    let transport = MockTransport::with_responses(vec![
        Ok(list_page(&["a", "b"], 12)),
        Ok(list_page(&["s1"], 3)),
        Ok(list_page(&["s2"], 3)),
    ]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut list = ProductList::new();
    list.load(&api).await.unwrap();
    assert_eq!(list.items().len(), 2);
    assert_eq!(list.total_records(), 12);

    list.search(&api, "pen").await.unwrap();
    assert_eq!(list.total_records(), 3);

    list.goto_page(&api, 1).await.unwrap();

    let requests = transport.recorded();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].query, vec![("page".to_string(), "1".to_string())]);
    assert_eq!(
        requests[1].query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("keyword".to_string(), "pen".to_string()),
        ]
    );
    // Paging while a search is active keeps the keyword fetch.
    assert_eq!(
        requests[2].query,
        vec![
            ("page".to_string(), "2".to_string()),
            ("keyword".to_string(), "pen".to_string()),
        ]
    );
}

#[tokio::test]
async fn delete_refetches_current_page_even_on_failure() {
    let transport = MockTransport::with_responses(vec![
        Err(ClientError::Http {
            status: 500,
            message: "boom".into(),
        }),
        Ok(list_page(&["a"], 1)),
    ]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut list = ProductList::new();
    let result = list.delete_item(&api, "p3").await;
    assert!(result.is_err());

    let requests = transport.recorded();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(requests[0].path, "/product/p3");
    assert_eq!(requests[1].method, Method::Get);
    // The refetch still applied.
    assert_eq!(list.items().len(), 1);
}

#[tokio::test]
async fn keyword_clear_resets_to_plain_listing() {
    let transport = MockTransport::with_responses(vec![
        Ok(list_page(&["s1"], 6)),
        Ok(list_page(&["a", "b"], 12)),
    ]);
    let api = ApiGateway::with_transport(transport.clone());

    let mut list = ProductList::new();
    list.search(&api, "pen").await.unwrap();
    list.search(&api, "").await.unwrap();

    assert!(!list.search_active());
    assert_eq!(list.page(), 0);
    assert_eq!(list.total_records(), 12);

    let requests = transport.recorded();
    assert_eq!(requests[1].query, vec![("page".to_string(), "1".to_string())]);
}
