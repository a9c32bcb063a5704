//! テスト共通ヘルパー
//!
//! axumでモックサーバーを立て、写真データを作る。

#![allow(dead_code)]

use axum::Router;
use photo_roll_common::Photo;
use tokio::net::TcpListener;

/// ランダムポートでモックサーバーを起動し、ベースURLを返す
pub async fn spawn_mock(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    format!("http://{}", addr)
}

/// テスト用の写真
pub fn photo(id: &str) -> Photo {
    Photo {
        id: id.to_string(),
        author: format!("Author {}", id),
        width: 5000,
        height: 3333,
        url: format!("https://unsplash.com/photos/{}", id),
        download_url: format!("https://picsum.photos/id/{}/5000/3333", id),
    }
}

/// Picsum一覧のJSON（未知フィールド付き）
pub fn picsum_json(photos: &[Photo]) -> String {
    let items: Vec<serde_json::Value> = photos
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "author": p.author,
                "width": p.width,
                "height": p.height,
                "url": p.url,
                "download_url": p.download_url,
                "extra_field": "ignored",
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
