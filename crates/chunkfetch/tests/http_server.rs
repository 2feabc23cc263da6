//! Downloads through the reqwest client against a local range-serving server.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;

use chunkfetch::{DownloadCoordinator, DownloadOptions, DownloadRequest, Error, ReqwestClient};
use tempfile::tempdir;

const TEST_SIZE: usize = 300 * 1024 + 123;

fn body() -> Vec<u8> { (0..TEST_SIZE).map(|i| (i % 256) as u8).collect() }

async fn probe_file() -> impl IntoResponse {
    (StatusCode::OK, [
        (header::ACCEPT_RANGES, "bytes".to_string()),
        (header::CONTENT_LENGTH, TEST_SIZE.to_string()),
    ])
}

async fn probe_plain() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_LENGTH, TEST_SIZE.to_string())])
}

async fn serve_file(req: Request) -> impl IntoResponse {
    let body = body();
    let total = body.len() as u64;

    if let Some(range_val) = req.headers().get(header::RANGE) {
        let range_str = range_val.to_str().unwrap_or("");
        if let Some((start, end)) = range_str.strip_prefix("bytes=").and_then(|r| r.split_once('-')) {
            let start: u64 = start.parse().unwrap_or(0);
            let end: u64 = if end.is_empty() { total - 1 } else { end.parse().unwrap_or(total - 1) };
            let end = end.min(total - 1);
            let slice = &body[start as usize..=end as usize];
            return (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_RANGE, format!("bytes {start}-{end}/{total}")),
                    (header::CONTENT_LENGTH, slice.len().to_string()),
                ],
                slice.to_vec(),
            )
                .into_response();
        }
    }

    (StatusCode::OK, body).into_response()
}

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/file.bin", get(serve_file).head(probe_file))
        .route("/plain.bin", get(serve_file).head(probe_plain));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

#[tokio::test]
async fn test_download_over_http() {
    let (addr, _handle) = start_server().await;
    let dir = tempdir().unwrap();

    let request = DownloadRequest::with_chunk_size(&format!("http://{addr}/file.bin"), 64 * 1024).unwrap();
    let options = DownloadOptions::default().scratch_dir(dir.path()).concurrency(3);
    let path = chunkfetch::download(request, options).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), body());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("bin"));
}

#[tokio::test]
async fn test_download_without_ranges_is_rejected() {
    let (addr, _handle) = start_server().await;
    let dir = tempdir().unwrap();

    let request = DownloadRequest::new(&format!("http://{addr}/plain.bin")).unwrap();
    let client = ReqwestClient::new().unwrap();
    let err = DownloadCoordinator::on_disk(client, request, DownloadOptions::default().scratch_dir(dir.path()))
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RangeNotSupported));
}

#[tokio::test]
async fn test_missing_route_fails_probe() {
    let (addr, _handle) = start_server().await;
    let dir = tempdir().unwrap();

    let request = DownloadRequest::new(&format!("http://{addr}/missing.bin")).unwrap();
    let options = DownloadOptions::default().scratch_dir(dir.path());
    let err = chunkfetch::download(request, options).await.unwrap_err();

    assert!(matches!(err, Error::HeadNotSupported { status: 404 }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let dir = tempdir().unwrap();

    let request = DownloadRequest::new(&format!("http://{addr}/file.bin")).unwrap();
    let options = DownloadOptions::default().scratch_dir(dir.path());
    let err = chunkfetch::download(request, options).await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
}
