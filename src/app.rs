use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, recipes, search};

pub fn build_app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(auth::router())
        .merge(recipes::router(state.config.max_upload_bytes))
        .merge(search::router())
        .route("/health", get(|| async { "ok" }));

    if state.config.enable_demo_sqli {
        tracing::warn!("ENABLE_DEMO_SQLI=1: mounting injectable /search_vuln");
        router = router.merge(search::demo_router());
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{get, send, test_app};

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _, _) = test_app(false).await;
        let res = send(&app, get("/health", None)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.bytes, b"ok");
    }

    #[tokio::test]
    async fn demo_route_follows_flag() {
        let (off, _, _) = test_app(false).await;
        let (on, _, _) = test_app(true).await;

        let res = send(&off, get("/search_vuln?q=x", None)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        let res = send(&on, get("/search_vuln?q=x", None)).await;
        assert_eq!(res.status, StatusCode::OK);

        // the safe route is there either way
        for app in [&off, &on] {
            let res = send(app, get("/search_safe?q=x", None)).await;
            assert_eq!(res.status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let (app, _, _) = test_app(false).await;
        let res = send(&app, get("/admin", None)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }
}
