use axum::{
    handler::Handler,
    routing::{get, post},
    Router,
};

/// Merges every `(path, router)` component into one app bound to `state`.
pub fn main_router<STATE>(components: Vec<(String, Router<STATE>)>, state: STATE) -> Router
where
    STATE: Clone + Send + Sync + 'static,
{
    let mut app = Router::<STATE>::new();

    for (_, router) in components {
        app = app.merge(router);
    }

    app.with_state(state)
}

pub fn get_router_builder<T, S>(
    path: &str,
    handler: impl Handler<T, S> + Clone + Send + 'static,
) -> (String, Router<S>)
where
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    (path.to_string(), Router::<S>::new().route(path, get(handler)))
}

pub fn post_router_builder<T, S>(
    path: &str,
    handler: impl Handler<T, S> + Clone + Send + 'static,
) -> (String, Router<S>)
where
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    (path.to_string(), Router::<S>::new().route(path, post(handler)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::{Path, State},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn greet(State(greeting): State<String>, Path(name): Path<String>) -> String {
        format!("{greeting}, {name}!")
    }

    async fn echo(body: String) -> String {
        body
    }

    #[tokio::test]
    async fn test_components_share_state() -> Result<(), Box<dyn std::error::Error>> {
        let (path, greeter) = get_router_builder("/greet/{name}", greet);
        assert_eq!(path, "/greet/{name}");
        let echo = post_router_builder("/echo", echo);

        let app = main_router(vec![(path, greeter), echo], "Hello".to_string());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/greet/turtle").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"Hello, turtle!");

        let response = app
            .oneshot(Request::builder().method("POST").uri("/echo").body(Body::from("ping"))?)
            .await?;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"ping");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let app = main_router(vec![post_router_builder("/echo", echo)], ());
        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
