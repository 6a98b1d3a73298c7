use crate::{resolver::Invocation, Error, Resolver, Result};
use futures::future;
use hyper::{
    body,
    header::{HeaderValue, CONTENT_TYPE},
    server::conn::AddrStream,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server as HyperServer, StatusCode,
};
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Serves the resolver's operations over HTTP: `POST /invoke` with an
/// [`Invocation`] as the json body.
#[derive(Clone)]
pub struct Server {
    counter: Arc<AtomicUsize>,
    resolver: Arc<Resolver>,
}

impl Server {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            resolver: Arc::new(resolver),
        }
    }

    pub async fn start(self, addr: SocketAddr) -> Result<()> {
        // The closure inside `make_service_fn` is run for each connection,
        // creating a 'service' to handle requests for that specific connection.
        let make_service = make_service_fn(move |socket: &AddrStream| {
            info!("remote address: {:?}", socket.remote_addr());

            // Cloned once per connection and once more per request
            let server = self.clone();

            future::ok::<_, Error>(service_fn(move |request| {
                let server = server.clone();
                server.serve(request)
            }))
        });

        info!("Listening on http://{}", addr);
        HyperServer::bind(&addr).serve(make_service).await?;

        Ok(())
    }

    async fn serve(self, request: Request<Body>) -> Result<Response<Body>> {
        self.counter.fetch_add(1, Ordering::AcqRel);
        self.route_http_request(request).await
    }

    async fn route_http_request(&self, request: Request<Body>) -> Result<Response<Body>> {
        match (request.method(), request.uri().path()) {
            (&Method::GET, "/") => {
                let count = self.counter.load(Ordering::Relaxed);
                let response = Response::new(Body::from(format!("Request #{}\n", count)));
                Ok(response)
            }
            (&Method::GET, "/invoke") => Ok(Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::empty())?),
            (&Method::POST, "/invoke") => self.route_invoke(request).await,
            _ => Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())?),
        }
    }

    async fn route_invoke(&self, request: Request<Body>) -> Result<Response<Body>> {
        let invocation = match invocation_from_request(request).await {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!("parsing invocation: {}", e);
                return json_response(StatusCode::BAD_REQUEST, &json!({ "error": e.to_string() }));
            }
        };

        match self.resolver.invoke(invocation).await {
            Ok(value) => json_response(StatusCode::OK, &value),
            Err(e) => {
                error!("invocation failed: {}", e);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "error": e.to_string() }),
                )
            }
        }
    }
}

async fn invocation_from_request(request: Request<Body>) -> Result<Invocation> {
    match request.headers().get(CONTENT_TYPE).map(HeaderValue::to_str) {
        Some(Ok(content_type)) if content_type.starts_with("application/json") => {}
        _ => return Err("unknown content type".into()),
    }

    let body = body::to_bytes(request.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}

fn json_response(status: StatusCode, value: &serde_json::Value) -> Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(value)?))?)
}
