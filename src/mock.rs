use crate::Transport;
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Body, Method, Request, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request seen by [`MockTransport`], with its form body decoded and sorted.
#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) form: Vec<(String, String)>,
}

enum Reply {
    Respond(http::Response<String>),
    Fail,
    Hang,
}

/// Replays queued replies in order and records every request.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    replies: VecDeque<Reply>,
    requests: Vec<Recorded>,
}

impl MockTransport {
    pub(crate) fn new() -> MockTransport {
        MockTransport::default()
    }

    pub(crate) fn respond(self, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        let mut response = http::Response::builder().status(status);
        for (name, value) in headers {
            response = response.header(*name, *value);
        }
        self.push(Reply::Respond(response.body(body.to_owned()).unwrap()))
    }

    /// Fails the next request with a transport error.
    pub(crate) fn fail(self) -> Self {
        self.push(Reply::Fail)
    }

    /// Never answers the next request.
    pub(crate) fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    fn push(self, reply: Reply) -> Self {
        self.inner.lock().unwrap().replies.push_back(reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        let mut form: Vec<(String, String)> = request
            .body()
            .and_then(Body::as_bytes)
            .map(|bytes| serde_urlencoded::from_bytes(bytes).unwrap())
            .unwrap_or_default();
        form.sort();

        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(Recorded {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            form,
        });
        let reply = inner
            .replies
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", request.url()));
        match reply {
            Reply::Respond(response) => Box::pin(async move { Ok(Response::from(response)) }),
            Reply::Fail => {
                // `build` fails on an unparseable URL
                let err = reqwest::Client::new()
                    .post("not a url")
                    .build()
                    .unwrap_err();
                Box::pin(async move { Err(err) })
            }
            Reply::Hang => Box::pin(futures::future::pending()),
        }
    }
}
