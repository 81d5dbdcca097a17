//! Shared response checks for GitHub API calls.

use crate::error::GithubError;

/// Return the response unchanged on success, otherwise map the status:
///
/// - **404** → [`GithubError::NotFound`]
/// - **401 / 403** → [`GithubError::Unauthorized`], except a 403 carrying
///   `x-ratelimit-remaining: 0`, which is a primary rate limit
/// - **422** → [`GithubError::Validation`]
/// - **429** → [`GithubError::RateLimited`] (`Retry-After`, default 60 s)
/// - anything else → [`GithubError::Api`]
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GithubError> {
    let status = resp.status().as_u16();
    if resp.status().is_success() {
        return Ok(resp);
    }
    if status == 429 || (status == 403 && is_rate_limit_exhausted(&resp)) {
        return Err(GithubError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }

    let url = resp.url().to_string();
    let message = error_message(resp.text().await.unwrap_or_default());
    Err(match status {
        404 => GithubError::NotFound(url),
        401 | 403 => GithubError::Unauthorized { status, message },
        422 => GithubError::Validation(message),
        _ => GithubError::Api { status, message },
    })
}

fn is_rate_limit_exhausted(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// GitHub error bodies are `{"message": "..."}`; fall back to the raw text.
fn error_message(body: String) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }
    serde_json::from_str::<ErrorBody>(&body).map_or(body, |b| b.message)
}
