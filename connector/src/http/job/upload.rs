use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::job::Job;

const BOUNDARY_BASE: &str = "warehouse_connector_upload";

/// Builds a `jobs.insert` media upload: job metadata and payload sent as one multipart/related body.
pub fn build(
    upload_url: &str,
    client: &Client,
    metadata: &Job,
    data: &[u8],
) -> Result<RequestBuilder, serde_json::Error> {
    let url = format!(
        "{}/projects/{}/jobs?uploadType=multipart",
        upload_url, metadata.job_reference.project_id
    );
    let metadata = serde_json::to_vec(metadata)?;
    let boundary = boundary_for(&metadata, data);
    let body = multipart_related(&boundary, &metadata, data);
    Ok(client
        .post(url)
        .header(CONTENT_TYPE, format!("multipart/related; boundary={boundary}"))
        .body(body))
}

fn boundary_for(metadata: &[u8], data: &[u8]) -> String {
    let mut boundary = BOUNDARY_BASE.to_string();
    while contains(metadata, boundary.as_bytes()) || contains(data, boundary.as_bytes()) {
        boundary.push('_');
    }
    boundary
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn multipart_related(boundary: &str, metadata: &[u8], data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes());
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\nContent-Type: application/octet-stream\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::{boundary_for, multipart_related, BOUNDARY_BASE};

    #[test]
    fn test_multipart_related_layout() {
        let body = multipart_related("b", br#"{"k":1}"#, b"{\"x\":1}\n");
        let body = String::from_utf8(body).unwrap();
        assert_eq!(
            body,
            "--b\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"k\":1}\r\n--b\r\nContent-Type: application/octet-stream\r\n\r\n{\"x\":1}\n\r\n--b--\r\n"
        );
    }

    #[test]
    fn test_boundary_avoids_payload() {
        assert_eq!(boundary_for(b"{}", b"plain"), BOUNDARY_BASE);
        let data = format!("{{\"s\":\"{BOUNDARY_BASE}\"}}");
        let boundary = boundary_for(b"{}", data.as_bytes());
        assert!(!data.contains(&boundary));
    }
}
