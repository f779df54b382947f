//! Request body decoding shared by the form endpoints.
//!
//! Browser forms post JSON, `application/x-www-form-urlencoded` or
//! `multipart/form-data` bodies. All three decode into one JSON object so the
//! domain sees a single shape; form values arrive as strings. Multipart
//! bodies carry text fields only.

use std::collections::HashMap;

use actix_multipart::{Multipart, MultipartError};
use actix_web::error::PayloadError;
use actix_web::http::header::ContentDisposition;
use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::{TryStreamExt, future, stream};
use serde_json::{Map, Value, json};

use crate::domain::Error;

const FORM: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

/// Decode a JSON, urlencoded or multipart body into an object.
///
/// An empty body decodes to an empty object so field validation reports the
/// first missing field. Any other content type is rejected, as is a
/// multipart part carrying a file.
pub async fn decode_object(req: &HttpRequest, body: web::Bytes) -> Result<Map<String, Value>, Error> {
    if body.is_empty() {
        return Ok(Map::new());
    }
    match req.content_type() {
        FORM => decode_form(&body),
        JSON | "" => decode_json(&body),
        MULTIPART => decode_multipart(req, body).await,
        other => Err(Error::invalid_request(format!("unsupported content type: {other}"))
            .with_details(json!({ "contentType": other }))),
    }
}

fn decode_json(body: &[u8]) -> Result<Map<String, Value>, Error> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::invalid_request("request body must be a JSON object")),
        Err(err) => Err(Error::invalid_request(format!("malformed JSON body: {err}"))),
    }
}

fn decode_form(body: &[u8]) -> Result<Map<String, Value>, Error> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::invalid_request("form body must be UTF-8"))?;
    let fields = web::Query::<HashMap<String, String>>::from_query(text)
        .map_err(|err| Error::invalid_request(format!("malformed form body: {err}")))?
        .into_inner();
    Ok(fields
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect())
}

async fn decode_multipart(req: &HttpRequest, body: web::Bytes) -> Result<Map<String, Value>, Error> {
    let payload = stream::once(future::ready(Ok::<_, PayloadError>(body)));
    let mut parts = Multipart::new(req.headers(), payload);
    let mut fields = Map::new();
    while let Some(mut part) = parts.try_next().await.map_err(malformed_multipart)? {
        let name = part
            .name()
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_request("multipart part has no field name"))?;
        if part
            .content_disposition()
            .and_then(ContentDisposition::get_filename)
            .is_some()
        {
            return Err(Error::invalid_request("file uploads are not accepted")
                .with_details(json!({ "field": name })));
        }
        let mut value = Vec::new();
        while let Some(chunk) = part.try_next().await.map_err(malformed_multipart)? {
            value.extend_from_slice(&chunk);
        }
        let value = String::from_utf8(value).map_err(|_| {
            Error::invalid_request("multipart field must be UTF-8")
                .with_details(json!({ "field": name }))
        })?;
        fields.insert(name, Value::String(value));
    }
    Ok(fields)
}

fn malformed_multipart(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

/// Multipart body with one text part per field, for handler tests.
#[cfg(test)]
pub(crate) fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}
