/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use cdse_common::net::{post_json, post_form, post_json_to_file, NetError};

#[derive(Deserialize,Debug)]
struct Answer { value: u32 }

#[tokio::test]
async fn test_post_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/query")
        .match_header("authorization", "Bearer secret")
        .match_body(mockito::Matcher::Json(json!({"question": 6})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value": 42}"#)
        .expect(1)
        .create_async().await;

    let client = Client::new();
    let url = format!("{}/query", server.url());
    let answer: Answer = post_json( &client, &url, Some("secret"), &json!({"question": 6})).await.unwrap();

    mock.assert_async().await;
    assert_eq!( answer.value, 42);
}

#[tokio::test]
async fn test_status_mapping() {
    let mut server = mockito::Server::new_async().await;
    let _limited = server.mock("POST", "/limited")
        .with_status(429)
        .with_header("retry-after", "30")
        .create_async().await;
    let _broken = server.mock("POST", "/broken")
        .with_status(503)
        .with_body("maintenance")
        .create_async().await;
    let _denied = server.mock("POST", "/denied")
        .with_status(401)
        .create_async().await;
    let _garbage = server.mock("POST", "/garbage")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async().await;

    let client = Client::new();
    let data = json!({});

    match post_json::<_,Answer>( &client, &format!("{}/limited", server.url()), None, &data).await {
        Err(NetError::RateLimited(Some(30))) => {}
        other => panic!("expected RateLimited, got {other:?}")
    }

    let res = post_json::<_,Answer>( &client, &format!("{}/broken", server.url()), None, &data).await;
    match &res {
        Err(e @ NetError::ServerError(503,msg)) => {
            assert_eq!( msg, "maintenance");
            assert!( e.is_transient());
        }
        other => panic!("expected ServerError, got {other:?}")
    }

    match post_json::<_,Answer>( &client, &format!("{}/denied", server.url()), None, &data).await {
        Err(e @ NetError::Unauthorized(401)) => assert!( !e.is_transient()),
        other => panic!("expected Unauthorized, got {other:?}")
    }

    match post_json::<_,Answer>( &client, &format!("{}/garbage", server.url()), None, &data).await {
        Err(e @ NetError::ParseError(_)) => assert!( !e.is_transient()),
        other => panic!("expected ParseError, got {other:?}")
    }
}

#[tokio::test]
async fn test_post_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            mockito::Matcher::UrlEncoded("client_id".into(), "me".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"value": 1}"#)
        .create_async().await;

    let client = Client::new();
    let params = [("grant_type","client_credentials"), ("client_id","me")];
    let answer: Answer = post_form( &client, &format!("{}/token", server.url()), &params).await.unwrap();

    mock.assert_async().await;
    assert_eq!( answer.value, 1);
}

#[tokio::test]
async fn test_post_json_to_file() {
    let mut server = mockito::Server::new_async().await;
    let body: Vec<u8> = (0u8..=255).collect();
    let _mock = server.mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(body.clone())
        .create_async().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("img.png");

    let client = Client::new();
    let len = post_json_to_file( &client, &format!("{}/process", server.url()), Some("tok"), &json!({}), &path).await.unwrap();

    assert_eq!( len, 256);
    assert_eq!( std::fs::read(&path).unwrap(), body);
}
