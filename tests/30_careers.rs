mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn company_slug(server: &TestServer, token: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .get(format!("{}/api/company/me", server.base_url))
        .header(reqwest::header::COOKIE, format!("token={}", token))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "me failed with {}", res.status());
    let me: Value = res.json().await?;
    Ok(me["slug"].as_str().unwrap_or_default().to_string())
}

async fn set_published(server: &TestServer, token: &str, published: bool) -> Result<()> {
    let res = reqwest::Client::new()
        .put(format!("{}/api/company/publish", server.base_url))
        .header(reqwest::header::COOKIE, format!("token={}", token))
        .json(&json!({ "published": published }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "publish failed with {}", res.status());
    Ok(())
}

#[tokio::test]
async fn unknown_slug_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        eprintln!("skipping: database not reachable (set DATABASE_URL to run)");
        return Ok(());
    }

    let res = reqwest::Client::new()
        .get(format!("{}/no-such-company-here/careers", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn page_is_public_only_after_publishing() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        eprintln!("skipping: database not reachable (set DATABASE_URL to run)");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let token = common::signup(
        server,
        &common::unique("Page Co"),
        &format!("{}@example.test", common::unique("page")),
    )
    .await?;
    let slug = company_slug(server, &token).await?;
    let page_url = format!("{}/{}/careers", server.base_url, slug);

    // Unpublished reads exactly like nonexistent
    let res = client.get(&page_url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    set_published(server, &token, true).await?;
    let res = client.get(&page_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let page: Value = res.json().await?;
    assert_eq!(page["company"]["slug"], slug.as_str());
    assert!(page["sections"].is_array());
    assert!(page["jobs"].is_array());

    // Unpublishing takes the page back down
    set_published(server, &token, false).await?;
    let res = client.get(&page_url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn public_page_shows_only_visible_sections() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        eprintln!("skipping: database not reachable (set DATABASE_URL to run)");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let token = common::signup(
        server,
        &common::unique("Visible Co"),
        &format!("{}@example.test", common::unique("visible")),
    )
    .await?;

    for (name, visible) in [("Shown", true), ("Hidden", false)] {
        let res = client
            .post(format!("{}/api/sections", server.base_url))
            .header(reqwest::header::COOKIE, format!("token={}", token))
            .json(&json!({ "type": name, "content": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed");
        let section: Value = res.json().await?;

        if !visible {
            let res = client
                .put(format!(
                    "{}/api/sections/{}",
                    server.base_url,
                    section["id"].as_str().unwrap()
                ))
                .header(reqwest::header::COOKIE, format!("token={}", token))
                .json(&json!({ "visible": false }))
                .send()
                .await?;
            anyhow::ensure!(res.status() == StatusCode::OK, "hide failed");
        }
    }

    set_published(server, &token, true).await?;
    let slug = company_slug(server, &token).await?;

    let page: Value = client
        .get(format!("{}/{}/careers", server.base_url, slug))
        .send()
        .await?
        .json()
        .await?;

    let shown: Vec<&str> = page["sections"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["type"].as_str())
        .collect();
    assert_eq!(shown, vec!["Shown"]);

    Ok(())
}
