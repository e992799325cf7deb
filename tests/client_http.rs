use mockito::Matcher;

use pollBot::clients::poll_client::{PollApi, XoyondoClient};
use pollBot::error::PollError;
use pollBot::models::date::DateToken;
use pollBot::models::poll::{DateId, UserId};

fn client_for(server: &mockito::ServerGuard) -> XoyondoClient {
    XoyondoClient::new(&format!("{}/dp/p1/s3cret", server.url())).unwrap()
}

#[test]
fn well_formed_urls_are_accepted() {
    let client = XoyondoClient::new("https://xoyondo.com/dp/AbC123/xYz789").unwrap();

    assert_eq!(client.poll_id(), "AbC123");
    assert_eq!(client.url(), "https://xoyondo.com/dp/AbC123/xYz789");
}

#[test]
fn malformed_urls_are_rejected() {
    let bad = [
        "xoyondo.com/dp/a/b",
        "ftp://xoyondo.com/dp/a/b",
        "https://xoyondo.com/ap/a/b",
        "https://xoyondo.com/dp/a",
        "https://xoyondo.com/dp/a/b/c",
        "https://xoyondo.com/dp//b",
        "https://xoyondo.com/dp/a/",
        "https:///dp/a/b",
        "https://xoyondo.com",
    ];
    for url in bad {
        let err = XoyondoClient::new(url).unwrap_err();
        assert!(matches!(err, PollError::InvalidUrl), "accepted: {}", url);
        assert_eq!(err.to_string(), "Invalid URL format.");
    }
}

#[test]
fn switching_urls_fails_without_side_effects() {
    let mut client = XoyondoClient::new("https://xoyondo.com/dp/old/pass").unwrap();

    let err = client.set_url("https://xoyondo.com/nope").unwrap_err();

    assert!(matches!(err, PollError::InvalidUrl));
    assert_eq!(client.poll_id(), "old");
    assert_eq!(client.url(), "https://xoyondo.com/dp/old/pass");

    client.set_url("https://xoyondo.com/dp/new/word").unwrap();
    assert_eq!(client.poll_id(), "new");
}

#[tokio::test]
async fn snapshot_is_scraped_from_the_poll_page() {
    let mut server = mockito::Server::new_async().await;
    let page = server
        .mock("GET", "/dp/p1/s3cret")
        .with_status(200)
        .with_body(
            r#"
            <a class="js-date-edit-cal" data-date="2024/05/01" data-dateid="11"></a>
            <tr class="js-user-rows" data-userid="u9">
              <td>Alice</td><td class="table-success-cell"></td>
            </tr>
            "#,
        )
        .create_async()
        .await;
    let client = client_for(&server);

    let snapshot = client.fetch_snapshot().await.unwrap();

    page.assert_async().await;
    assert_eq!(snapshot.date_count(), 1);
    assert_eq!(snapshot.dates()[0].1 .0, "11");
    assert_eq!(snapshot.participants()[0].name, "Alice");
}

#[tokio::test]
async fn adding_a_date_replays_the_add_form() {
    let mut server = mockito::Server::new_async().await;
    let add = server
        .mock("POST", "/pc/poll-change-poll")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("newdates".into(), "2024/05/01".into()),
            Matcher::UrlEncoded("ID".into(), "p1".into()),
            Matcher::UrlEncoded("product".into(), "d".into()),
            Matcher::UrlEncoded("operation".into(), "date_add_cal".into()),
            Matcher::UrlEncoded("pass".into(), "s3cret".into()),
            Matcher::UrlEncoded("times_selected".into(), "0".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;
    let client = client_for(&server);
    let date: DateToken = "2024/05/01".parse().unwrap();

    client.add_date(&date).await.unwrap();

    add.assert_async().await;
}

#[tokio::test]
async fn deleting_a_date_replays_the_delete_form() {
    let mut server = mockito::Server::new_async().await;
    let delete = server
        .mock("POST", "/pc/poll-change-poll")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ID".into(), "p1".into()),
            Matcher::UrlEncoded("product".into(), "d".into()),
            Matcher::UrlEncoded("dateID".into(), "4711".into()),
            Matcher::UrlEncoded("operation".into(), "date_delete".into()),
            Matcher::UrlEncoded("pass".into(), "s3cret".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;
    let client = client_for(&server);

    client.delete_date(&DateId("4711".to_string())).await.unwrap();

    delete.assert_async().await;
}

#[tokio::test]
async fn removing_a_user_posts_to_the_ajax_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let purge = server
        .mock("POST", "/pc/poll-change-poll-ajax")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("u".into(), "u42".into()),
            Matcher::UrlEncoded("ID".into(), "p1".into()),
            Matcher::UrlEncoded("product".into(), "d".into()),
            Matcher::UrlEncoded("operation".into(), "delete-user".into()),
            Matcher::UrlEncoded("pass".into(), "s3cret".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;
    let client = client_for(&server);

    client.delete_user(&UserId("u42".to_string())).await.unwrap();

    purge.assert_async().await;
}

#[tokio::test]
async fn non_success_statuses_become_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/pc/poll-change-poll")
        .with_status(503)
        .create_async()
        .await;
    let client = client_for(&server);
    let date: DateToken = "2024/05/01".parse().unwrap();

    let err = client.add_date(&date).await.unwrap_err();

    assert!(matches!(err, PollError::Status { status: 503 }));
    assert_eq!(err.to_string(), "HTTP 503");
}

#[tokio::test]
async fn a_failing_snapshot_fetch_reports_the_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/dp/p1/s3cret")
        .with_status(404)
        .create_async()
        .await;
    let client = client_for(&server);

    let err = client.fetch_snapshot().await.unwrap_err();

    assert!(matches!(err, PollError::Status { status: 404 }));
}
