mod helpers;

use helpers::LogBuffer;

#[tokio::test]
async fn test_session_lifecycle_is_logged() -> anyhow::Result<()> {
    let logs = LogBuffer::default();
    let _guard = logs.capture();
    let app = helpers::setup_test_app().await?;

    let cookie = app.register("john.doe").await?;
    app.post_form(
        "/login",
        &[
            ("email", "john.doe@quickticket.localhost"),
            ("password", "my_password"),
        ],
        None,
    )
    .await?;
    app.post_form("/logout", &[], Some(&cookie)).await?;

    let output = logs.contents();
    assert!(output.contains("User registered successfully: john.doe@quickticket.localhost"));
    assert!(output.contains("User logged in successfully: john.doe@quickticket.localhost"));
    assert!(output.contains("User logged out successfully"));

    Ok(())
}

#[tokio::test]
async fn test_anonymous_ticket_attempts_are_logged() -> anyhow::Result<()> {
    let logs = LogBuffer::default();
    let _guard = logs.capture();
    let app = helpers::setup_test_app().await?;

    app.get("/tickets", None).await?;
    app.post_form(
        "/tickets/new",
        &[
            ("subject", "Printer on fire"),
            ("description", "It does not turn on anymore"),
            ("priority", "High"),
        ],
        None,
    )
    .await?;
    app.post_form("/tickets/close", &[("ticketId", "01JZZZZZZZZZZZZZZZZZZZZZZZ")], None)
        .await?;

    let output = logs.contents();
    assert!(output.contains("Unauthorized attempt to fetch tickets"));
    assert!(output.contains("Unauthorized attempt to create ticket"));
    assert!(output.contains("Unauthorized attempt to close ticket"));

    Ok(())
}

#[tokio::test]
async fn test_ticket_lookups_are_logged() -> anyhow::Result<()> {
    let logs = LogBuffer::default();
    let _guard = logs.capture();
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;
    let john = app.user_id("john.doe").await?;

    app.get("/tickets", Some(&cookie)).await?;
    app.get("/tickets/unknown", Some(&cookie)).await?;

    let output = logs.contents();
    assert!(output.contains(&format!("Tickets retrieved for user: {john}")));
    assert!(output.contains("Ticket not found: unknown"));

    Ok(())
}
