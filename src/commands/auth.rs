use anyhow::Result;

pub async fn run() -> Result<()> {
    println!("Authenticating with Google...");

    // Opens the browser, waits for the redirect and stores the session
    let account = calnotify_google::authenticate().await?;

    println!("Authenticated as: {}\n", account);
    println!("Run `calnotify run --dry-run` to preview reminder changes.");

    Ok(())
}
