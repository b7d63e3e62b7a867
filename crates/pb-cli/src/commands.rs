use anyhow::{bail, Context};
use colored::Colorize;
use pb_server::{PostboardServer, ServerConfig};
use pb_types::{NewPost, Post, PostPatch};
use pb_view::{paginate, DetailState, ListState, PageSize, PostView};
use pb_wordcount::WordCountBinding;
use serde::Serialize;

use crate::cli::*;
use crate::client::PostsClient;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let client = PostsClient::new(cli.server.clone(), cli.api_key.clone());
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::List(args) => cmd_list(&client, args, &format).await,
        Command::Show(args) => cmd_show(&client, args, &format).await,
        Command::Create(args) => cmd_create(&client, args, &format).await,
        Command::Edit(args) => cmd_edit(&client, args, &format).await,
        Command::Delete(args) => cmd_delete(&client, args).await,
        Command::Count(args) => cmd_count(args, &format).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default().with_env_overrides(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }
    PostboardServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_list(client: &PostsClient, args: ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let page_size = PageSize::new(args.per_page)?;
    let state = ListState::new(page_size).load(client.list().await);
    if let Some(error) = state.error() {
        bail!("{error}");
    }
    let view = requested_page(&state, args.page);
    match format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => {
            render_page(&view);
            Ok(())
        }
    }
}

/// An explicitly requested page past the end is shown empty, not clamped.
fn requested_page(state: &ListState, page: usize) -> PostView {
    paginate(state.posts(), state.page_size(), page)
}

fn render_page(view: &PostView) {
    if view.is_empty() {
        println!("No posts.");
    }
    for post in &view.items {
        let source = if post.is_local() {
            "local ".green()
        } else {
            "remote".dimmed()
        };
        println!("{:>12}  {}  {}", post.id.to_string().yellow(), source, post.title);
    }
    let pages: Vec<String> = (1..=view.total_pages)
        .map(|n| {
            if n == view.page {
                format!("[{n}]").bold().to_string()
            } else {
                n.to_string()
            }
        })
        .collect();
    println!("\nPage {} ({} posts)", pages.join(" "), view.total_items);
}

fn render_post(state: &DetailState) {
    let Some(post) = state.post() else {
        println!("Post not found.");
        return;
    };
    println!("{}", post.title.bold());
    println!("{}", "-".repeat(post.title.chars().count().max(3)).dimmed());
    println!("{}", post.body);
    println!();
    println!("  Id: {}  Source: {}", post.id.to_string().yellow(), post.source);
    if let Some(created_at) = post.created_at {
        println!("  Created: {}", created_at.to_rfc3339());
    }
    println!("  {} {}", "Word Count:".bold(), state.word_count());
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostWithCount<'a> {
    #[serde(flatten)]
    post: &'a Post,
    word_count: u64,
}

fn output_detail(state: &DetailState, format: &OutputFormat) -> anyhow::Result<()> {
    match (format, state.post()) {
        (OutputFormat::Json, Some(post)) => print_json(&PostWithCount {
            post,
            word_count: state.word_count(),
        }),
        _ => {
            render_post(state);
            Ok(())
        }
    }
}

async fn cmd_show(client: &PostsClient, args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let result = client.get(&args.id).await;
    if matches!(&result, Err(err) if err.status() == Some(404)) {
        println!("Post not found.");
        return Ok(());
    }
    let state = DetailState::new().loaded(result);
    if let Some(error) = state.error() {
        bail!("{error}");
    }
    let counter = WordCountBinding::builtin().activate().await;
    let count = counter.count(state.edit_body());
    output_detail(&state.set_word_count(count), format)
}

async fn cmd_create(client: &PostsClient, args: CreateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let new_post = NewPost::new(args.title.trim(), args.body.trim())
        .context("please fill in both title and body")?;
    let created = client.create(&new_post).await.context("error creating post")?;
    match format {
        OutputFormat::Json => print_json(&created),
        OutputFormat::Text => {
            println!("{} Created post {}", "✓".green().bold(), created.id.to_string().yellow());
            Ok(())
        }
    }
}

async fn cmd_edit(client: &PostsClient, args: EditArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let patch = PostPatch::non_empty(args.title, args.body)
        .context("nothing to change: pass --title and/or --body")?;

    let state = DetailState::new().loaded(client.get(&args.id).await);
    if let Some(error) = state.error() {
        bail!("{error}");
    }
    let mut state = state.begin_edit();
    if let Some(title) = &patch.title {
        state = state.set_title(title.clone());
    }
    if let Some(body) = &patch.body {
        state = state.set_body(body.clone());
    }

    let counter = WordCountBinding::builtin().activate().await;
    let state = state.saved(client.update(&args.id, &patch).await);
    if let Some(error) = state.error() {
        bail!("failed to update post: {error}");
    }
    let count = counter.count(state.edit_body());
    output_detail(&state.set_word_count(count), format)
}

async fn cmd_delete(client: &PostsClient, args: DeleteArgs) -> anyhow::Result<()> {
    client.delete(&args.id).await.context("error deleting post")?;
    println!("{} Deleted post {}", "✓".green().bold(), args.id.yellow());
    Ok(())
}

async fn cmd_count(args: CountArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let text = args.text.join(" ");
    let count = WordCountBinding::builtin().count(&text).await;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "wordCount": count })),
        OutputFormat::Text => {
            println!("{count}");
            Ok(())
        }
    }
}
