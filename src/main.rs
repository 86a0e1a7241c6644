mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use inkarr::config::{default_config_path, Preferences};
use inkarr::http_client::ReqwestClient;
use inkarr::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("inkarr=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(p) => p,
        None => default_config_path()?,
    };
    let mut prefs = Preferences::load(&config_path)?;

    let client = Arc::new(ReqwestClient::new()?);
    let config = prefs.clone().with_env_overrides()?.snapshot();
    let source = Inkarr::new(config, client.clone());

    match cli.command {
        Commands::Config { action } => run_config(action, &mut prefs, &config_path)?,
        Commands::Popular => print_mangas(&source.list_series(1).await?, cli.json)?,
        Commands::Latest => print_mangas(&source.latest_series(1).await?, cli.json)?,
        Commands::Search { query } => {
            print_mangas(&source.search_series(1, &query).await?, cli.json)?
        }
        Commands::Details { id } => {
            let manga = source.series_detail(&series_stub(id)).await?;
            if cli.json {
                return print_json(&manga);
            }
            println!("{}", manga.title);
            println!("Status: {:?}", manga.status);
            if let Some(a) = &manga.author {
                println!("Author: {a}");
            }
            if let Some(a) = &manga.artist {
                println!("Artist: {a}");
            }
            if let Some(g) = &manga.genre {
                println!("Genres: {g}");
            }
            if let Some(t) = &manga.thumbnail_url {
                println!("Cover: {t}");
            }
            if let Some(d) = &manga.description {
                println!("\n{d}");
            }
        }
        Commands::Chapters { id } => {
            let chapters = source.chapter_list(&series_stub(id)).await?;
            if cli.json {
                return print_json(&chapters);
            }
            for c in chapters {
                println!("{} ({})", c.name, c.url);
            }
        }
        Commands::Pages { chapter_url } => {
            let chapter = Chapter {
                url: chapter_url,
                ..Default::default()
            };
            let pages = source.page_list(&chapter).await?;
            if cli.json {
                return print_json(&pages);
            }
            for p in pages {
                println!("{:>5} {}", p.index, p.image_url.unwrap_or_default());
            }
        }
        Commands::Image { url, output } => {
            let page = Page {
                image_url: Some(url),
                ..Default::default()
            };
            let request = source.image_request(&page)?;
            let resp = client.execute(request).await?;
            tokio::fs::write(&output, &resp.body).await?;
            println!("Wrote {} bytes to {}", resp.body.len(), output.display());
        }
    }
    Ok(())
}

fn run_config(action: ConfigAction, prefs: &mut Preferences, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Config file: {}", path.display());
            println!("Server address: {}", prefs.address_summary());
            println!("API key: {}", prefs.api_key_summary());
        }
        ConfigAction::SetAddress { url } => {
            let notice = prefs.set_server_address(&url)?;
            prefs.save(path)?;
            if let Some(n) = notice {
                println!("{n}");
            }
        }
        ConfigAction::SetApiKey { key } => {
            let notice = prefs.set_api_key(&key);
            prefs.save(path)?;
            println!("{notice}");
        }
    }
    Ok(())
}

fn series_stub(id: i64) -> Manga {
    Manga {
        url: inkarr::mapping::series_url(id),
        ..Default::default()
    }
}

fn print_mangas(page: &MangasPage, json: bool) -> Result<()> {
    if json {
        return print_json(page);
    }
    for m in &page.mangas {
        println!("Manga: {} ({})", m.title, m.url);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
