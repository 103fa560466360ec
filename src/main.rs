use duel_client::assets::cache::AssetCache;
use duel_client::assets::fetcher::{HttpFetcher, ImageFetcher};
use duel_client::deck::builder::DeckBuilder;
use duel_client::deck::catalog::CardCatalog;
use duel_client::game::command::Command;
use duel_client::game::session::Session;
use duel_client::logger;
use duel_client::models::deck::DeckList;
use duel_client::models::settings::Settings;
use duel_client::render::svg::SvgBackend;
use duel_client::tcp::connection::Connection;
use duel_client::utils::errors::{ClientError, SessionError};
use duel_client::utils::logger::Logger;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let settings = Settings::load("duel_client")?;
    Logger::set_level(settings.log_level);

    let assets = Arc::new(AssetCache::new(HttpFetcher::new(&settings.server.http_base)));
    assets.preload_common(&settings.assets).await;

    let catalog = match &settings.catalog {
        Some(path) => CardCatalog::from_file(path).await?,
        None => CardCatalog::default(),
    };
    let mut builder = DeckBuilder::new(&catalog, settings.render.width);

    let (connection, mut inbound) = Connection::connect(&settings.server.address).await?;
    let output = settings.render.output.clone();
    let http_base = settings.server.http_base.clone();

    let mut session = Session::new(settings, connection, assets);
    session.join().await?;
    draw(&session, &output).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            message = inbound.recv() => {
                let Some(message) = message else {
                    logger!(WARN, "[CONNECTION] Server connection closed");
                    break;
                };
                if session.handle_message(message) {
                    draw(&session, &output).await;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => command,
                    Err(error) => {
                        logger!(WARN, "[SESSION] {error}");
                        continue;
                    }
                };

                let redraw = match command {
                    Command::Play(card_id) => {
                        report(session.play_card(&card_id).await);
                        false
                    }
                    Command::EndTurn => {
                        report(session.end_turn().await);
                        false
                    }
                    Command::Resize(viewport) => {
                        session.resize(viewport);
                        builder.resize(viewport.width);
                        true
                    }
                    other => {
                        run_deck_command(&mut builder, &catalog, &http_base, other).await;
                        false
                    }
                };

                if redraw {
                    draw(&session, &output).await;
                }
            }
        }
    }

    session.disconnect().await;
    Ok(())
}

/// Renders the current frame and writes it to the configured SVG file.
async fn draw<F: ImageFetcher + 'static>(session: &Session<F>, output: &Path) {
    let mut svg = SvgBackend::new();
    session.render(&mut svg).await;
    svg.save(output).await;
}

fn report(result: Result<(), SessionError>) {
    match result {
        Ok(()) => {}
        Err(SessionError::NotYourTurn) => logger!(WARN, "[SESSION] It's not your turn"),
        Err(error) => logger!(ERROR, "[SESSION] {error}"),
    }
}

async fn run_deck_command(
    builder: &mut DeckBuilder<'_>,
    catalog: &CardCatalog,
    http_base: &str,
    command: Command,
) {
    match command {
        Command::Search(term) => {
            builder.set_query(&term);
            print_page(builder, catalog);
        }
        Command::NextPage => {
            builder.next_page();
            print_page(builder, catalog);
        }
        Command::PrevPage => {
            builder.prev_page();
            print_page(builder, catalog);
        }
        Command::Add(section, name) => match builder.add_card(&name, section) {
            Ok(added) => logger!(INFO, "[DECK] Added `{name}` to {added}"),
            Err(error) => logger!(WARN, "[DECK] {error}"),
        },
        Command::Remove(section, index) => match builder.remove(section, index) {
            Some(name) => logger!(INFO, "[DECK] Removed `{name}` from {section}"),
            None => logger!(WARN, "[DECK] No card at {section} #{index}"),
        },
        Command::ShowDeck => print_deck(builder),
        Command::LoadDeck(name) => match DeckList::load(http_base, &name).await {
            Ok(deck) => builder.load(deck),
            Err(error) => logger!(WARN, "[DECK] {error}"),
        },
        Command::SaveDeck(name) => {
            if let Err(error) = builder.to_request(&name).submit(http_base).await {
                logger!(WARN, "[DECK] {error}");
            }
        }
        Command::Play(_) | Command::EndTurn | Command::Resize(_) | Command::Quit => {}
    }
}

fn print_page(builder: &DeckBuilder<'_>, catalog: &CardCatalog) {
    println!("Page {} of {}", builder.page(), builder.page_count().max(1));
    for card in builder.page_cards() {
        println!("  {} [{}] {}", card.name, card.card_type, catalog.image_for(&card.name));
    }
}

fn print_deck(builder: &DeckBuilder<'_>) {
    let groups = builder.categorized_main();
    for (category, cards) in [
        ("Monster", &groups.monsters),
        ("Spell", &groups.spells),
        ("Trap", &groups.traps),
    ] {
        if cards.is_empty() {
            continue;
        }
        println!("{category} ({})", cards.len());
        for card in cards.iter() {
            println!("  {}", card.name);
        }
    }

    let deck = builder.deck();
    for (label, cards) in [("Extra", &deck.extra), ("Side", &deck.side)] {
        println!("{label} ({})", cards.len());
        for (index, name) in cards.iter().enumerate() {
            println!("  {index}: {name}");
        }
    }
}
