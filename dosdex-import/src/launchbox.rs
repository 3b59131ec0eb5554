//! LaunchBox XML export parsing.
//!
//! A LaunchBox platform export is a flat XML document of `<Game>` elements.
//! Only the fields the catalog consumes are read: `Title`, `DatabaseID`,
//! `Id` (GUID), `Publisher`, `ReleaseDate` (year prefix), and the first of
//! the `;`-separated `Genre` names. Games without a title are skipped.

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::reconcile::ExternalGame;

/// Errors from reading a LaunchBox export.
#[derive(Debug, thiserror::Error)]
pub enum LaunchBoxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),
}

/// Parse a LaunchBox export from a file path.
pub fn parse_launchbox_file(path: impl AsRef<Path>) -> Result<Vec<ExternalGame>, LaunchBoxError> {
    let file = std::fs::File::open(path)?;
    parse_launchbox(std::io::BufReader::new(file))
}

/// Parse a LaunchBox export into normalized external records.
pub fn parse_launchbox<R: BufRead>(reader: R) -> Result<Vec<ExternalGame>, LaunchBoxError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut games = Vec::new();
    let mut current: Option<ExternalGame> = None;
    let mut current_tag = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag_name == "Game" {
                    current = Some(ExternalGame::default());
                    current_tag.clear();
                } else {
                    current_tag = tag_name;
                }
            }
            Event::Text(ref e) => {
                if let Some(ref mut game) = current {
                    let text = e.unescape()?.trim().to_string();
                    match current_tag.as_str() {
                        "Title" => game.title = text,
                        "DatabaseID" => game.external_id = text.parse().unwrap_or(0),
                        "Id" => game.guid = text,
                        "Publisher" => game.publisher = text,
                        // Format varies: YYYY, YYYY-MM-DD, full timestamps.
                        "ReleaseDate" => game.year = text.chars().take(4).collect(),
                        "Genre" => {
                            game.genre = text
                                .split(';')
                                .next()
                                .unwrap_or("")
                                .trim()
                                .to_string();
                        }
                        _ => {}
                    }
                }
            }
            Event::End(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag_name == "Game" {
                    if let Some(game) = current.take() {
                        if game.title.is_empty() {
                            log::debug!("skipping untitled game entry");
                        } else {
                            games.push(game);
                        }
                    }
                } else {
                    current_tag.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(games)
}
