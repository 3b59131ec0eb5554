use std::io::Cursor;

use dosdex_import::parse_launchbox;

const SAMPLE: &str = r#"<?xml version="1.0" standalone="yes"?>
<LaunchBox>
  <Game>
    <Id>2f8e54e2-ab43-4e99-8a1b-7c55d1f6a001</Id>
    <Title>SimCity 2000</Title>
    <ReleaseDate>1993-11-01T00:00:00-07:00</ReleaseDate>
    <Publisher>Maxis</Publisher>
    <Genre>Strategy; Construction and Management Simulation</Genre>
    <DatabaseID>4721</DatabaseID>
  </Game>
  <Game>
    <Id>11111111-2222-3333-4444-555555555555</Id>
    <Title>Wolfenstein 3D &amp; Spear of Destiny</Title>
    <ReleaseDate>1992</ReleaseDate>
    <Publisher>Apogee</Publisher>
    <Genre>Shooter</Genre>
    <DatabaseID>188</DatabaseID>
  </Game>
  <Game>
    <Id>no-title-entry</Id>
    <Publisher>Nobody</Publisher>
  </Game>
</LaunchBox>
"#;

#[test]
fn parses_games_from_a_launchbox_export() {
    let games = parse_launchbox(Cursor::new(SAMPLE)).unwrap();
    assert_eq!(games.len(), 2);

    let sim = &games[0];
    assert_eq!(sim.title, "SimCity 2000");
    assert_eq!(sim.external_id, 4721);
    assert_eq!(sim.guid, "2f8e54e2-ab43-4e99-8a1b-7c55d1f6a001");
    assert_eq!(sim.publisher, "Maxis");
    assert_eq!(sim.year, "1993");
    // Only the first of the ;-separated genres is kept.
    assert_eq!(sim.genre, "Strategy");

    let wolf = &games[1];
    assert_eq!(wolf.title, "Wolfenstein 3D & Spear of Destiny");
    assert_eq!(wolf.year, "1992");
    assert_eq!(wolf.external_id, 188);
}

#[test]
fn untitled_games_are_skipped() {
    let games = parse_launchbox(Cursor::new(SAMPLE)).unwrap();
    assert!(games.iter().all(|g| !g.title.is_empty()));
}

#[test]
fn missing_fields_default_cleanly() {
    let xml = r#"<LaunchBox><Game><Title>Bare Minimum</Title></Game></LaunchBox>"#;
    let games = parse_launchbox(Cursor::new(xml)).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "Bare Minimum");
    assert_eq!(games[0].external_id, 0);
    assert!(games[0].guid.is_empty());
    assert!(games[0].year.is_empty());
}

#[test]
fn bad_database_id_parses_as_zero() {
    let xml = r#"<LaunchBox><Game><Title>Odd</Title><DatabaseID>not-a-number</DatabaseID></Game></LaunchBox>"#;
    let games = parse_launchbox(Cursor::new(xml)).unwrap();
    assert_eq!(games[0].external_id, 0);
}
