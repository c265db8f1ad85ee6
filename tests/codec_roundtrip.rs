use proptest::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use cinema_admin::{
    config::StorageConfig,
    dataset::Dataset,
    models::{Film, Session, Ticket, TicketStatus},
    persistence::{PersistenceService, markup, text},
};

/// Values free of the text codec's delimiter, line breaks and the `-`
/// sale-time sentinel
fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,:;'&<>=\"()А-Яа-я]{0,12}"
}

fn film() -> impl Strategy<Value = Film> {
    (field(), field(), field(), field(), field())
        .prop_map(|(title, director, year, genre, duration)| Film::new(title, director, year, genre, duration))
}

fn session() -> impl Strategy<Value = Session> {
    (field(), field(), field(), field(), field())
        .prop_map(|(film, date, time, hall, price)| Session::new(film, date, time, hall, price))
}

fn ticket() -> impl Strategy<Value = Ticket> {
    let status = prop_oneof![
        Just("Free".to_string()),
        Just("Sold".to_string()),
        Just("Reserved".to_string()),
        field(),
    ];
    (field(), field(), status, proptest::option::of(field())).prop_map(
        |(session, seat, status, sale_time)| {
            Ticket::new(session, seat, TicketStatus::from(status.as_str()), sale_time)
        },
    )
}

fn dataset() -> impl Strategy<Value = Dataset> {
    (
        proptest::collection::vec(film(), 0..6),
        proptest::collection::vec(session(), 0..6),
        proptest::collection::vec(ticket(), 0..6),
    )
        .prop_map(|(films, sessions, tickets)| {
            let mut dataset = Dataset::new();
            dataset.replace_all(films);
            dataset.replace_all(sessions);
            dataset.replace_all(tickets);
            dataset
        })
}

proptest! {
    #[test]
    fn test_text_round_trip(original in dataset()) {
        let decoded = text::decode(&text::encode(&original));
        prop_assert_eq!(decoded.skipped_lines, 0);
        prop_assert_eq!(decoded.dataset, original);
    }

    #[test]
    fn test_markup_round_trip(original in dataset()) {
        let films: Vec<Film> =
            markup::decode(&markup::encode(original.films()).unwrap(), Path::new("films.xml")).unwrap();
        let sessions: Vec<Session> =
            markup::decode(&markup::encode(original.sessions()).unwrap(), Path::new("sessions.xml")).unwrap();
        let tickets: Vec<Ticket> =
            markup::decode(&markup::encode(original.tickets()).unwrap(), Path::new("tickets.xml")).unwrap();

        prop_assert_eq!(films.as_slice(), original.films());
        prop_assert_eq!(sessions.as_slice(), original.sessions());
        prop_assert_eq!(tickets.as_slice(), original.tickets());
    }
}

#[tokio::test]
async fn test_markup_import_with_no_files() {
    let temp_dir = TempDir::new().unwrap();
    let service = PersistenceService::new(StorageConfig::in_dir(temp_dir.path()));

    let mut dataset = Dataset::new();
    let counts = service.import_markup(&mut dataset).await.into_result().unwrap();

    assert_eq!(counts.films, 0);
    assert_eq!(counts.sessions, 0);
    assert_eq!(counts.tickets, 0);
}

#[tokio::test]
async fn test_text_import_drops_short_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cinema_data.txt");
    std::fs::write(
        &path,
        "=== FILMS ===\nHeat|Michael Mann|1995|Crime|170 min|\nAlien|Ridley Scott|1979|\n",
    )
    .unwrap();
    let service = PersistenceService::new(StorageConfig::in_dir(temp_dir.path()));

    let mut dataset = Dataset::new();
    let summary = service.import_text(&path, &mut dataset).await.unwrap();

    assert_eq!(summary.counts.films, 1);
    assert_eq!(summary.skipped_lines, 1);
    assert_eq!(dataset.films()[0].title, "Heat");
}

#[tokio::test]
async fn test_legacy_russian_snapshot_loads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.txt");
    std::fs::write(
        &path,
        "=== ФИЛЬМЫ ===\nМатрица|Вачовски|1999|Фантастика|136 мин|\n\n\
         === СЕАНСЫ ===\nМатрица|17.12.2025|20:00|Зал 3|350 руб|\n\n\
         === БИЛЕТЫ ===\nМатрица 20:00|C2|Свободно|-|\n",
    )
    .unwrap();
    let service = PersistenceService::new(StorageConfig::in_dir(temp_dir.path()));

    let mut dataset = Dataset::new();
    let summary = service.import_text(&path, &mut dataset).await.unwrap();

    assert_eq!(summary.counts.total(), 3);
    assert_eq!(dataset.tickets()[0].status, TicketStatus::Other("Свободно".to_string()));
    assert_eq!(dataset.tickets()[0].sale_time, None);
}
