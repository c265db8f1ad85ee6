//! Built-in sample dataset for demos and tests

use crate::dataset::Dataset;
use crate::models::{Film, Session, Ticket, TicketStatus};

/// Five films, four sessions and five tickets with a mix of statuses
pub fn sample_dataset() -> Dataset {
    let mut dataset = Dataset::new();

    for (title, director, year, genre, duration) in [
        ("Interstellar", "Christopher Nolan", "2014", "Science fiction", "169 min"),
        ("The Godfather", "Francis Ford Coppola", "1972", "Crime", "175 min"),
        ("The Shawshank Redemption", "Frank Darabont", "1994", "Drama", "142 min"),
        ("The Matrix", "The Wachowskis", "1999", "Science fiction", "136 min"),
        ("Forrest Gump", "Robert Zemeckis", "1994", "Drama", "142 min"),
    ] {
        dataset.append(Film::new(title, director, year, genre, duration));
    }

    for (film, date, time, hall, price) in [
        ("Interstellar", "15.12.2025", "18:00", "Hall 1", "350 RUB"),
        ("Interstellar", "15.12.2025", "21:00", "Hall 1", "400 RUB"),
        ("The Godfather", "16.12.2025", "19:30", "Hall 2", "300 RUB"),
        ("The Matrix", "17.12.2025", "20:00", "Hall 3", "350 RUB"),
    ] {
        dataset.append(Session::new(film, date, time, hall, price));
    }

    for (session, seat, status, sale_time) in [
        ("Interstellar 18:00", "A1", TicketStatus::Sold, Some("14:30")),
        ("Interstellar 18:00", "A2", TicketStatus::Sold, Some("14:35")),
        ("Interstellar 18:00", "A3", TicketStatus::Free, None),
        ("The Godfather 19:30", "B5", TicketStatus::Reserved, Some("15:20")),
        ("The Matrix 20:00", "C2", TicketStatus::Free, None),
    ] {
        dataset.append(Ticket::new(session, seat, status, sale_time.map(str::to_string)));
    }

    dataset
}
