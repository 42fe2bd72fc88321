use std::sync::Arc;
use trackfilter::*;

struct Song {
    artist: &'static str,
    title: &'static str,
    genre: &'static str,
    length_nanosec: i64,
    rating: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    // 1. Describe the record shape
    let registry = FieldRegistryBuilder::new()
        .field("artist", FieldKind::Text, |s: &Song| FieldValue::from(s.artist))
        .field("title", FieldKind::Text, |s: &Song| FieldValue::from(s.title))
        .field("genre", FieldKind::Text, |s: &Song| FieldValue::from(s.genre))
        .scoped_field("length", FieldKind::Duration, |s: &Song| FieldValue::Integer(s.length_nanosec))
        .scoped_field("rating", FieldKind::Rating, |s: &Song| FieldValue::Float(s.rating))
        .build()?;
    let cache = FilterCache::new(Arc::new(registry));

    let songs = [
        Song { artist: "Queen", title: "Bohemian Rhapsody", genre: "Rock", length_nanosec: 355_000_000_000, rating: 0.8 },
        Song { artist: "Metallica", title: "One", genre: "Metal", length_nanosec: 447_000_000_000, rating: 0.4 },
        Song { artist: "Miles Davis", title: "So What", genre: "Jazz", length_nanosec: 562_000_000_000, rating: 1.0 },
    ];

    // 2. Filter the same rows with a few queries; each query is parsed once
    for filter_str in [
        "artist:queen -rating:<3 (genre:rock OR genre:metal)",
        "length:>7:00",
        "\"so what\" OR metallica",
    ] {
        let filter = cache.get(filter_str);
        println!("{filter_str}: {:#?}", filter.expr());
        for song in songs.iter().filter(|s| filter.matches(s)) {
            println!("  {} - {}", song.artist, song.title);
        }
    }
    Ok(())
}
