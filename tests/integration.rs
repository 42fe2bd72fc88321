// Integration tests for trackfilter: end-to-end parsing and matching over two record shapes

use proptest::prelude::*;
use std::sync::Arc;
use trackfilter::*;

// A library song, searched by a reduced default column set.
#[derive(Debug, Clone, Default)]
struct Song {
    artist: String,
    album: String,
    title: String,
    genre: String,
    year: i32,
    length_nanosec: i64,
    rating: f32,
    playcount: u32,
}

// A play-queue row, where every column takes part in bare-term search.
#[derive(Debug, Clone, Default)]
struct QueueItem {
    title: String,
    artist: String,
    length_nanosec: i64,
    rating: f32,
}

fn make_library_registry() -> Arc<FieldRegistry<Song>> {
    let registry = FieldRegistryBuilder::new()
        .field("artist", FieldKind::Text, |s: &Song| FieldValue::from(s.artist.as_str()))
        .field("album", FieldKind::Text, |s: &Song| FieldValue::from(s.album.as_str()))
        .field("title", FieldKind::Text, |s: &Song| FieldValue::from(s.title.as_str()))
        .field("genre", FieldKind::Text, |s: &Song| FieldValue::from(s.genre.as_str()))
        .scoped_field("year", FieldKind::Integer, |s: &Song| FieldValue::from(s.year))
        .scoped_field("length", FieldKind::Duration, |s: &Song| FieldValue::Integer(s.length_nanosec))
        .scoped_field("rating", FieldKind::Rating, |s: &Song| FieldValue::from(s.rating))
        .scoped_field("playcount", FieldKind::Integer, |s: &Song| FieldValue::from(s.playcount))
        .build()
        .expect("library registry");
    Arc::new(registry)
}

fn make_queue_registry() -> Arc<FieldRegistry<QueueItem>> {
    let registry = FieldRegistryBuilder::new()
        .field("title", FieldKind::Text, |q: &QueueItem| FieldValue::from(q.title.as_str()))
        .field("artist", FieldKind::Text, |q: &QueueItem| FieldValue::from(q.artist.as_str()))
        .field("length", FieldKind::Duration, |q: &QueueItem| FieldValue::Integer(q.length_nanosec))
        .field("rating", FieldKind::Rating, |q: &QueueItem| FieldValue::from(q.rating))
        .build()
        .expect("queue registry");
    Arc::new(registry)
}

fn queen() -> Song {
    Song {
        artist: "Queen".into(),
        album: "A Night at the Opera".into(),
        title: "Bohemian Rhapsody".into(),
        genre: "Rock".into(),
        year: 1975,
        length_nanosec: 215_000_000_000,
        rating: 0.8,
        playcount: 12,
    }
}

fn song_matches(filter_str: &str, song: &Song) -> bool {
    CompiledFilter::new(filter_str, make_library_registry()).matches(song)
}

// Scenario from the reference walkthrough
#[test]
fn test_scenario_artist_rating_length() {
    let song = queen();
    assert!(song_matches("artist:que", &song));
    assert!(song_matches("rating:>=0.7", &song));
    assert!(!song_matches("length:<200", &song));
    assert!(!song_matches("artist:queen AND rating:<0.5", &song));
}

#[test]
fn test_empty_filter_matches_everything() {
    assert!(song_matches("", &queen()));
    assert!(song_matches("", &Song::default()));
}

#[test]
fn test_column_scoping() {
    let song = Song { title: "Killer Queen".into(), ..Song::default() };
    assert!(!song_matches("artist:queen", &song));
    assert!(song_matches("queen", &song));
    assert!(song_matches("queen", &queen()));
}

#[test]
fn test_quoting() {
    let exact = Song { title: "foo bar".into(), ..Song::default() };
    let short = Song { title: "foo".into(), ..Song::default() };
    assert!(song_matches("title:\"foo bar\"", &exact));
    assert!(!song_matches("title:\"foo bar\"", &short));
}

#[test]
fn test_negated_group() {
    let jazz = Song { genre: "jazz".into(), ..Song::default() };
    let rock = Song { genre: "rock".into(), ..Song::default() };
    assert!(song_matches("-(genre:rock OR genre:pop)", &jazz));
    assert!(!song_matches("-(genre:rock OR genre:pop)", &rock));
}

#[test]
fn test_duration_comparison_in_seconds() {
    let long = Song { length_nanosec: 201_000_000_000, ..Song::default() };
    let short = Song { length_nanosec: 199_000_000_000, ..Song::default() };
    assert!(song_matches("length:>200", &long));
    assert!(!song_matches("length:>200", &short));
    assert!(song_matches("length:>3:00", &long));
    assert!(song_matches("length:3:21", &long));
    assert!(song_matches("length:201", &long));
}

#[test]
fn test_numeric_equality_is_canonical() {
    assert!(song_matches("year:1975", &queen()));
    assert!(song_matches("year:01975", &queen()));
    assert!(!song_matches("year:197", &queen()));
    assert!(song_matches("year:>=1970 year:<1980", &queen()));
    assert!(song_matches("playcount:>10", &queen()));
}

#[test]
fn test_non_numeric_search_against_numeric_column_reads_zero() {
    let unknown_year = Song { year: 0, ..Song::default() };
    assert!(song_matches("year:abc", &unknown_year));
    assert!(!song_matches("year:abc", &queen()));
}

#[test]
fn test_not_equal_and_lexical_prefixes() {
    let song = queen();
    assert!(song_matches("genre:!=pop", &song));
    assert!(!song_matches("genre:<>rock", &song));
    assert!(song_matches("artist:>m", &song));
    assert!(!song_matches("artist:<m", &song));
    assert!(song_matches("artist:=queen", &song));
    assert!(!song_matches("artist:=que", &song));
}

#[test]
fn test_rating_star_counts_and_unrated() {
    let song = queen();
    assert!(song_matches("rating:4", &song));
    assert!(song_matches("rating:>3", &song));
    assert!(!song_matches("-rating:>3", &song));
    let unrated = Song { rating: -1.0, ..Song::default() };
    assert!(song_matches("rating:=", &unrated));
    assert!(!song_matches("rating:=", &song));
}

#[test]
fn test_scoped_fields_ignored_by_bare_terms() {
    assert!(!song_matches("1975", &queen()));
    assert!(song_matches("opera", &queen()));
}

#[test]
fn test_unknown_column_falls_back_to_all_fields() {
    assert!(song_matches("mood:rhapsody", &queen()));
    assert!(!song_matches("mood:happy", &queen()));
}

#[test]
fn test_double_negation() {
    assert!(song_matches("--queen", &queen()));
    assert!(!song_matches("-queen", &queen()));
}

// Same engine, different record shape
#[test]
fn test_queue_registry_searches_every_column() {
    let registry = make_queue_registry();
    let item = QueueItem {
        title: "Innuendo".into(),
        artist: "Queen".into(),
        length_nanosec: 391_000_000_000,
        rating: 0.6,
    };
    assert!(CompiledFilter::new("queen innuendo", Arc::clone(&registry)).matches(&item));
    assert!(CompiledFilter::new("391", Arc::clone(&registry)).matches(&item));
    assert!(CompiledFilter::new("length:>6:00 rating:3", Arc::clone(&registry)).matches(&item));
    assert!(!CompiledFilter::new("title:queen", registry).matches(&item));
}

#[test]
fn test_rating_tenths_scale() {
    let registry = FieldRegistryBuilder::new()
        .field("rating", FieldKind::Rating, |q: &QueueItem| FieldValue::from(q.rating))
        .rating_scale(RatingScale::Tenths)
        .build()
        .expect("registry");
    let registry = Arc::new(registry);
    let item = QueueItem { rating: 0.6, ..QueueItem::default() };
    assert!(CompiledFilter::new("rating:6", Arc::clone(&registry)).matches(&item));
    assert!(CompiledFilter::new("rating:>5", Arc::clone(&registry)).matches(&item));
    assert!(!CompiledFilter::new("rating:>=7", Arc::clone(&registry)).matches(&item));
    // An empty search still means "unrated", not zero.
    let unrated = QueueItem { rating: -1.0, ..QueueItem::default() };
    let zero = QueueItem { rating: 0.0, ..QueueItem::default() };
    let filter = CompiledFilter::new("rating:=", registry);
    assert!(filter.matches(&unrated));
    assert!(!filter.matches(&zero));
}

#[test]
fn test_cache_reuses_tree_across_rows() {
    let cache = FilterCache::new(make_library_registry());
    let songs = vec![
        queen(),
        Song { artist: "Miles Davis".into(), genre: "Jazz".into(), ..Song::default() },
        Song { artist: "Queensryche".into(), genre: "Metal".into(), ..Song::default() },
    ];
    let filter = "artist:queen (genre:rock OR genre:metal)";
    let matched: Vec<_> = songs.iter().filter(|s| cache.matches(filter, s)).map(|s| s.artist.as_str()).collect();
    assert_eq!(matched, vec!["Queen", "Queensryche"]);
    assert!(cache.is_cached(filter));
    assert!(Arc::ptr_eq(&cache.get(filter), &cache.get(filter)));
}

#[test]
fn test_and_or_identities() {
    let registry = make_library_registry();
    let song = queen();
    assert!(FilterExpr::And(vec![]).matches(&registry, &song));
    assert!(!FilterExpr::Or(vec![]).matches(&registry, &song));
}

fn sample_songs() -> Vec<Song> {
    vec![
        queen(),
        Song::default(),
        Song { artist: "AND".into(), title: "OR".into(), genre: "pop".into(), year: 2001, rating: -1.0, ..Song::default() },
        Song { title: "foo bar".into(), length_nanosec: 500_000_000, rating: 0.2, ..Song::default() },
    ]
}

proptest! {
    #[test]
    fn parser_does_not_panic_on_random_input(s in ".{0,256}") {
        let registry = make_library_registry();
        let _ = parse(&s, &registry);
    }
}

proptest! {
    #[test]
    fn parsing_is_idempotent(s in "[a-z: \"()<>=!ORAND0-9.-]{0,48}") {
        let registry = make_library_registry();
        let first = CompiledFilter::new(&s, Arc::clone(&registry));
        let second = CompiledFilter::new(&s, Arc::clone(&registry));
        for song in sample_songs() {
            prop_assert_eq!(first.matches(&song), second.matches(&song));
        }
    }
}

proptest! {
    #[test]
    fn negation_inverts_any_tree(s in "[a-z: \"()<>=!ORAND0-9.-]{0,48}") {
        let registry = make_library_registry();
        let expr = parse(&s, &registry);
        let negated = FilterExpr::not(expr.clone());
        for song in sample_songs() {
            prop_assert_eq!(negated.matches(&registry, &song), !expr.matches(&registry, &song));
        }
    }
}

proptest! {
    #[test]
    fn and_group_order_does_not_matter(a in "[a-z]{1,6}", b in "[a-z:<>=0-9]{1,8}") {
        let registry = make_library_registry();
        let forward = parse(&format!("{a} {b}"), &registry);
        let backward = parse(&format!("{b} {a}"), &registry);
        for song in sample_songs() {
            prop_assert_eq!(forward.matches(&registry, &song), backward.matches(&registry, &song));
        }
    }
}
