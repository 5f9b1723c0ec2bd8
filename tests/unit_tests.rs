// Unit tests for Geoplaces

use geoplaces::core::{
    aggregator::PlaceSet,
    distance::{format_distance, haversine_distance},
    relevance::{KeywordPolicy, RelevanceFilter},
};
use geoplaces::models::{Coordinate, RankedPlace};

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).unwrap()
}

fn place(id: &str, distance: Option<f64>) -> RankedPlace {
    RankedPlace {
        identity: id.to_string(),
        coordinate: coord(40.4168, -3.7038),
        thumbnail: None,
        distance_meters: distance,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let sol = coord(40.4169, -3.7035);
    assert_eq!(haversine_distance(&sol, &sol), 0.0);
}

#[test]
fn test_haversine_symmetry() {
    let points = [
        coord(40.4168, -3.7038),
        coord(-33.8688, 151.2093),
        coord(64.1466, -21.9426),
        coord(0.0, 0.0),
        coord(-89.9, 179.9),
    ];

    for a in &points {
        for b in &points {
            let (ab, ba) = (haversine_distance(a, b), haversine_distance(b, a));
            assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            assert!(haversine_distance(a, b) >= 0.0);
        }
    }
}

#[test]
fn test_haversine_meridian_additivity() {
    // Three points on the same meridian, B between A and C
    let a = coord(36.0, -4.0);
    let b = coord(39.5, -4.0);
    let c = coord(43.0, -4.0);

    let direct = haversine_distance(&a, &c);
    let via_b = haversine_distance(&a, &b) + haversine_distance(&b, &c);
    assert!((direct - via_b).abs() < 1e-3, "direct {} vs via B {}", direct, via_b);
}

#[test]
fn test_haversine_one_degree_latitude() {
    // One degree of latitude is ~111.19 km on a 6371 km sphere
    let distance = haversine_distance(&coord(40.0, -3.0), &coord(41.0, -3.0));
    assert!((distance - 111_195.0).abs() < 10.0, "got {}", distance);
}

#[test]
fn test_format_distance_thresholds() {
    assert_eq!(format_distance(999.4), "999 m");
    assert_eq!(format_distance(1500.0), "1.5 km");
}

#[test]
fn test_inclusion_filter_word_boundary() {
    let filter = RelevanceFilter::new(KeywordPolicy::Include(vec!["museo".to_string()])).unwrap();

    assert!(filter.is_relevant("Gran Museo Nacional"));
    assert!(!filter.is_relevant("Museología"));
}

#[test]
fn test_inclusion_filter_case_insensitive() {
    let filter = RelevanceFilter::new(KeywordPolicy::Include(vec!["Catedral".to_string()])).unwrap();

    assert!(filter.is_relevant("catedral de santiago de compostela"));
    assert!(filter.is_relevant("CATEDRAL DE SEVILLA"));
}

#[test]
fn test_exclusion_filter_substring() {
    let filter = RelevanceFilter::new(KeywordPolicy::Exclude(vec![
        "municipio".to_string(),
        "provincia".to_string(),
    ]))
    .unwrap();

    assert!(!filter.is_relevant("Provincia de Cádiz"));
    assert!(!filter.is_relevant("Anexo:Municipios de Cádiz"));
    assert!(filter.is_relevant("Catedral de Cádiz"));
}

#[test]
fn test_dedup_idempotence() {
    let batch = vec![place("A", Some(10.0)), place("B", Some(20.0)), place("C", None)];

    let mut once = PlaceSet::new();
    once.merge(batch.clone());

    let mut twice = PlaceSet::new();
    twice.merge(batch.clone());
    let added_again = twice.merge(batch);

    assert_eq!(added_again, 0);
    assert_eq!(once.rank(None), twice.rank(None));
}

#[test]
fn test_stable_rank_ordering() {
    let mut set = PlaceSet::new();
    set.merge(vec![
        place("P1", Some(500.0)),
        place("P2", Some(500.0)),
        place("P3", Some(200.0)),
    ]);

    let ranked: Vec<String> = set.rank(None).into_iter().map(|p| p.identity).collect();
    assert_eq!(ranked, vec!["P3", "P1", "P2"]);
}

#[test]
fn test_rank_is_idempotent_for_fixed_reference() {
    let reference = coord(40.4168, -3.7038);
    let mut set = PlaceSet::new();
    set.merge(vec![
        RankedPlace {
            identity: "Palacio Real".to_string(),
            coordinate: coord(40.4180, -3.7143),
            thumbnail: None,
            distance_meters: None,
        },
        RankedPlace {
            identity: "Museo del Prado".to_string(),
            coordinate: coord(40.4138, -3.6921),
            thumbnail: None,
            distance_meters: None,
        },
    ]);

    let first = set.rank(Some(&reference));

    let mut again = PlaceSet::new();
    again.merge(first.clone());
    let second = again.rank(Some(&reference));

    assert_eq!(first, second);
    assert!(first.iter().all(|p| p.distance_meters.is_some()));
}
