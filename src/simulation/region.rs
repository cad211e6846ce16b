//! Built-in region used when no region file is given

use super::config::{CityConfig, RegionConfig};

/// Three counties of three cities each, chained county to county
pub fn default_region() -> RegionConfig {
    let cities = vec![
        // Harrow county
        CityConfig::new("Ashford", "Harrow", 18, 15, 12),
        CityConfig::new("Brookmere", "Harrow", 9, 6, 6),
        CityConfig::new("Colden", "Harrow", 6, 9, 3),
        // Wexley county
        CityConfig::new("Dunmore", "Wexley", 15, 18, 15),
        CityConfig::new("Elmstead", "Wexley", 6, 3, 6),
        CityConfig::new("Fairholt", "Wexley", 9, 6, 9),
        // Marlow county
        CityConfig::new("Glenwick", "Marlow", 12, 12, 18),
        CityConfig::new("Hartfield", "Marlow", 3, 6, 3),
        CityConfig::new("Ivybridge", "Marlow", 6, 3, 6),
    ];

    let adjacency = [
        ("Ashford", "Brookmere"),
        ("Ashford", "Colden"),
        ("Brookmere", "Colden"),
        ("Colden", "Dunmore"),
        ("Dunmore", "Elmstead"),
        ("Dunmore", "Fairholt"),
        ("Elmstead", "Fairholt"),
        ("Fairholt", "Glenwick"),
        ("Glenwick", "Hartfield"),
        ("Glenwick", "Ivybridge"),
        ("Hartfield", "Ivybridge"),
    ];

    RegionConfig::new(cities, &adjacency)
}
