//! List command - show stored attractions.

use offmap::poi::{Attraction, Category};
use offmap::sync::FixedLocation;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the list command.
pub fn run(category: Option<&str>, near: Option<&str>, limit: usize) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    let engine = runner.engine()?;

    if let Some(position) = near {
        if category.is_some() {
            return Err(CliError::Config(
                "--near and --category cannot be combined".to_string(),
            ));
        }
        let here = parse_position(position)?;
        let nearby = engine.nearest_attractions(&here, limit);
        if nearby.is_empty() {
            println!("No attractions stored. Run 'offmap sync' first.");
        }
        for entry in nearby {
            println!("{:>7.2} km  {}", entry.distance_km, line(&entry.attraction));
        }
        return Ok(());
    }

    let attractions = match category {
        Some(name) => {
            let category: Category = name.parse().map_err(|_| {
                CliError::Config(format!(
                    "Unknown category '{}'. Known categories: {}",
                    name,
                    Category::ALL
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            engine.get_attractions_by_category(category)
        }
        None => engine.get_all_attractions(),
    };

    if attractions.is_empty() {
        println!("No attractions stored. Run 'offmap sync' first.");
        return Ok(());
    }

    for attraction in attractions.iter().take(limit) {
        println!("{}", line(attraction));
    }
    if attractions.len() > limit {
        println!("... and {} more", attractions.len() - limit);
    }
    Ok(())
}

fn line(attraction: &Attraction) -> String {
    let mut line = format!(
        "{:<40} {:<14} {:.5}, {:.5}",
        attraction.name,
        attraction.category.name(),
        attraction.latitude,
        attraction.longitude
    );
    if let Some(rating) = attraction.rating {
        line.push_str(&format!("  ★ {:.1}", rating));
    }
    line
}

/// Parses `LAT,LON`.
fn parse_position(value: &str) -> Result<FixedLocation, CliError> {
    let invalid = || CliError::Config(format!("Invalid position '{}', expected LAT,LON", value));

    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(FixedLocation {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        let here = parse_position("48.85, 2.35").unwrap();
        assert_eq!(here.latitude, 48.85);
        assert_eq!(here.longitude, 2.35);

        assert!(parse_position("48.85").is_err());
        assert!(parse_position("north,east").is_err());
        assert!(parse_position("91,0").is_err());
    }
}
